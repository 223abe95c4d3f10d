#![deny(missing_docs)]
//! Owner and pet records for the grooming shop.
//!
//! The [domain::service::LifecycleManager] keeps the two record kinds consistent on top of an
//! abstract [domain::ports::RecordStore]; `outbound` provides the sqlite store and `inbound` the
//! axum router.

/// The domain module contains the owner/pet models, ports and lifecycle rules
pub mod domain;

/// The inbound module contains the http adapter
pub mod inbound;

/// The outbound module contains the storage adapter
pub mod outbound;
