#![deny(missing_docs)]
//! Users, access tokens and the bearer-token guard of the petstore api.

/// The domain module contains users, password hashing, the token issuer and the auth service
pub mod domain;

/// The inbound module contains the `/auth` router and the bearer middleware
pub mod inbound;

/// The outbound module contains the sqlite user repository
pub mod outbound;
