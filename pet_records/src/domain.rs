/// Owner and pet models and their errors
pub mod model;

/// Traits describing the record store and the services built on it
pub mod ports;

/// The lifecycle manager implementation
pub mod service;
