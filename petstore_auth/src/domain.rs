/// Users, credentials and auth errors
pub mod model;
/// Password hashing
pub mod password;
/// The ports of the auth domain
pub mod ports;
/// The auth service
pub mod service;
/// Access token issuing and validation
pub mod token;
