/// `/auth/register` and `/auth/login`
pub mod axum_router;
/// Middleware that requires a valid bearer token
pub mod bearer;
