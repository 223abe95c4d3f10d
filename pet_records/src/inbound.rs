/// axum router for the pet and owner resources
pub mod axum_router;
