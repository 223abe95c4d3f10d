//! The sole responsibility of this crate is to expose the statically imported sql migrations for the petstore database.
//!
//! Both domain crates share one database, so their migrations live in one ordered set here.
pub static PETSTORE_DB_MIGRATIONS: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
