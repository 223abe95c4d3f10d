mod api;
mod config;

use std::str::FromStr;

use anyhow::Context;
use config::{Config, Environment};
use petstore_db_migrator::PETSTORE_DB_MIGRATIONS;
use petstore_entrypoint::PetstoreEntrypoint;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

use crate::api::context::AppState;

async fn connect_to_database(config: &Config) -> anyhow::Result<SqlitePool> {
    let (min_connections, max_connections): (u32, u32) = match config.environment {
        Environment::Production => (2, 16),
        Environment::Develop => (1, 8),
        Environment::Local => (1, 4),
    };

    let options = SqliteConnectOptions::from_str(&config.database_url)
        .context("DATABASE_URL is not a valid sqlite url")?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal);

    let db = SqlitePoolOptions::new()
        .min_connections(min_connections)
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .context("could not connect to db")?;
    Ok(db)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    PetstoreEntrypoint::default().init();

    let config = Config::from_env().context("expected to be able to generate config")?;

    let db = connect_to_database(&config).await?;
    PETSTORE_DB_MIGRATIONS
        .run(&db)
        .await
        .context("could not run migrations")?;

    let state = AppState::new(config, db);

    if state.config.seed_default_users {
        let created = state
            .auth_service
            .seed_default_users()
            .await
            .context("could not seed default users")?;
        tracing::info!(created, "seeded default users");
    }

    api::setup_and_serve(state).await?;
    Ok(())
}
