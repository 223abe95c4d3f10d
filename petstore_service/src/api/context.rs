use std::sync::Arc;

use pet_records::{
    domain::service::LifecycleManager, inbound::axum_router::PetRecordsRouterState,
    outbound::sqlite_record_store::SqliteRecordStore,
};
use petstore_auth::{
    domain::{service::AuthServiceImpl, token::TokenIssuer},
    inbound::axum_router::AuthRouterState,
    outbound::sqlite_user_repo::SqliteUserRepository,
};
use sqlx::SqlitePool;

use crate::config::Config;

pub type SqliteRecordsService = LifecycleManager<SqliteRecordStore>;
pub type SqliteAuthService = AuthServiceImpl<SqliteUserRepository>;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth_service: Arc<SqliteAuthService>,
    pub records: PetRecordsRouterState<SqliteRecordsService>,
    pub auth: AuthRouterState<SqliteAuthService>,
}

impl AppState {
    pub fn new(config: Config, db: SqlitePool) -> Self {
        let tokens = TokenIssuer::new(&config.jwt_secret, config.jwt_expiration_seconds);
        let auth_service = Arc::new(AuthServiceImpl::new(
            SqliteUserRepository::new(db.clone()),
            tokens,
        ));

        AppState {
            config: Arc::new(config),
            auth: AuthRouterState::from_arc(auth_service.clone()),
            auth_service,
            records: PetRecordsRouterState::new(LifecycleManager::new(SqliteRecordStore::new(db))),
        }
    }
}
