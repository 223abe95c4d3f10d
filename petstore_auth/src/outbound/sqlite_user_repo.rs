//! Implementation for UserRepository using the sqlite petstore database.

#[cfg(test)]
mod test;

use std::str::FromStr;

use sqlx::SqlitePool;

use crate::domain::{
    model::{AuthError, NewUser, Role, User},
    ports::UserRepository,
};

/// The SqliteUserRepository struct is a wrapper around sqlx::SqlitePool.
#[derive(Debug, Clone)]
pub struct SqliteUserRepository {
    /// The underlying sqlx::SqlitePool
    pool: SqlitePool,
}

impl SqliteUserRepository {
    /// Creates a new instance of SqliteUserRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
    username: String,
    password_hash: String,
    role: String,
}

impl TryFrom<UserRow> for User {
    type Error = AuthError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = Role::from_str(&row.role)
            .map_err(|e| anyhow::anyhow!("invalid role {:?}: {e}", row.role))?;
        Ok(User {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            username: row.username,
            password_hash: row.password_hash,
            role,
        })
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(e: sqlx::Error) -> Self {
        let violated = match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => Some(db.message().to_string()),
            _ => None,
        };

        match violated {
            Some(message) if message.contains("users.username") => Self::UsernameTaken,
            Some(message) if message.contains("users.email") => Self::EmailTaken,
            _ => Self::StorageLayerError(e.into()),
        }
    }
}

impl UserRepository for SqliteUserRepository {
    #[tracing::instrument(skip(self), err)]
    async fn find_by_username(&self, username: String) -> Result<Option<User>, AuthError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, first_name, last_name, email, username, password_hash, role
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    #[tracing::instrument(skip(self, user), fields(username = %user.username), err)]
    async fn insert_user(&self, user: NewUser) -> Result<User, AuthError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (first_name, last_name, email, username, password_hash, role)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, first_name, last_name, email, username, password_hash, role
            "#,
        )
        .bind(user.first_name)
        .bind(user.last_name)
        .bind(user.email)
        .bind(user.username)
        .bind(user.password_hash)
        .bind(user.role.to_string())
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    #[tracing::instrument(skip(self), err)]
    async fn count_users(&self) -> Result<u64, AuthError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        u64::try_from(count).map_err(|e| AuthError::StorageLayerError(e.into()))
    }
}
