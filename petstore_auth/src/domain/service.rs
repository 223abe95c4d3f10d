//! Contains the service logic for authentication

use crate::domain::{
    model::{
        AccessToken, AuthError, AuthenticatedUser, Credentials, NewUser, Registration, Role, User,
    },
    password::Passwords,
    ports::{AuthService, UserRepository},
    token::TokenIssuer,
};

#[cfg(test)]
mod tests;

/// Implementation of the AuthService using a UserRepository
#[derive(Clone)]
pub struct AuthServiceImpl<R> {
    /// The underlying user repository
    user_repository: R,
    passwords: Passwords,
    tokens: TokenIssuer,
}

struct DefaultUser {
    first_name: &'static str,
    last_name: &'static str,
    email: &'static str,
    username: &'static str,
    password: &'static str,
    role: Role,
}

const DEFAULT_USERS: [DefaultUser; 2] = [
    DefaultUser {
        first_name: "Admin",
        last_name: "User",
        email: "admin@petstore.com",
        username: "admin",
        password: "admin123",
        role: Role::Admin,
    },
    DefaultUser {
        first_name: "John",
        last_name: "Doe",
        email: "user@petstore.com",
        username: "user",
        password: "user123",
        role: Role::User,
    },
];

impl<R: UserRepository> AuthServiceImpl<R> {
    /// Creates a new AuthService
    pub fn new(user_repository: R, tokens: TokenIssuer) -> Self {
        Self {
            user_repository,
            passwords: Passwords::default(),
            tokens,
        }
    }

    /// The issuer used for every token of this service
    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// Creates the `admin` and `user` accounts when no user exists yet.
    /// Returns how many users were created.
    #[tracing::instrument(skip(self), err)]
    pub async fn seed_default_users(&self) -> Result<u64, AuthError> {
        if self.user_repository.count_users().await? > 0 {
            tracing::debug!("users exist, skipping default users");
            return Ok(0);
        }

        tracing::info!("no users found, creating default users");
        let mut created = 0;
        for user in &DEFAULT_USERS {
            self.user_repository
                .insert_user(NewUser {
                    first_name: user.first_name.to_string(),
                    last_name: user.last_name.to_string(),
                    email: user.email.to_string(),
                    username: user.username.to_string(),
                    password_hash: self
                        .passwords
                        .hash_in_background(user.password.to_string())
                        .await?,
                    role: user.role,
                })
                .await?;
            created += 1;
        }

        tracing::info!(created, "created default users");
        Ok(created)
    }

    fn access_token(&self, user: &User) -> Result<AccessToken, AuthError> {
        Ok(AccessToken {
            token: self.tokens.issue(user)?,
            expires_in: self.tokens.expires_in(),
        })
    }
}

impl<R: UserRepository> AuthService for AuthServiceImpl<R> {
    #[tracing::instrument(skip(self), err)]
    async fn register(&self, registration: Registration) -> Result<AccessToken, AuthError> {
        registration
            .validate()
            .map_err(AuthError::ValidationFailed)?;

        let Registration {
            first_name,
            last_name,
            email,
            username,
            password,
        } = registration;

        let user = self
            .user_repository
            .insert_user(NewUser {
                first_name,
                last_name,
                email,
                username,
                password_hash: self.passwords.hash_in_background(password).await?,
                role: Role::User,
            })
            .await?;

        tracing::info!(user_id = user.id, username = %user.username, "user registered");
        self.access_token(&user)
    }

    #[tracing::instrument(skip(self), err)]
    async fn login(&self, credentials: Credentials) -> Result<AccessToken, AuthError> {
        let Credentials { username, password } = credentials;

        let user = self
            .user_repository
            .find_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self
            .passwords
            .verify_in_background(password, user.password_hash.clone())
            .await?
        {
            return Err(AuthError::InvalidCredentials);
        }

        self.access_token(&user)
    }

    #[tracing::instrument(skip_all, err)]
    async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let claims = self.tokens.validate(token)?;

        let user = self
            .user_repository
            .find_by_username(claims.sub)
            .await?
            .ok_or_else(|| AuthError::InvalidToken("subject no longer exists".to_string()))?;

        Ok(AuthenticatedUser {
            id: user.id,
            username: user.username,
            role: user.role,
        })
    }
}
