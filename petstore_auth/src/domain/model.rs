//! Contains the models for users and credentials

use petstore_error_response::FieldErrors;

/// The role of a user, stored as `USER` / `ADMIN`
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    strum::EnumString,
    strum::Display,
    serde::Serialize,
    serde::Deserialize,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Regular account
    #[default]
    User,
    /// Administrator
    Admin,
}

/// A stored user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// The id of the user
    pub id: i64,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Unique email
    pub email: String,
    /// Unique login name, used as the token subject
    pub username: String,
    /// Argon2 PHC string
    pub password_hash: String,
    /// Role of the user
    pub role: Role,
}

/// A user that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Unique email
    pub email: String,
    /// Unique login name
    pub username: String,
    /// Argon2 PHC string
    pub password_hash: String,
    /// Role of the user
    pub role: Role,
}

/// Minimum number of characters of a password
pub const MIN_PASSWORD_LEN: usize = 6;

/// Sign up data with the password in clear text
#[derive(Clone, Default)]
pub struct Registration {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Email, must contain `@`
    pub email: String,
    /// Login name
    pub username: String,
    /// Clear text password
    pub password: String,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl Registration {
    /// Collects every invalid field, keyed by the json field name
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require_non_blank("firstName", &self.first_name);
        errors.require_non_blank("lastName", &self.last_name);
        errors.require_non_blank("email", &self.email);
        errors.require_non_blank("username", &self.username);
        errors.require_non_blank("password", &self.password);

        if !self.email.contains('@') {
            errors.add("email", "email must be a valid email address");
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.add(
                "password",
                format!("password must be at least {MIN_PASSWORD_LEN} characters"),
            );
        }

        errors.into_result()
    }
}

/// Login data with the password in clear text
#[derive(Clone, Default)]
pub struct Credentials {
    /// Login name
    pub username: String,
    /// Clear text password
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// A freshly issued access token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// The signed jwt
    pub token: String,
    /// Lifetime of the token in seconds
    pub expires_in: u64,
}

/// The user a request was authenticated as. Inserted into the request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The id of the user
    pub id: i64,
    /// Login name
    pub username: String,
    /// Role of the user
    pub role: Role,
}

/// Errors for registration, login and token checks
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Unknown user or wrong password
    #[error("Invalid username or password")]
    InvalidCredentials,
    /// The username is already registered
    #[error("Username is already taken")]
    UsernameTaken,
    /// The email is already registered
    #[error("Email is already registered")]
    EmailTaken,
    /// Sign up data is invalid
    #[error("Validation failed: {0}")]
    ValidationFailed(FieldErrors),
    /// The token was valid once but has expired
    #[error("jwt is expired")]
    TokenExpired,
    /// The token cannot be trusted
    #[error("invalid token: {0}")]
    InvalidToken(String),
    /// Storage layer error
    #[error("Storage layer error {0}")]
    StorageLayerError(#[from] anyhow::Error),
}
