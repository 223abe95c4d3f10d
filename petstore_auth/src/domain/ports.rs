//! Contains the ports for users and authentication

use crate::domain::model::{
    AccessToken, AuthError, AuthenticatedUser, Credentials, NewUser, Registration, User,
};

/// The UserRepository defines a set of actions to perform on stored users
#[cfg_attr(test, mockall::automock)]
pub trait UserRepository: Send + Sync + 'static {
    /// Looks up a user by login name
    fn find_by_username(
        &self,
        username: String,
    ) -> impl Future<Output = Result<Option<User>, AuthError>> + Send;

    /// Stores a new user. Fails with [AuthError::UsernameTaken] or [AuthError::EmailTaken]
    /// when either is already registered.
    fn insert_user(&self, user: NewUser) -> impl Future<Output = Result<User, AuthError>> + Send;

    /// Number of stored users
    fn count_users(&self) -> impl Future<Output = Result<u64, AuthError>> + Send;
}

/// Registration, login and token checks
pub trait AuthService: Send + Sync + 'static {
    /// Stores a new regular user and issues a token for it
    fn register(
        &self,
        registration: Registration,
    ) -> impl Future<Output = Result<AccessToken, AuthError>> + Send;

    /// Verifies the credentials and issues a token
    fn login(
        &self,
        credentials: Credentials,
    ) -> impl Future<Output = Result<AccessToken, AuthError>> + Send;

    /// Validates a bearer token and resolves the user it was issued for
    fn authenticate(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<AuthenticatedUser, AuthError>> + Send;
}
