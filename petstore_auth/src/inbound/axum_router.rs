//! axum router for `/auth`

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use petstore_error_response::{ErrorResponse, ValidationErrorResponse};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::domain::{
    model::{AccessToken, AuthError, Credentials, Registration},
    ports::AuthService,
};

#[cfg(test)]
mod tests;

/// State shared by the auth handlers and the bearer middleware
pub struct AuthRouterState<T> {
    pub(crate) service: Arc<T>,
}

impl<T> Clone for AuthRouterState<T> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}

impl<T> AuthRouterState<T>
where
    T: AuthService,
{
    /// Creates a new router state owning the service
    pub fn new(service: T) -> Self {
        Self::from_arc(Arc::new(service))
    }

    /// Creates a new router state from an already shared service
    pub fn from_arc(service: Arc<T>) -> Self {
        AuthRouterState { service }
    }
}

/// Builds the router for registration and login
pub fn auth_router<T, S>(state: AuthRouterState<T>) -> Router<S>
where
    T: AuthService,
    S: Send + Sync,
{
    Router::new()
        .route("/auth/register", post(register_handler::<T>))
        .route("/auth/login", post(login_handler::<T>))
        .with_state(state)
}

/// Sign up payload
#[derive(Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Email address
    pub email: String,
    /// Login name
    pub username: String,
    /// At least 6 characters
    pub password: String,
}

impl From<RegisterRequest> for Registration {
    fn from(req: RegisterRequest) -> Self {
        Registration {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            username: req.username,
            password: req.password,
        }
    }
}

/// Login payload
#[derive(Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    /// Login name
    pub username: String,
    /// Password
    pub password: String,
}

/// An issued bearer token
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccessTokenResponse {
    /// The signed jwt
    pub access_token: String,
    /// Always `Bearer`
    pub token_type: String,
    /// Lifetime in seconds
    pub expires_in: u64,
}

impl From<AccessToken> for AccessTokenResponse {
    fn from(token: AccessToken) -> Self {
        AccessTokenResponse {
            access_token: token.token,
            token_type: "Bearer".to_string(),
            expires_in: token.expires_in,
        }
    }
}

/// Errors produced by the auth handlers
#[derive(Debug, Error)]
pub enum AuthHttpErr {
    /// Error returned by the auth service
    #[error(transparent)]
    Auth(#[from] AuthError),
    /// The body is not the expected json
    #[error(transparent)]
    MalformedBody(#[from] JsonRejection),
}

fn message(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorResponse { message })).into_response()
}

impl IntoResponse for AuthHttpErr {
    fn into_response(self) -> Response {
        match self {
            AuthHttpErr::Auth(AuthError::ValidationFailed(errors)) => (
                StatusCode::BAD_REQUEST,
                Json(ValidationErrorResponse::from(errors)),
            )
                .into_response(),
            AuthHttpErr::Auth(e @ AuthError::InvalidCredentials) => {
                tracing::warn!("authentication failed");
                message(StatusCode::UNAUTHORIZED, &e.to_string())
            }
            AuthHttpErr::Auth(e @ (AuthError::UsernameTaken | AuthError::EmailTaken)) => {
                message(StatusCode::CONFLICT, &e.to_string())
            }
            AuthHttpErr::Auth(AuthError::TokenExpired) => {
                message(StatusCode::UNAUTHORIZED, "jwt expired")
            }
            AuthHttpErr::Auth(AuthError::InvalidToken(_)) => {
                message(StatusCode::UNAUTHORIZED, "unauthorized")
            }
            AuthHttpErr::Auth(AuthError::StorageLayerError(e)) => {
                tracing::error!(error=?e, "auth operation failed");
                message(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error has occurred",
                )
            }
            AuthHttpErr::MalformedBody(rejection) => {
                message(rejection.status(), &rejection.body_text())
            }
        }
    }
}

/// Registers a new user and returns a token for it
#[utoipa::path(
    post,
    path = "/api/auth/register",
    operation_id = "register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, body = AccessTokenResponse),
        (status = 400, body = ValidationErrorResponse),
        (status = 409, body = ErrorResponse),
        (status = 500, body = ErrorResponse),
    )
)]
#[tracing::instrument(skip_all, err)]
pub async fn register_handler<T: AuthService>(
    State(state): State<AuthRouterState<T>>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<AccessTokenResponse>, AuthHttpErr> {
    let Json(req) = body?;
    let token = state.service.register(req.into()).await?;
    Ok(Json(token.into()))
}

/// Exchanges username and password for a token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    operation_id = "login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, body = AccessTokenResponse),
        (status = 401, body = ErrorResponse),
        (status = 500, body = ErrorResponse),
    )
)]
#[tracing::instrument(skip_all, err)]
pub async fn login_handler<T: AuthService>(
    State(state): State<AuthRouterState<T>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AccessTokenResponse>, AuthHttpErr> {
    let Json(LoginRequest { username, password }) = body?;
    let token = state
        .service
        .login(Credentials { username, password })
        .await?;
    Ok(Json(token.into()))
}
