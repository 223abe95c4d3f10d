//! Guards routes behind `Authorization: Bearer <token>`

use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use petstore_error_response::ErrorResponse;

use crate::{
    domain::{model::AuthError, ports::AuthService},
    inbound::axum_router::AuthRouterState,
};

/// The token of an `Authorization: Bearer <token>` header, if present
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn unauthorized(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(ErrorResponse { message })).into_response()
}

/// Rejects the request with 401 unless it carries a valid token whose subject still exists.
/// On success the [crate::domain::model::AuthenticatedUser] is inserted into the request
/// extensions.
pub async fn require_bearer<T: AuthService>(
    State(state): State<AuthRouterState<T>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let Some(token) = bearer_token(req.headers()).map(str::to_string) else {
        tracing::trace!("no bearer token provided");
        return Err(unauthorized("unauthorized"));
    };

    let user = state
        .service
        .authenticate(&token)
        .await
        .map_err(|e| match e {
            AuthError::TokenExpired => unauthorized("jwt expired"),
            AuthError::StorageLayerError(e) => {
                tracing::error!(error=?e, "unable to authenticate request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        message: "An internal server error has occurred",
                    }),
                )
                    .into_response()
            }
            e => {
                tracing::debug!(error=?e, "rejected bearer token");
                unauthorized("unauthorized")
            }
        })?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
