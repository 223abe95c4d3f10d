use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::util::ServiceExt;

use crate::domain::model::AuthenticatedUser;

use super::*;

struct FakeAuth;

impl AuthService for FakeAuth {
    async fn register(&self, registration: Registration) -> Result<AccessToken, AuthError> {
        registration
            .validate()
            .map_err(AuthError::ValidationFailed)?;
        match registration.username.as_str() {
            "admin" => Err(AuthError::UsernameTaken),
            "broken" => Err(AuthError::StorageLayerError(anyhow::anyhow!(
                "database is locked"
            ))),
            _ => Ok(AccessToken {
                token: format!("token-for-{}", registration.username),
                expires_in: 86400,
            }),
        }
    }

    async fn login(&self, credentials: Credentials) -> Result<AccessToken, AuthError> {
        match (credentials.username.as_str(), credentials.password.as_str()) {
            ("admin", "admin123") => Ok(AccessToken {
                token: "token-for-admin".to_string(),
                expires_in: 86400,
            }),
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    async fn authenticate(&self, _token: &str) -> Result<AuthenticatedUser, AuthError> {
        unimplemented!()
    }
}

fn router() -> Router {
    auth_router(AuthRouterState::new(FakeAuth))
}

async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
    let res = router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(bytes.as_ref()).unwrap())
}

fn john() -> Value {
    json!({
        "firstName": "John",
        "lastName": "Doe",
        "email": "john@petstore.com",
        "username": "john",
        "password": "secret1"
    })
}

#[tokio::test]
async fn it_registers() {
    let (status, body) = post_json("/auth/register", john()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "access_token": "token-for-john",
            "token_type": "Bearer",
            "expires_in": 86400
        })
    );
}

#[tokio::test]
async fn it_rejects_invalid_registrations() {
    let mut req = john();
    req["email"] = json!("john");
    req["password"] = json!("");

    let (status, body) = post_json("/auth/register", req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "message": "Validation failed",
            "errors": {
                "email": "email must be a valid email address",
                "password": "password is required"
            }
        })
    );
}

#[tokio::test]
async fn it_reports_taken_usernames() {
    let mut req = john();
    req["username"] = json!("admin");

    let (status, body) = post_json("/auth/register", req).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, json!({ "message": "Username is already taken" }));
}

#[tokio::test]
async fn it_hides_storage_errors() {
    let mut req = john();
    req["username"] = json!("broken");

    let (status, body) = post_json("/auth/register", req).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "message": "An internal server error has occurred" })
    );
}

#[tokio::test]
async fn it_logs_in() {
    let (status, body) = post_json(
        "/auth/login",
        json!({ "username": "admin", "password": "admin123" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["access_token"], "token-for-admin");
    assert_eq!(body["token_type"], "Bearer");
}

#[tokio::test]
async fn it_rejects_bad_credentials() {
    let (status, body) = post_json(
        "/auth/login",
        json!({ "username": "admin", "password": "wrong" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "Invalid username or password" }));
}
