use anyhow::Context;
use axum::{
    Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware::from_fn_with_state,
};
use pet_records::inbound::axum_router::pet_records_router;
use petstore_auth::inbound::{axum_router::auth_router, bearer::require_bearer};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::context::{AppState, SqliteAuthService};

pub(crate) mod context;
mod health;
mod swagger;


pub async fn setup_and_serve(state: AppState) -> anyhow::Result<()> {
    let port = state.config.port;
    let app = app(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .context("could not bind listener")?;

    tracing::info!("petstore service is up and running on port {}", &port);

    axum::serve(listener, app.into_make_service())
        .await
        .context("error starting service")
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_headers(vec![AUTHORIZATION, CONTENT_TYPE])
        .allow_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_origin(Any)
}

/// The full application: `/api` plus health and docs
fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_router(state))
        .merge(health::router())
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", swagger::ApiDoc::openapi()))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

/// Record routes sit behind the bearer guard, auth routes do not
fn api_router(state: AppState) -> Router {
    let records: Router = pet_records_router(state.records)
        .layer(from_fn_with_state(state.auth.clone(), require_bearer::<SqliteAuthService>));

    Router::new().merge(records).merge(auth_router(state.auth))
}
