//! Todo backend server
//!
//! Serves CRUD operations on todos over HTTP. Requests are decoded and
//! validated here, handed to the configured todo store, and the store's answer
//! is mapped back to an HTTP status and body.

pub mod api;
pub mod config;
pub mod error;
pub mod state;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use state::AppState;

/// Creates the application router with all routes configured.
pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    api::create_router()
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Builds the CORS layer from the configuration.
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    if !config.enable_cors {
        return CorsLayer::new();
    }

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::PATCH])
        .allow_headers([
            HeaderName::from_static("x-requested-with"),
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ]);

    if config.cors_origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(origins)
}

/// Initializes tracing from the configured level and format.
pub fn init_tracing(config: &ServerConfig) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "todo_server={0},todo_store={0},tower_http=debug",
            config.log_level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.log_json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{body::Body, http::Request, http::StatusCode};
    use todo_store::MemoryTodoStore;
    use tower::ServiceExt;

    use super::*;

    fn app(config: ServerConfig) -> Router {
        create_app(AppState::with_store(config, Arc::new(MemoryTodoStore::new())))
    }

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/todos")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PATCH")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = app(ServerConfig::default())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"OK");
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin_by_default() {
        let response = app(ServerConfig::default())
            .oneshot(preflight("http://client.test"))
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
        let methods = response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_METHODS)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(methods.contains("PATCH"));
    }

    #[tokio::test]
    async fn test_cors_restricted_origins() {
        let config = ServerConfig {
            cors_origins: vec!["http://allowed.test".to_string()],
            ..Default::default()
        };

        let response = app(config.clone())
            .oneshot(preflight("http://allowed.test"))
            .await
            .unwrap();
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://allowed.test"
        );

        let response = app(config).oneshot(preflight("http://other.test")).await.unwrap();
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}
