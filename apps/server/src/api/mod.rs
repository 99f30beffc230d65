//! API endpoints.

pub mod todo;

use axum::{routing::get, Router};

use crate::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router() -> Router<AppState> {
    Router::new()
        // Todo endpoints
        .route(
            "/todos",
            get(todo::get_all)
                .post(todo::create_todo)
                .delete(todo::delete_all),
        )
        .route(
            "/todos/{id}",
            get(todo::get_todo)
                .patch(todo::update_todo)
                .delete(todo::delete_todo),
        )
        // Health check
        .route("/health", get(health_check))
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
