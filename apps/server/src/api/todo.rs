//! Todo API endpoints.

use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, OriginalUri, Path, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use entities::Todo;
use todo_store::TodoStoreError;

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// Decodes a request body into a (possibly partial) todo.
fn decode_todo(body: &[u8]) -> ServerResult<Todo> {
    serde_json::from_slice(body).map_err(|e| ServerError::MalformedInput(e.to_string()))
}

/// Extracts the path id, rejecting undecodable and blank ids.
fn require_id(path: Result<Path<String>, PathRejection>) -> ServerResult<String> {
    let Path(id) = path.map_err(|e| ServerError::MalformedInput(e.body_text()))?;
    let id = id.trim();
    if id.is_empty() {
        return Err(ServerError::MissingParameter("id"));
    }
    Ok(id.to_string())
}

/// Absolute address of the requested collection, without a trailing slash.
fn resource_uri(headers: &HeaderMap, uri: &Uri, fallback_host: &str) -> String {
    let path = uri.path().trim_end_matches('/');

    if let (Some(scheme), Some(authority)) = (uri.scheme_str(), uri.authority()) {
        return format!("{scheme}://{authority}{path}");
    }

    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or(fallback_host);
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("http");

    format!("{scheme}://{host}{path}")
}

/// Turns a store's success flag into an error when it is false.
fn acknowledged(ok: bool, operation: &str) -> ServerResult<()> {
    if ok {
        Ok(())
    } else {
        Err(ServerError::BackendUnavailable(format!(
            "{operation} was not acknowledged by the store"
        )))
    }
}

/// Lists every todo.
pub async fn get_all(State(state): State<AppState>) -> ServerResult<Json<Vec<Todo>>> {
    let todos = state.call(state.store.get_all()).await?;
    tracing::debug!(count = todos.len(), "Listed todos");
    Ok(Json(todos))
}

/// Gets a todo by ID.
pub async fn get_todo(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ServerResult<Json<Todo>> {
    let id = require_id(path)?;

    let todo = state
        .call(state.store.get_certain(&id))
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("todo {id}")))?;

    Ok(Json(todo))
}

/// Creates a todo.
///
/// The id comes from the allocator and the url is the request address with
/// the id appended. The response body is the exact encoding of the stored
/// todo.
pub async fn create_todo(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    body: Bytes,
) -> ServerResult<Response> {
    let mut todo = decode_todo(&body)?;

    if todo.id < 0 {
        return Err(ServerError::MalformedInput(format!("negative id {}", todo.id)));
    }
    state.init_data().await?;
    todo.id = state
        .ids
        .assign(todo.id)
        .ok_or_else(|| ServerError::BackendUnavailable("todo id space exhausted".to_string()))?;
    todo.completed.get_or_insert(false);
    todo.url = Some(format!(
        "{}/{}",
        resource_uri(&headers, &uri, &state.config.bind_address),
        todo.id
    ));

    let encoded = todo.to_json().map_err(TodoStoreError::from)?;

    acknowledged(state.call(state.store.insert(&todo)).await?, "insert")?;

    tracing::info!(todo_id = todo.id, "Todo created");

    Ok((
        StatusCode::CREATED,
        [(header::CONTENT_TYPE, "application/json")],
        encoded,
    )
        .into_response())
}

/// Merges the request body into a stored todo.
pub async fn update_todo(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> ServerResult<Json<Todo>> {
    let id = require_id(path)?;
    let patch = decode_todo(&body)?;

    let todo = state
        .call(state.store.update(&id, &patch))
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("todo {id}")))?;

    tracing::info!(todo_id = todo.id, "Todo updated");

    Ok(Json(todo))
}

/// Deletes a todo.
pub async fn delete_todo(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ServerResult<StatusCode> {
    let id = require_id(path)?;

    acknowledged(state.call(state.store.delete(&id)).await?, "delete")?;

    tracing::info!(todo_id = %id, "Todo deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Deletes every todo.
pub async fn delete_all(State(state): State<AppState>) -> ServerResult<StatusCode> {
    acknowledged(state.call(state.store.delete_all()).await?, "delete all")?;

    tracing::info!("All todos deleted");

    Ok(StatusCode::NO_CONTENT)
}
