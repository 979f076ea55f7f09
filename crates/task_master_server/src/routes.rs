//! HTTP route handlers: thin adapters from the wire to the task store.

use crate::auth;
use crate::config::Config;
use crate::error::ApiError;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{get, patch, post},
};
use serde::Deserialize;
use std::sync::Arc;
use task_master_core::error::{StoreError, ValidationError};
use task_master_core::model::{ETA_FORMAT, Task};
use task_master_core::schema::TaskPayload;
use task_master_core::storage::JsonFileBackend;
use task_master_core::store::TaskStore;
use time::PrimitiveDateTime;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

/// Shared application state. The mutex serializes store calls so each
/// read-modify-persist step stays atomic under concurrent requests.
pub struct AppState {
    pub config: Config,
    pub store: Mutex<TaskStore<JsonFileBackend>>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/tasks", get(list_tasks))
        .route("/tasks/due", get(list_due))
        .route("/task", post(create_task))
        .route(
            "/task/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/task/:id/complete", patch(complete_task))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            auth::require_basic_auth,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn list_tasks(State(state): State<Arc<AppState>>) -> Json<Vec<Task>> {
    Json(state.store.lock().await.get(None))
}

#[derive(Debug, Deserialize)]
struct DueParams {
    before: Option<String>,
}

async fn list_due(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DueParams>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let before = match params.before.as_deref() {
        None => None,
        Some(text) => Some(PrimitiveDateTime::parse(text, ETA_FORMAT).map_err(|_| {
            StoreError::InvalidTask(ValidationError::WrongType {
                field: "before",
                expected: "a timestamp like 2023-06-20T14:00:00",
            })
        })?),
    };

    Ok(Json(state.store.lock().await.get_due(before)))
}

async fn create_task(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TaskPayload>,
) -> Result<Json<Task>, ApiError> {
    let task = state.store.lock().await.create(&payload)?;
    tracing::info!(id = %task.id, "created task");
    Ok(Json(task))
}

async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<Vec<Task>> {
    Json(state.store.lock().await.get(Some(&id)))
}

async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<TaskPayload>,
) -> Result<Json<Task>, ApiError> {
    let task = state.store.lock().await.update(&id, &payload)?;
    Ok(Json(task))
}

async fn complete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let task = state.store.lock().await.complete(&id)?;
    Ok(Json(task))
}

async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.store.lock().await.delete(&id)?;
    Ok(StatusCode::NO_CONTENT)
}
