use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::{
    dto::{ListQuery, TodoPage, TodoStats},
    repo_types::Todo,
    services::{self, TODO_NOT_FOUND},
};
use crate::{
    auth::extractors::AuthUser,
    error::{AppError, AppResult},
    extract::JsonBody,
    openapi::{
        CreateTodoRequest, ErrorEnvelope, MessageEnvelope, TodoEnvelope, TodoPageEnvelope,
        TodoStatsEnvelope, UpdateTodoRequest,
    },
    pagination::Pagination,
    response::ApiResponse,
    state::AppState,
    validation::todos::{validate_create_todo, validate_update_todo},
};

pub fn todo_routes() -> Router<AppState> {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/stats", get(todo_stats))
        .route("/todos/:id", get(get_todo).put(update_todo).delete(delete_todo))
}

/// Malformed ids are reported like any other missing todo.
fn parse_todo_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| {
        debug!(id = %raw, "malformed todo id");
        AppError::NotFound(TODO_NOT_FOUND)
    })
}

#[utoipa::path(
    get, path = "/api/todos", tag = "todos",
    params(ListQuery),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Page of the caller's todos, newest first", body = TodoPageEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope)
    )
)]
#[instrument(skip(state, query))]
pub async fn list_todos(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    query: Option<Query<Vec<(String, String)>>>,
) -> AppResult<Json<ApiResponse<TodoPage>>> {
    let q = query
        .map(|Query(pairs)| ListQuery::from_pairs(pairs))
        .unwrap_or_default();
    let pagination = Pagination::from_query(q.page.as_deref(), q.limit.as_deref());
    let page = services::list_by_user(state.todos.as_ref(), user_id, pagination).await?;
    Ok(Json(ApiResponse::data(page)))
}

#[utoipa::path(
    get, path = "/api/todos/{id}", tag = "todos",
    params(("id" = String, Path, description = "Todo ID")),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "The todo", body = TodoEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 404, description = "Todo not found", body = ErrorEnvelope)
    )
)]
#[instrument(skip(state))]
pub async fn get_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Todo>>> {
    let id = parse_todo_id(&id)?;
    let todo = services::get_by_id(state.todos.as_ref(), id, user_id).await?;
    Ok(Json(ApiResponse::data(todo)))
}

#[utoipa::path(
    post, path = "/api/todos", tag = "todos",
    request_body = CreateTodoRequest,
    security(("bearerAuth" = [])),
    responses(
        (status = 201, description = "Todo created", body = TodoEnvelope),
        (status = 400, description = "Validation failed", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope)
    )
)]
#[instrument(skip(state, body))]
pub async fn create_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    JsonBody(body): JsonBody,
) -> AppResult<(StatusCode, Json<ApiResponse<Todo>>)> {
    let input = validate_create_todo(&body)?;
    let todo = services::create(state.todos.as_ref(), user_id, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Todo created successfully", todo)),
    ))
}

#[utoipa::path(
    put, path = "/api/todos/{id}", tag = "todos",
    params(("id" = String, Path, description = "Todo ID")),
    request_body = UpdateTodoRequest,
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Todo updated", body = TodoEnvelope),
        (status = 400, description = "Validation failed", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 404, description = "Todo not found", body = ErrorEnvelope)
    )
)]
#[instrument(skip(state, body))]
pub async fn update_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> AppResult<Json<ApiResponse<Todo>>> {
    let id = parse_todo_id(&id)?;
    let changes = validate_update_todo(&body)?;
    let todo = services::update(state.todos.as_ref(), id, user_id, changes).await?;
    Ok(Json(ApiResponse::with_message("Todo updated successfully", todo)))
}

#[utoipa::path(
    delete, path = "/api/todos/{id}", tag = "todos",
    params(("id" = String, Path, description = "Todo ID")),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Todo deleted", body = MessageEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 404, description = "Todo not found", body = ErrorEnvelope)
    )
)]
#[instrument(skip(state))]
pub async fn delete_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let id = parse_todo_id(&id)?;
    services::delete(state.todos.as_ref(), id, user_id).await?;
    Ok(Json(ApiResponse::message("Todo deleted successfully")))
}

#[utoipa::path(
    get, path = "/api/todos/stats", tag = "todos",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Completion statistics", body = TodoStatsEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope)
    )
)]
#[instrument(skip(state))]
pub async fn todo_stats(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<ApiResponse<TodoStats>>> {
    let stats = services::stats(state.todos.as_ref(), user_id).await?;
    Ok(Json(ApiResponse::data(stats)))
}
