use crate::error::ApiError;
use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use domain::{FilteredTodos, NewTodo, Todo, TodoFilter, TodoId, TodoPatch, DEFAULT_LIMIT, DEFAULT_PAGE};
use serde::{Deserialize, Serialize};
use shared::{AppError, ErrorResponse, SuccessResponse};
use utoipa::IntoParams;

type ApiResult<T> = Result<(StatusCode, Json<SuccessResponse<T>>), ApiError>;

fn respond<T>(status: StatusCode, message: &str, data: T) -> ApiResult<T> {
    Ok((status, Json(SuccessResponse::new(message, data, status.as_u16()))))
}

/// GET /todo のクエリ。いずれかが指定されていれば絞り込みとして扱う
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FilterParams {
    /// 1 始まりのページ番号（既定 1）
    pub page: Option<u64>,
    /// 1 ページあたりの件数（既定 10）
    pub limit: Option<u64>,
    /// タイトルの部分一致（大文字小文字を区別しない）
    pub title: Option<String>,
    /// 完了状態
    pub completed: Option<bool>,
}

impl FilterParams {
    pub fn is_empty(&self) -> bool {
        self.page.is_none() && self.limit.is_none() && self.title.is_none() && self.completed.is_none()
    }

    pub fn into_filter(self) -> TodoFilter {
        TodoFilter {
            page: self.page.unwrap_or(DEFAULT_PAGE),
            limit: self.limit.unwrap_or(DEFAULT_LIMIT),
            title: self.title,
            completed: self.completed,
        }
    }
}

/// POST /todo
#[utoipa::path(
    post,
    path = "/todo",
    tag = "Todo",
    request_body = NewTodo,
    responses(
        (status = 201, description = "The created todo (in the success envelope)", body = Todo),
        (status = 400, description = "Bad request (e.g., invalid input)", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
pub async fn create_todo(
    State(state): State<AppState>,
    payload: Result<Json<NewTodo>, JsonRejection>,
) -> ApiResult<Todo> {
    const FAILED: &str = "Failed to create todo";

    let Json(input) = payload.map_err(|r| ApiError::bad_json(FAILED, r))?;
    let todo = state
        .service
        .create_todo(input)
        .await
        .map_err(|e| ApiError::new(FAILED, e))?;

    respond(StatusCode::CREATED, "Todo created successfully", todo)
}

/// GET /todo（クエリ付きなら絞り込み）
#[utoipa::path(
    get,
    path = "/todo",
    tag = "Todo",
    params(FilterParams),
    responses(
        (status = 200, description = "All todos, or a filtered page when any query parameter is given", body = FilteredTodos),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
pub async fn list_todos(
    State(state): State<AppState>,
    params: Result<Query<FilterParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params.map_err(|r| ApiError::bad_query("Failed to filter todos", r))?;

    if params.is_empty() {
        let todos = state
            .service
            .get_todos()
            .await
            .map_err(|e| ApiError::new("Failed to get todos", e))?;
        return Ok(respond(StatusCode::OK, "Todos retrieved successfully", todos)?.into_response());
    }

    let filtered = state
        .service
        .filter_todos(params.into_filter())
        .await
        .map_err(|e| ApiError::new("Failed to filter todos", e))?;
    Ok(respond(StatusCode::OK, "Todos filtered successfully", filtered)?.into_response())
}

/// GET /todo/{id}
#[utoipa::path(
    get,
    path = "/todo/{id}",
    tag = "Todo",
    params(("id" = String, Path, description = "The todo ID")),
    responses(
        (status = 200, description = "The requested todo", body = Todo),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
pub async fn get_todo(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<Todo> {
    const FAILED: &str = "Failed to get todo";

    let Path(id) = id.map_err(|r| ApiError::bad_path(FAILED, r))?;
    let todo = state
        .service
        .get_todo_by_id(&TodoId::from_string(id))
        .await
        .map_err(|e| ApiError::new(FAILED, e))?;

    respond(StatusCode::OK, "Todo retrieved successfully", todo)
}

/// PUT /todo/{id}
#[utoipa::path(
    put,
    path = "/todo/{id}",
    tag = "Todo",
    params(("id" = String, Path, description = "The todo ID")),
    request_body = TodoPatch,
    responses(
        (status = 200, description = "The updated todo", body = Todo),
        (status = 400, description = "Bad request (e.g., invalid input)", body = ErrorResponse),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
pub async fn update_todo(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<TodoPatch>, JsonRejection>,
) -> ApiResult<Todo> {
    const FAILED: &str = "Failed to update todo";

    let Path(id) = id.map_err(|r| ApiError::bad_path(FAILED, r))?;
    let Json(patch) = payload.map_err(|r| ApiError::bad_json(FAILED, r))?;
    let todo = state
        .service
        .update_todo(&TodoId::from_string(id), patch)
        .await
        .map_err(|e| ApiError::new(FAILED, e))?;

    respond(StatusCode::OK, "Todo updated successfully", todo)
}

/// DELETE /todo/{id}
#[utoipa::path(
    delete,
    path = "/todo/{id}",
    tag = "Todo",
    params(("id" = String, Path, description = "The todo ID")),
    responses(
        (status = 200, description = "Todo deleted successfully", body = Todo),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
pub async fn delete_todo(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<Todo> {
    const FAILED: &str = "Failed to delete todo";

    let Path(id) = id.map_err(|r| ApiError::bad_path(FAILED, r))?;
    let todo = state
        .service
        .delete_todo(&TodoId::from_string(id))
        .await
        .map_err(|e| ApiError::new(FAILED, e))?;

    respond(StatusCode::OK, "Todo deleted successfully", todo)
}

/// ヘルスチェック用ハンドラ
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthBody { status: "ok" }))
}

pub async fn default_page() -> Html<&'static str> {
    Html("<h1>Default Page</h1>")
}

/// 未定義のルート
pub async fn fallback() -> ApiError {
    ApiError::new("Route not found", AppError::not_found("Route"))
}

#[derive(Debug, Serialize)]
struct HealthBody {
    /// サービスの簡易ステータス
    status: &'static str,
}
