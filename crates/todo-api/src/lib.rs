//! Todo HTTP API（axum）
//!
//! `/todo` 配下の CRUD と絞り込み、`/health`、OpenAPI ドキュメント（Swagger UI）を提供します。
//! すべての応答は成功/失敗の共通封筒で返します。

pub mod error;
pub mod handlers;
pub mod openapi;
pub mod service;

use axum::{
    http::{
        header::{self, InvalidHeaderValue},
        HeaderValue, Method,
    },
    routing::get,
    Router,
};
use infrastructure::{InMemoryTodoRepository, TodoRepository};
use service::TodoService;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// ルータを構築して返します（InMemory リポジトリ）。
pub fn app() -> Router {
    app_with_state(AppState::default())
}

/// 外部から状態を注入できる版
pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::default_page))
        .route("/health", get(handlers::health))
        .route("/todo", get(handlers::list_todos).post(handlers::create_todo))
        .route(
            "/todo/:id",
            get(handlers::get_todo)
                .put(handlers::update_todo)
                .delete(handlers::delete_todo),
        )
        .merge(openapi::swagger_ui())
        .fallback(handlers::fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 設定されたオリジンのみを許可する CORS レイヤー
pub fn cors_layer(origin: &str) -> Result<CorsLayer, InvalidHeaderValue> {
    let origin = HeaderValue::from_str(origin)?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true))
}

/// アプリケーションの共有状態
#[derive(Clone)]
pub struct AppState {
    service: Arc<TodoService>,
}

impl AppState {
    pub fn new(repo: Arc<dyn TodoRepository>) -> Self {
        Self {
            service: Arc::new(TodoService::new(repo)),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(InMemoryTodoRepository::new()))
    }
}
