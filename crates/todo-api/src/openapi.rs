use crate::handlers;
use domain::{FilteredTodos, NewTodo, Todo, TodoPatch};
use shared::ErrorResponse;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub const DOCS_PATH: &str = "/api-docs";
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// OpenAPI ドキュメント
#[derive(OpenApi)]
#[openapi(
    info(title = "Todo API", version = "1.0.0", description = "CRUD and filtering for todo items"),
    paths(
        handlers::create_todo,
        handlers::list_todos,
        handlers::get_todo,
        handlers::update_todo,
        handlers::delete_todo,
    ),
    components(schemas(Todo, NewTodo, TodoPatch, FilteredTodos, ErrorResponse)),
    tags((name = "Todo", description = "Todo management"))
)]
pub struct ApiDoc;

/// `/api-docs` に Swagger UI、`/api-docs/openapi.json` に JSON を公開する
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new(DOCS_PATH).url(OPENAPI_JSON_PATH, ApiDoc::openapi())
}
