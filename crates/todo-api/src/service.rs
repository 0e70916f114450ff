//! サービス層
//!
//! リポジトリ呼び出しを包み、`None` を `NotFound` に、それ以外の失敗を
//! 操作名付きの `Operation` エラーに変換する。業務ロジックは存在確認と入力検証のみ。

use domain::{FilteredTodos, NewTodo, Todo, TodoFilter, TodoId, TodoPatch};
use infrastructure::{StoreError, TodoRepository};
use shared::AppError;
use std::sync::Arc;
use tracing::instrument;

const RESOURCE: &str = "Todo";

pub struct TodoService {
    repo: Arc<dyn TodoRepository>,
}

impl TodoService {
    pub fn new(repo: Arc<dyn TodoRepository>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, input))]
    pub async fn create_todo(&self, input: NewTodo) -> Result<Todo, AppError> {
        input.validate()?;
        self.repo
            .create(input)
            .await
            .map_err(|e| operation_error("create todo", e))
    }

    #[instrument(skip(self))]
    pub async fn get_todos(&self) -> Result<Vec<Todo>, AppError> {
        self.repo
            .find_all()
            .await
            .map_err(|e| operation_error("fetch todos", e))
    }

    #[instrument(skip(self))]
    pub async fn get_todo_by_id(&self, id: &TodoId) -> Result<Todo, AppError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| operation_error("retrieve todo", e))?
            .ok_or_else(|| AppError::not_found(RESOURCE))
    }

    #[instrument(skip(self, patch))]
    pub async fn update_todo(&self, id: &TodoId, patch: TodoPatch) -> Result<Todo, AppError> {
        patch.validate()?;
        self.repo
            .update(id, patch)
            .await
            .map_err(|e| operation_error("update todo", e))?
            .ok_or_else(|| AppError::not_found(RESOURCE))
    }

    #[instrument(skip(self))]
    pub async fn delete_todo(&self, id: &TodoId) -> Result<Todo, AppError> {
        self.repo
            .delete(id)
            .await
            .map_err(|e| operation_error("delete todo", e))?
            .ok_or_else(|| AppError::not_found(RESOURCE))
    }

    #[instrument(skip(self))]
    pub async fn filter_todos(&self, filter: TodoFilter) -> Result<FilteredTodos, AppError> {
        filter.validate()?;
        self.repo
            .filter(&filter)
            .await
            .map_err(|e| operation_error("filter todos", e))
    }
}

fn operation_error(operation: &str, source: StoreError) -> AppError {
    let category = source.category();
    AppError::operation(operation, category, source)
}
