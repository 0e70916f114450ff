use crate::errors::StoreError;
use crate::models::{parse_object_id, truncate_to_millis, TodoDocument};
use crate::repositories::TodoRepository;
use async_trait::async_trait;
use chrono::Utc;
use domain::{FilteredTodos, NewTodo, Todo, TodoFilter, TodoId, TodoPatch};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// 簡易な InMemory 実装（開発/テスト用）
///
/// MongoDB 実装と同じく ObjectId 形式の ID を採番するので、
/// 不正な形式の ID の扱いも揃う。
#[derive(Default)]
pub struct InMemoryTodoRepository {
    todos: Mutex<HashMap<TodoId, Todo>>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 保存件数（テスト観測用）。ロックが壊れていればエラー
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<TodoId, Todo>>, StoreError> {
        self.todos
            .lock()
            .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".to_string()))
    }

    fn sorted(todos: impl Iterator<Item = Todo>) -> Vec<Todo> {
        let mut list: Vec<Todo> = todos.collect();
        // 同時刻は ID（採番順）の降順
        list.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| b.id.as_str().cmp(a.id.as_str()))
        });
        list
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn create(&self, input: NewTodo) -> Result<Todo, StoreError> {
        // スキーマの必須制約に相当
        if input.title.trim().is_empty() {
            return Err(StoreError::Validation("title is required".to_string()));
        }

        let todo = TodoDocument::from_new(input, Utc::now()).into_domain();
        self.lock()?.insert(todo.id.clone(), todo.clone());
        Ok(todo)
    }

    async fn find_all(&self) -> Result<Vec<Todo>, StoreError> {
        let todos = self.lock()?;
        Ok(Self::sorted(todos.values().cloned()))
    }

    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, StoreError> {
        if parse_object_id(id).is_none() {
            return Ok(None);
        }
        Ok(self.lock()?.get(id).cloned())
    }

    async fn update(&self, id: &TodoId, patch: TodoPatch) -> Result<Option<Todo>, StoreError> {
        if parse_object_id(id).is_none() {
            return Ok(None);
        }

        let mut todos = self.lock()?;
        let Some(todo) = todos.get_mut(id) else {
            return Ok(None);
        };
        todo.apply_patch(patch, truncate_to_millis(Utc::now()));
        Ok(Some(todo.clone()))
    }

    async fn delete(&self, id: &TodoId) -> Result<Option<Todo>, StoreError> {
        if parse_object_id(id).is_none() {
            return Ok(None);
        }
        Ok(self.lock()?.remove(id))
    }

    async fn filter(&self, filter: &TodoFilter) -> Result<FilteredTodos, StoreError> {
        let todos = self.lock()?;
        let matched = Self::sorted(todos.values().filter(|t| filter.matches(t)).cloned());
        let total = matched.len() as u64;

        let skip = usize::try_from(filter.skip()).unwrap_or(usize::MAX);
        let limit = usize::try_from(filter.limit).unwrap_or(usize::MAX);
        let items = matched.into_iter().skip(skip).take(limit).collect();

        Ok(FilteredTodos::new(filter, items, total))
    }
}
