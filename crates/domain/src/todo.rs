use crate::errors::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// ストアが採番する Todo の識別子
///
/// 形式の検証はストア側に任せる。不正な形式の ID は「存在しない」として扱われる。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(pub String);

impl TodoId {
    pub fn from_string(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 永続化済みの Todo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    #[schema(value_type = String, example = "660b793a7b41c2ab12345678")]
    pub id: TodoId,
    #[schema(example = "Buy groceries")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Milk, Bread, and Eggs")]
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// 部分更新を適用する
    ///
    /// 指定されたフィールドのみ変更し、`updated_at` は常に `now` に進める。
    pub fn apply_patch(&mut self, patch: TodoPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        self.updated_at = now;
    }
}

/// POST /todo の入力
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewTodo {
    #[schema(example = "Buy groceries")]
    pub title: String,
    #[serde(default)]
    #[schema(example = "Milk, Bread, and Eggs")]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl NewTodo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            completed: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        validate_title(&self.title)
    }
}

/// PUT /todo/{id} の入力（指定されたフィールドのみ更新する）
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct TodoPatch {
    #[serde(default)]
    #[schema(example = "Updated title")]
    pub title: Option<String>,
    #[serde(default)]
    #[schema(example = "Updated description")]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl TodoPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.is_empty() {
            return Err(DomainError::Validation(
                "At least one of 'title', 'description' or 'completed' is required".to_string(),
            ));
        }
        match &self.title {
            Some(title) => validate_title(title),
            None => Ok(()),
        }
    }
}

fn validate_title(title: &str) -> Result<(), DomainError> {
    if title.trim().is_empty() {
        return Err(DomainError::Validation(
            "Title cannot be empty".to_string(),
        ));
    }
    Ok(())
}
