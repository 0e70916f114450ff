use crate::errors::DomainError;
use crate::todo::Todo;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;

/// 絞り込み + ページング条件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoFilter {
    /// 1 始まりのページ番号
    pub page: u64,
    /// 1 ページあたりの件数
    pub limit: u64,
    /// タイトルの部分一致（大文字小文字を区別しない）
    pub title: Option<String>,
    /// 指定時のみ完了状態で絞り込む
    pub completed: Option<bool>,
}

impl Default for TodoFilter {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            title: None,
            completed: None,
        }
    }
}

impl TodoFilter {
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page,
            limit,
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.page == 0 {
            return Err(DomainError::InvalidPage(self.page));
        }
        if self.limit == 0 {
            return Err(DomainError::InvalidLimit(self.limit));
        }
        Ok(())
    }

    /// 読み飛ばす件数 `(page - 1) * limit`
    pub fn skip(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// 総ページ数 `ceil(total / limit)`
    pub fn pages(&self, total: u64) -> u64 {
        if self.limit == 0 {
            return 0;
        }
        total.div_ceil(self.limit)
    }

    /// タイトル条件に一致するか（InMemory 実装用）
    pub fn matches(&self, todo: &Todo) -> bool {
        let title_ok = match &self.title {
            Some(needle) => todo
                .title
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            None => true,
        };
        let completed_ok = match self.completed {
            Some(completed) => todo.completed == completed,
            None => true,
        };
        title_ok && completed_ok
    }
}

/// 絞り込み結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FilteredTodos {
    /// `updatedAt` の降順
    pub items: Vec<Todo>,
    /// ページング前の一致件数
    pub total: u64,
    pub page: u64,
    pub pages: u64,
}

impl FilteredTodos {
    pub fn new(filter: &TodoFilter, items: Vec<Todo>, total: u64) -> Self {
        Self {
            items,
            total,
            page: filter.page,
            pages: filter.pages(total),
        }
    }
}
