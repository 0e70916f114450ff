use thiserror::Error;

/// 入力値の検証で発生するドメインエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid page: {0}")]
    InvalidPage(u64),

    #[error("Invalid limit: {0}")]
    InvalidLimit(u64),
}
