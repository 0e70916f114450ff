use mongodb::error::{ErrorKind, WriteFailure};
use shared::ErrorCategory;
use thiserror::Error;

/// MongoDB の一意制約違反
const DUPLICATE_KEY_CODE: i32 = 11000;
/// MongoDB のスキーマ検証エラー
const DOCUMENT_VALIDATION_CODE: i32 = 121;

/// データアクセス層のエラー
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Document validation failed: {0}")]
    Validation(String),

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Malformed document: {0}")]
    Decode(#[from] bson::de::Error),

    #[error("MongoDB error: {0}")]
    Database(#[source] mongodb::error::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            StoreError::Validation(_) => ErrorCategory::Validation,
            StoreError::DuplicateKey(_) => ErrorCategory::DuplicateKey,
            StoreError::Decode(_) | StoreError::Database(_) | StoreError::Unavailable(_) => {
                ErrorCategory::Internal
            }
        }
    }
}

impl From<mongodb::error::Error> for StoreError {
    fn from(e: mongodb::error::Error) -> Self {
        match server_error_code(&e) {
            Some(DUPLICATE_KEY_CODE) => StoreError::DuplicateKey(e.to_string()),
            Some(DOCUMENT_VALIDATION_CODE) => StoreError::Validation(e.to_string()),
            _ => StoreError::Database(e),
        }
    }
}

/// 書き込み・コマンドエラーからサーバーのエラーコードを取り出す
fn server_error_code(e: &mongodb::error::Error) -> Option<i32> {
    match e.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => Some(write_error.code),
        ErrorKind::Command(command_error) => Some(command_error.code),
        _ => None,
    }
}
