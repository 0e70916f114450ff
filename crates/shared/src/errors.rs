use domain::DomainError;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// エラー原因の分類（HTTP ステータスの決定に使う）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 入力不正・スキーマ違反（400）
    Validation,
    /// 一意制約違反（400）
    DuplicateKey,
    /// 対象が存在しない（404）
    NotFound,
    /// それ以外（500）
    Internal,
}

impl ErrorCategory {
    pub fn http_status_code(self) -> u16 {
        match self {
            ErrorCategory::Validation | ErrorCategory::DuplicateKey => 400,
            ErrorCategory::NotFound => 404,
            ErrorCategory::Internal => 500,
        }
    }
}

/// サービス層が返すエラー
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{resource} not found")]
    NotFound { resource: String },

    /// 下位層の失敗を操作名付きで包む。原因はログ出力用に保持する
    #[error("Failed to {operation}: {source}")]
    Operation {
        operation: String,
        category: ErrorCategory,
        #[source]
        source: BoxError,
    },
}

impl AppError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        AppError::NotFound {
            resource: resource.into(),
        }
    }

    pub fn operation(
        operation: impl Into<String>,
        category: ErrorCategory,
        source: impl Into<BoxError>,
    ) -> Self {
        AppError::Operation {
            operation: operation.into(),
            category,
            source: source.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::Validation(_) => ErrorCategory::Validation,
            AppError::NotFound { .. } => ErrorCategory::NotFound,
            AppError::Operation { category, .. } => *category,
        }
    }

    /// クライアントに返してよい詳細。下位層の原因（ドライバのメッセージ等）は含めない
    ///
    /// `Internal` に分類される失敗は詳細を返さない。
    pub fn client_detail(&self) -> Option<String> {
        match self {
            AppError::Validation(_) | AppError::NotFound { .. } => Some(self.to_string()),
            AppError::Operation {
                operation,
                category,
                ..
            } => match category {
                ErrorCategory::Validation => {
                    Some(format!("Failed to {operation}: document validation failed"))
                }
                ErrorCategory::DuplicateKey => {
                    Some(format!("Failed to {operation}: duplicate key"))
                }
                ErrorCategory::NotFound => Some(format!("Failed to {operation}: not found")),
                ErrorCategory::Internal => None,
            },
        }
    }

    /// HTTPステータスコードを取得
    pub fn http_status_code(&self) -> u16 {
        self.category().http_status_code()
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(message) => AppError::Validation(message),
            other => AppError::Validation(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_http_status_codes() {
        assert_eq!(AppError::Validation("x".to_string()).http_status_code(), 400);
        assert_eq!(AppError::not_found("Todo").http_status_code(), 404);
        assert_eq!(
            AppError::operation(
                "create todo",
                ErrorCategory::DuplicateKey,
                io::Error::new(io::ErrorKind::Other, "E11000")
            )
            .http_status_code(),
            400
        );
        assert_eq!(
            AppError::operation(
                "create todo",
                ErrorCategory::Internal,
                io::Error::new(io::ErrorKind::Other, "connection reset")
            )
            .http_status_code(),
            500
        );
    }

    #[test]
    fn test_operation_error_names_operation_and_keeps_source() {
        let error = AppError::operation(
            "filter todos",
            ErrorCategory::Internal,
            io::Error::new(io::ErrorKind::Other, "socket closed"),
        );

        assert_eq!(error.to_string(), "Failed to filter todos: socket closed");
        let source = std::error::Error::source(&error).unwrap();
        assert_eq!(source.to_string(), "socket closed");
    }

    #[test]
    fn test_client_detail_omits_store_cause() {
        let duplicate = AppError::operation(
            "create todo",
            ErrorCategory::DuplicateKey,
            io::Error::new(
                io::ErrorKind::Other,
                "E11000 duplicate key error collection: todoDB.todos index: title_1 dup key: { title: \"a\" }",
            ),
        );
        assert_eq!(
            duplicate.client_detail().as_deref(),
            Some("Failed to create todo: duplicate key")
        );

        let internal = AppError::operation(
            "fetch todos",
            ErrorCategory::Internal,
            io::Error::new(io::ErrorKind::Other, "connection refused"),
        );
        assert!(internal.client_detail().is_none());

        assert_eq!(
            AppError::not_found("Todo").client_detail().as_deref(),
            Some("Todo not found")
        );
    }

    #[test]
    fn test_domain_error_becomes_validation() {
        let error: AppError = DomainError::Validation("Title cannot be empty".to_string()).into();
        assert_eq!(error.category(), ErrorCategory::Validation);
        assert_eq!(error.to_string(), "Validation failed: Title cannot be empty");

        let error: AppError = DomainError::InvalidPage(0).into();
        assert_eq!(error.to_string(), "Validation failed: Invalid page: 0");
    }
}
