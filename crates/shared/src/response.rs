//! 全ハンドラ共通のレスポンス封筒（envelope）
//!
//! 成功時 `{ success: true, statusCode, message, data }`、
//! 失敗時 `{ success: false, statusCode, message, error }` を返す。

use crate::errors::{AppError, ErrorCategory};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const INTERNAL_SERVER_ERROR_MESSAGE: &str = "Internal Server Error";
pub const INVALID_DATA_MESSAGE: &str = "Invalid Data Provided";
pub const DUPLICATE_KEY_MESSAGE: &str = "Duplicate Key Error";

/// 成功レスポンス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessResponse<T> {
    pub success: bool,
    pub status_code: u16,
    pub message: String,
    pub data: T,
}

impl<T> SuccessResponse<T> {
    pub fn new(message: impl Into<String>, data: T, status_code: u16) -> Self {
        Self {
            success: true,
            status_code,
            message: message.into(),
            data,
        }
    }

    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::new(message, data, 200)
    }

    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self::new(message, data, 201)
    }
}

/// エラーレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// 常に false
    pub success: bool,
    #[schema(example = 404)]
    pub status_code: u16,
    #[schema(example = "Failed to get todo")]
    pub message: String,
    /// 4xx のときのみ詳細を返す。500 では内部情報を漏らさないため null
    #[schema(example = "Todo not found")]
    pub error: Option<String>,
}

impl ErrorResponse {
    /// AppError から ErrorResponse を作成
    ///
    /// ステータスは `status_override` → 原因別コードの順で決まる。
    /// 500 の場合メッセージは常に汎用の "Internal Server Error" になる。
    /// `error` には `AppError::client_detail` のみを載せる。
    pub fn from_app_error(message: &str, error: &AppError, status_override: Option<u16>) -> Self {
        let status_code = status_override.unwrap_or_else(|| error.http_status_code());

        if status_code >= 500 {
            return Self {
                success: false,
                status_code,
                message: INTERNAL_SERVER_ERROR_MESSAGE.to_string(),
                error: None,
            };
        }

        let message = match error.category() {
            ErrorCategory::Validation => INVALID_DATA_MESSAGE.to_string(),
            ErrorCategory::DuplicateKey => DUPLICATE_KEY_MESSAGE.to_string(),
            _ if message.is_empty() => error.to_string(),
            _ => message.to_string(),
        };

        Self {
            success: false,
            status_code,
            message,
            error: error.client_detail(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_success_envelope_shape() {
        let response = SuccessResponse::created("Todo created successfully", vec![1, 2]);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["statusCode"], 201);
        assert_eq!(json["message"], "Todo created successfully");
        assert_eq!(json["data"], serde_json::json!([1, 2]));
    }

    #[test]
    fn test_not_found_keeps_handler_message() {
        let response =
            ErrorResponse::from_app_error("Failed to get todo", &AppError::not_found("Todo"), None);

        assert!(!response.success);
        assert_eq!(response.status_code, 404);
        assert_eq!(response.message, "Failed to get todo");
        assert_eq!(response.error.as_deref(), Some("Todo not found"));
    }

    #[test]
    fn test_internal_error_hides_cause() {
        let error = AppError::operation(
            "create todo",
            ErrorCategory::Internal,
            io::Error::new(io::ErrorKind::Other, "server selection timeout: 10.0.0.5:27017"),
        );

        let response = ErrorResponse::from_app_error("Failed to create todo", &error, None);
        let json = serde_json::to_string(&response).unwrap();

        assert_eq!(response.status_code, 500);
        assert_eq!(response.message, "Internal Server Error");
        assert!(response.error.is_none());
        assert!(!json.contains("10.0.0.5"));
    }

    #[test]
    fn test_override_wins_over_cause() {
        let response = ErrorResponse::from_app_error(
            "Failed to get todo",
            &AppError::not_found("Todo"),
            Some(500),
        );

        assert_eq!(response.status_code, 500);
        assert_eq!(response.message, "Internal Server Error");
    }

    #[test]
    fn test_validation_and_duplicate_key_messages() {
        let validation = ErrorResponse::from_app_error(
            "Failed to create todo",
            &AppError::Validation("Title cannot be empty".to_string()),
            None,
        );
        assert_eq!(validation.status_code, 400);
        assert_eq!(validation.message, "Invalid Data Provided");
        assert_eq!(
            validation.error.as_deref(),
            Some("Validation failed: Title cannot be empty")
        );

        let duplicate = ErrorResponse::from_app_error(
            "Failed to create todo",
            &AppError::operation(
                "create todo",
                ErrorCategory::DuplicateKey,
                io::Error::new(io::ErrorKind::Other, "E11000 duplicate key"),
            ),
            None,
        );
        assert_eq!(duplicate.status_code, 400);
        assert_eq!(duplicate.message, "Duplicate Key Error");
        assert_eq!(
            duplicate.error.as_deref(),
            Some("Failed to create todo: duplicate key")
        );
    }

    #[test]
    fn test_store_validation_detail_hides_driver_text() {
        let response = ErrorResponse::from_app_error(
            "Failed to create todo",
            &AppError::operation(
                "create todo",
                ErrorCategory::Validation,
                io::Error::new(io::ErrorKind::Other, "Document failed validation: {$jsonSchema: ...}"),
            ),
            None,
        );

        assert_eq!(response.status_code, 400);
        assert_eq!(response.message, "Invalid Data Provided");
        assert_eq!(
            response.error.as_deref(),
            Some("Failed to create todo: document validation failed")
        );
    }

    #[test]
    fn test_internal_cause_stays_hidden_under_4xx_override() {
        let error = AppError::operation(
            "fetch todos",
            ErrorCategory::Internal,
            io::Error::new(io::ErrorKind::Other, "server selection timeout: 10.0.0.5:27017"),
        );

        let response = ErrorResponse::from_app_error("Failed to get todos", &error, Some(409));
        let json = serde_json::to_string(&response).unwrap();

        assert_eq!(response.status_code, 409);
        assert_eq!(response.message, "Failed to get todos");
        assert!(response.error.is_none());
        assert!(!json.contains("10.0.0.5"));
    }

    #[test]
    fn test_empty_message_falls_back_to_error_text() {
        let response = ErrorResponse::from_app_error("", &AppError::not_found("Todo"), None);
        assert_eq!(response.message, "Todo not found");
    }
}
