use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::{AppError, ErrorResponse};

/// ハンドラの失敗。エラー封筒に変換して返す
#[derive(Debug)]
pub struct ApiError {
    message: String,
    error: AppError,
}

impl ApiError {
    pub fn new(message: impl Into<String>, error: AppError) -> Self {
        Self {
            message: message.into(),
            error,
        }
    }

    pub fn bad_json(message: impl Into<String>, rejection: JsonRejection) -> Self {
        Self::new(message, AppError::Validation(rejection.body_text()))
    }

    pub fn bad_query(message: impl Into<String>, rejection: QueryRejection) -> Self {
        Self::new(message, AppError::Validation(rejection.body_text()))
    }

    pub fn bad_path(message: impl Into<String>, rejection: PathRejection) -> Self {
        Self::new(message, AppError::Validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse::from_app_error(&self.message, &self.error, None);
        let status =
            StatusCode::from_u16(body.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // 原因はサーバー側のログにのみ残す
        if status.is_server_error() {
            tracing::error!(
                status_code = status.as_u16(),
                error = %self.error,
                source = ?std::error::Error::source(&self.error),
                "{}", self.message
            );
        } else {
            tracing::warn!(status_code = status.as_u16(), error = %self.error, "{}", self.message);
        }

        (status, Json(body)).into_response()
    }
}
