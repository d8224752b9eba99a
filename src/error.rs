use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::services::report::ReportError;

/// Error surface of the HTTP API. Every variant renders as a plain-text
/// body with a human-readable message; internal causes are logged and
/// replaced by a generic message.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("{0}")]
    Validation(&'static str),
    #[error("Ошибка при обращении к сервису генерации отчётов")]
    Completion(#[source] anyhow::Error),
    #[error("Внутренняя ошибка сервера")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Completion(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Completion(cause) => {
                tracing::error!("completion service failure: {cause:#}");
            }
            ApiError::Internal(cause) => {
                tracing::error!("internal error: {cause:#}");
            }
            _ => {}
        }
        (self.status(), self.to_string()).into_response()
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::Completion(cause) => ApiError::Completion(cause),
            ReportError::Storage(cause) => ApiError::Internal(cause),
        }
    }
}
