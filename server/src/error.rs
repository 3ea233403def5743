use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use error_stack::Report;
use kernel::{KernelError, PublicMessage};
use serde::Serialize;
use std::process::{ExitCode, Termination};

const BOOK_NOT_FOUND: &str = "Kitap bulunamadı";
const INVALID_REQUEST: &str = "Geçersiz istek";
const CONFLICT: &str = "İstek mevcut kayıtlarla çakışıyor";
const TIMEOUT: &str = "İstek zaman aşımına uğradı";
const INTERNAL: &str = "Sunucu hatası";

#[derive(Debug)]
pub struct StackTrace(Report<KernelError>);

impl From<Report<KernelError>> for StackTrace {
    fn from(e: Report<KernelError>) -> Self {
        StackTrace(e)
    }
}

impl Termination for StackTrace {
    fn report(self) -> ExitCode {
        self.0.report()
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[derive(Debug)]
pub struct ErrorStatus(Report<KernelError>);

impl From<Report<KernelError>> for ErrorStatus {
    fn from(e: Report<KernelError>) -> Self {
        ErrorStatus(e)
    }
}

impl ErrorStatus {
    fn public_message(&self) -> Option<&str> {
        self.0
            .downcast_ref::<PublicMessage>()
            .map(|message| message.as_ref().as_str())
    }
}

impl IntoResponse for ErrorStatus {
    fn into_response(self) -> Response {
        let (status, message) = match self.0.current_context() {
            KernelError::Validation => (
                StatusCode::BAD_REQUEST,
                self.public_message().unwrap_or(INVALID_REQUEST),
            ),
            KernelError::NotFound => (StatusCode::NOT_FOUND, BOOK_NOT_FOUND),
            KernelError::Conflict | KernelError::Concurrency => (
                StatusCode::CONFLICT,
                self.public_message().unwrap_or(CONFLICT),
            ),
            KernelError::Timeout => (StatusCode::REQUEST_TIMEOUT, TIMEOUT),
            KernelError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL),
        };
        let status = self.0.downcast_ref::<StatusCode>().copied().unwrap_or(status);
        if status.is_server_error() {
            tracing::error!("{:?}", self.0);
        } else {
            tracing::debug!("{:?}", self.0);
        }
        (status, Json(ErrorResponse::new(message))).into_response()
    }
}
