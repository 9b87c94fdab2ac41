// src/error.rs

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use askama::Template;
use std::fmt;

use crate::views::ErrorPage;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
///
/// Form validation problems are not errors: handlers re-render the form
/// with a flash message instead.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 401 Unauthorized
    AuthError(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Status code and the message that is safe to show to the user.
    fn status_and_message(self) -> (StatusCode, String) {
        match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong on our side. Please try again later.".to_string(),
                )
            }
            AppError::AuthError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        }
    }
}

/// Renders the generic error page for `status`.
///
/// Falls back to plain text if the template itself fails.
pub fn error_page(status: StatusCode, message: String) -> Response {
    let page = ErrorPage {
        title: status
            .canonical_reason()
            .unwrap_or("Error")
            .to_string(),
        flashes: Vec::new(),
        status: status.as_u16(),
        message,
    };

    match page.render() {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render error page: {:?}", e);
            (status, page.message).into_response()
        }
    }
}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into an HTML error page with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        error_page(status, message)
    }
}

/// Converts `sqlx::Error` into `AppError::InternalServerError`.
/// Allows using `?` operator on database queries.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

impl From<askama::Error> for AppError {
    fn from(err: askama::Error) -> Self {
        AppError::InternalServerError(format!("template error: {}", err))
    }
}

/// Installs a panic hook that logs the panic location and a captured
/// backtrace through `tracing`, then defers to the previous hook.
///
/// The catch-panic layer only sees the payload once the stack has
/// unwound, so the backtrace has to be taken here.
pub fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let backtrace = std::backtrace::Backtrace::force_capture();
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "unknown location".to_string());

        tracing::error!("Panic at {}: {}\n{}", location, info, backtrace);
        previous(info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_hook_does_not_interfere_with_unwinding() {
        install_panic_hook();

        let result = std::panic::catch_unwind(|| panic!("handler blew up"));

        assert!(result.is_err());
    }

    #[test]
    fn internal_errors_hide_their_detail() {
        let response =
            AppError::InternalServerError("no such table: questions".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
