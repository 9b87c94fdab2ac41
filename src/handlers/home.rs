// src/handlers/home.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    error::{AppError, error_page},
    utils::session::Session,
    views::{HomePage, render},
};

pub async fn home(mut session: Session) -> Result<Response, AppError> {
    let page = HomePage {
        title: "Welcome".to_string(),
        flashes: session.take_flashes(),
        logged_in: session.user_id().is_some(),
    };

    let body = render(&page)?;
    Ok((session.commit()?, body).into_response())
}

/// Fallback for unknown paths.
pub async fn not_found() -> Response {
    error_page(StatusCode::NOT_FOUND, "Page not found.".to_string())
}
