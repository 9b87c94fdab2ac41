// src/handlers/mod.rs

pub mod auth;
pub mod class;
pub mod contact;
pub mod dashboard;
pub mod home;
pub mod quiz;

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use sqlx::SqlitePool;
use validator::ValidationErrors;

use crate::{error::AppError, models::user::User, utils::session::Session};

/// `302 Found` redirect to `location`.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Commits the session and redirects (302) to `location`.
pub fn redirect_with(session: Session, location: &str) -> Result<Response, AppError> {
    Ok((session.commit()?, found(location)).into_response())
}

/// Answers with `err` while still writing back session changes, such as
/// a role refreshed by [`current_user`].
pub fn fail_with(session: Session, err: AppError) -> Response {
    match session.commit() {
        Ok(jar) => (jar, err).into_response(),
        Err(commit_err) => commit_err.into_response(),
    }
}

/// Sends an anonymous visitor to the login page.
pub fn login_redirect(mut session: Session) -> Result<Response, AppError> {
    session.flash("Please log in first.");
    redirect_with(session, "/login")
}

/// Loads the logged-in user from the database.
///
/// The role is always taken from the row, not from the session. A session
/// pointing at a user that no longer exists is logged out.
pub async fn current_user(
    pool: &SqlitePool,
    session: &mut Session,
) -> Result<Option<User>, AppError> {
    let Some(user_id) = session.user_id() else {
        return Ok(None);
    };

    match User::find(pool, user_id).await? {
        Some(user) => {
            if session.is_teacher() != user.is_teacher {
                tracing::info!(user_id, "Refreshing cached role from the database");
                session.log_in(user.id, user.is_teacher);
            }
            Ok(Some(user))
        }
        None => {
            tracing::warn!(user_id, "Session refers to a missing user, logging out");
            session.log_out();
            Ok(None)
        }
    }
}

/// Flattens validator output into user-facing messages, in a stable order.
pub fn validation_flashes(errors: &ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid.", field),
            })
        })
        .collect();
    messages.sort();
    messages
}
