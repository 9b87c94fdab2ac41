// src/handlers/auth.rs

use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    handlers::{redirect_with, validation_flashes},
    models::user::{LoginForm, RegisterForm, User},
    utils::{
        hash::{hash_password, verify_password},
        session::Session,
    },
    views::{LoginPage, RegisterPage, render},
};

fn register_page(mut session: Session, username: &str, is_teacher: bool) -> Result<Response, AppError> {
    let page = RegisterPage {
        title: "Register".to_string(),
        flashes: session.take_flashes(),
        username: username.to_string(),
        is_teacher,
    };

    let body = render(&page)?;
    Ok((session.commit()?, body).into_response())
}

fn login_page(mut session: Session, username: &str) -> Result<Response, AppError> {
    let page = LoginPage {
        title: "Log in".to_string(),
        flashes: session.take_flashes(),
        username: username.to_string(),
    };

    let body = render(&page)?;
    Ok((session.commit()?, body).into_response())
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}

pub async fn register_form(session: Session) -> Result<Response, AppError> {
    register_page(session, "", false)
}

/// Registers a new user.
///
/// Hashes the password using Argon2 before storing it and redirects to the
/// login page. Empty fields, a taken username or a failed insert re-render
/// the form without creating a row.
pub async fn register(
    State(pool): State<SqlitePool>,
    mut session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    if let Err(validation_errors) = form.validate() {
        for message in validation_flashes(&validation_errors) {
            session.flash(message);
        }
        return register_page(session, &form.username, form.wants_teacher());
    }

    let hashed_password = hash_password(&form.password)?;

    let inserted = sqlx::query("INSERT INTO users (username, password, is_teacher) VALUES (?, ?, ?)")
        .bind(&form.username)
        .bind(&hashed_password)
        .bind(form.wants_teacher())
        .execute(&pool)
        .await;

    match inserted {
        Ok(done) => {
            tracing::info!(
                user_id = done.last_insert_rowid(),
                is_teacher = form.wants_teacher(),
                "Registered user {}",
                form.username
            );
            session.flash("Registration successful. Please log in.");
            redirect_with(session, "/login")
        }
        Err(e) if is_unique_violation(&e) => {
            session.flash(format!("Username '{}' already exists.", form.username));
            register_page(session, &form.username, form.wants_teacher())
        }
        Err(e) => {
            tracing::error!("Failed to register user: {:?}", e);
            session.flash("Registration failed. Please try again.");
            register_page(session, &form.username, form.wants_teacher())
        }
    }
}

pub async fn login_form(session: Session) -> Result<Response, AppError> {
    login_page(session, "")
}

/// Authenticates a user and stores the identity in the session.
///
/// Unknown users and wrong passwords get the same message.
pub async fn login(
    State(pool): State<SqlitePool>,
    mut session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, password, is_teacher FROM users WHERE username = ?",
    )
    .bind(&form.username)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Login DB error: {:?}", e);
        AppError::from(e)
    })?;

    let authenticated = match &user {
        Some(user) => verify_password(&form.password, &user.password)?,
        None => false,
    };

    match user {
        Some(user) if authenticated => {
            tracing::info!(user_id = user.id, "User {} logged in", user.username);
            session.log_in(user.id, user.is_teacher);
            redirect_with(session, "/dashboard")
        }
        _ => {
            tracing::debug!("Failed login attempt for {}", form.username);
            session.log_out();
            session.flash("Invalid username or password.");
            login_page(session, &form.username)
        }
    }
}

/// Clears identity and role from the session. Safe without a session.
pub async fn logout(mut session: Session) -> Result<Response, AppError> {
    if let Some(user_id) = session.user_id() {
        tracing::info!(user_id, "User logged out");
    }
    session.log_out();
    session.flash("You have been logged out.");
    redirect_with(session, "/")
}
