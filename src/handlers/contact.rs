// src/handlers/contact.rs

use std::sync::Arc;

use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    handlers::{current_user, fail_with, login_redirect, redirect_with, validation_flashes},
    messaging::{MessageSink, OutgoingMessage},
    models::{
        message::{ContactForm, ReceivedMessage},
        user::User,
    },
    utils::session::Session,
    views::{ContactPage, InboxPage, render},
};

async fn load_creator(pool: &SqlitePool, creator_id: i64) -> Result<User, AppError> {
    User::find(pool, creator_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", creator_id)))
}

fn contact_page(mut session: Session, creator: User, message: &str) -> Result<Response, AppError> {
    let page = ContactPage {
        title: format!("Contact {}", creator.username),
        flashes: session.take_flashes(),
        creator,
        message: message.to_string(),
    };

    let body = render(&page)?;
    Ok((session.commit()?, body).into_response())
}

pub async fn contact_form(
    State(pool): State<SqlitePool>,
    mut session: Session,
    Path(creator_id): Path<i64>,
) -> Result<Response, AppError> {
    if current_user(&pool, &mut session).await?.is_none() {
        return login_redirect(session);
    }

    let creator = match load_creator(&pool, creator_id).await {
        Ok(creator) => creator,
        Err(e) => return Ok(fail_with(session, e)),
    };
    contact_page(session, creator, "")
}

/// Sends a message to a quiz creator through the configured sink.
pub async fn contact_quiz_creator(
    State(pool): State<SqlitePool>,
    State(sink): State<Arc<dyn MessageSink>>,
    mut session: Session,
    Path(creator_id): Path<i64>,
    Form(form): Form<ContactForm>,
) -> Result<Response, AppError> {
    let Some(sender) = current_user(&pool, &mut session).await? else {
        return login_redirect(session);
    };

    let creator = match load_creator(&pool, creator_id).await {
        Ok(creator) => creator,
        Err(e) => return Ok(fail_with(session, e)),
    };

    if let Err(validation_errors) = form.validate() {
        for message in validation_flashes(&validation_errors) {
            session.flash(message);
        }
        return contact_page(session, creator, &form.message);
    }

    sink.deliver(&OutgoingMessage {
        sender_id: sender.id,
        recipient_id: creator.id,
        body: form.message,
    })
    .await?;

    tracing::info!(sender_id = sender.id, recipient_id = creator.id, "Message sent");
    session.flash(format!("Your message to {} has been sent.", creator.username));
    redirect_with(session, "/dashboard")
}

/// Lists messages received by the logged-in user, newest first.
pub async fn inbox(
    State(pool): State<SqlitePool>,
    mut session: Session,
) -> Result<Response, AppError> {
    let Some(user) = current_user(&pool, &mut session).await? else {
        return login_redirect(session);
    };

    let messages = sqlx::query_as::<_, ReceivedMessage>(
        r#"
        SELECT m.id, u.username AS sender_name, m.body, m.created_at
        FROM messages m
        JOIN users u ON u.id = m.sender_id
        WHERE m.recipient_id = ?
        ORDER BY m.created_at DESC, m.id DESC
        "#,
    )
    .bind(user.id)
    .fetch_all(&pool)
    .await?;

    let page = InboxPage {
        title: "Messages".to_string(),
        flashes: session.take_flashes(),
        messages,
    };

    let body = render(&page)?;
    Ok((session.commit()?, body).into_response())
}
