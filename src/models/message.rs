// src/models/message.rs

use chrono::NaiveDateTime;
use serde::Deserialize;
use sqlx::FromRow;
use validator::Validate;

/// A received message joined with its sender's name, for the inbox.
#[derive(Debug, Clone, FromRow)]
pub struct ReceivedMessage {
    pub id: i64,
    pub sender_name: String,
    pub body: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ContactForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 2000, message = "Message must be between 1 and 2000 characters."))]
    pub message: String,
}
