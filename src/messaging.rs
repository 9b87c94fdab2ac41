// src/messaging.rs

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::{config::MessageDelivery, error::AppError};

/// A message from one user to a quiz creator.
#[derive(Debug, Clone)]
pub struct OutgoingMessage {
    pub sender_id: i64,
    pub recipient_id: i64,
    pub body: String,
}

/// Delivers messages sent through the contact form.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn deliver(&self, message: &OutgoingMessage) -> Result<(), AppError>;
}

/// Persists messages into the `messages` table.
pub struct StoredMessageSink {
    pool: SqlitePool,
}

impl StoredMessageSink {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageSink for StoredMessageSink {
    async fn deliver(&self, message: &OutgoingMessage) -> Result<(), AppError> {
        sqlx::query("INSERT INTO messages (sender_id, recipient_id, body) VALUES (?, ?, ?)")
            .bind(message.sender_id)
            .bind(message.recipient_id)
            .bind(&message.body)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to store message: {:?}", e);
                AppError::from(e)
            })?;

        Ok(())
    }
}

/// Writes messages to the log only.
pub struct LogMessageSink;

#[async_trait]
impl MessageSink for LogMessageSink {
    async fn deliver(&self, message: &OutgoingMessage) -> Result<(), AppError> {
        tracing::info!(
            sender_id = message.sender_id,
            recipient_id = message.recipient_id,
            "Message for quiz creator: {}",
            message.body
        );
        Ok(())
    }
}

/// Builds the sink selected by configuration.
pub fn sink_for(delivery: MessageDelivery, pool: &SqlitePool) -> Arc<dyn MessageSink> {
    match delivery {
        MessageDelivery::Store => Arc::new(StoredMessageSink::new(pool.clone())),
        MessageDelivery::Log => Arc::new(LogMessageSink),
    }
}
