// src/config.rs

use std::env;
use dotenvy::dotenv;

/// Where messages sent through the contact form end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageDelivery {
    /// Persist into the `messages` table (readable at `/messages`).
    Store,
    /// Only write the message to the log.
    Log,
}

impl MessageDelivery {
    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "log" => MessageDelivery::Log,
            _ => MessageDelivery::Store,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub session_secret: String,
    /// Session cookie lifetime in seconds.
    pub session_expiration: u64,
    pub bind_addr: String,
    pub rust_log: String,
    pub message_delivery: MessageDelivery,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://quiz.db".to_string());

        let session_secret = env::var("SESSION_SECRET")
            .expect("SESSION_SECRET must be set");

        let session_expiration = env::var("SESSION_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(86_400);

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let message_delivery = env::var("MESSAGE_DELIVERY")
            .map(|v| MessageDelivery::parse(&v))
            .unwrap_or(MessageDelivery::Store);

        Self {
            database_url,
            session_secret,
            session_expiration,
            bind_addr,
            rust_log,
            message_delivery,
        }
    }
}
