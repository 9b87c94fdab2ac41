// src/models/user.rs

use serde::Deserialize;
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,

    /// Unique username.
    pub username: String,

    /// Argon2 password hash. Never the plaintext.
    pub password: String,

    /// Role switch: teachers own classes, students join them.
    pub is_teacher: bool,
}

impl User {
    pub async fn find(pool: &sqlx::SqlitePool, id: i64) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, password, is_teacher FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}

/// Form for creating a new user (Registration).
///
/// Missing fields deserialize as empty so they hit validation instead of
/// an extractor rejection.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Username is required."))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,
    /// Checkbox: present when ticked, whatever its value.
    #[serde(default)]
    pub is_teacher: Option<String>,
}

impl RegisterForm {
    pub fn wants_teacher(&self) -> bool {
        self.is_teacher.is_some()
    }
}

/// Form for user login.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}
