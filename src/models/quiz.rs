// src/models/quiz.rs

use serde::Deserialize;
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'quizzes' table in the database.
#[derive(Debug, Clone, FromRow)]
pub struct Quiz {
    pub id: i64,
    pub title: String,
    pub creator_id: i64,
}

impl Quiz {
    pub async fn find(pool: &sqlx::SqlitePool, id: i64) -> Result<Option<Quiz>, sqlx::Error> {
        sqlx::query_as::<_, Quiz>("SELECT id, title, creator_id FROM quizzes WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}

/// A quiz listed together with its creator's name.
#[derive(Debug, Clone, FromRow)]
pub struct QuizListing {
    pub id: i64,
    pub title: String,
    pub creator_id: i64,
    pub creator_name: String,
    pub question_count: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuizForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "Quiz title is required and must be at most 200 characters."))]
    pub title: String,
}
