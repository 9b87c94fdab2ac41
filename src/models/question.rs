// src/models/question.rs

use serde::Deserialize;
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow)]
pub struct Question {
    pub id: i64,

    /// The prompt shown to quiz takers.
    pub text: String,

    /// The expected answer. Never rendered on the quiz-taking page.
    pub answer: String,

    pub quiz_id: i64,
}

impl Question {
    pub async fn for_quiz(
        pool: &sqlx::SqlitePool,
        quiz_id: i64,
    ) -> Result<Vec<Question>, sqlx::Error> {
        sqlx::query_as::<_, Question>(
            "SELECT id, text, answer, quiz_id FROM questions WHERE quiz_id = ? ORDER BY id",
        )
        .bind(quiz_id)
        .fetch_all(pool)
        .await
    }

    /// Whether a submitted answer matches, ignoring surrounding whitespace.
    pub fn is_correct(&self, submitted: &str) -> bool {
        submitted.trim() == self.answer.trim()
    }
}

/// Form for adding a question to a quiz.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestionForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 1000, message = "Question text must be between 1 and 1000 characters."))]
    pub text: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 500, message = "Answer must be between 1 and 500 characters."))]
    pub answer: String,
}
