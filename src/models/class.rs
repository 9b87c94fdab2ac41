// src/models/class.rs

use serde::Deserialize;
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'classes' table in the database.
#[derive(Debug, Clone, FromRow)]
pub struct Class {
    pub id: i64,
    pub name: String,
    /// Owning teacher (`users.id`).
    pub teacher_id: i64,
}

/// Join row between a class and an enrolled student.
#[derive(Debug, Clone, FromRow)]
pub struct ClassStudent {
    pub id: i64,
    pub class_id: i64,
    pub student_id: i64,
}

/// A class listed together with its teacher's name.
#[derive(Debug, Clone, FromRow)]
pub struct ClassListing {
    pub id: i64,
    pub name: String,
    pub teacher_name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateClassForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "Class name is required and must be at most 200 characters."))]
    pub name: String,
}

/// A teacher's own class with its enrolment count.
#[derive(Debug, Clone, FromRow)]
pub struct ClassSummary {
    pub id: i64,
    pub name: String,
    pub student_count: i64,
}
