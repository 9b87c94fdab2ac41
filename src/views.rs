// src/views.rs

//! Page models for the askama templates under `templates/`.
//!
//! Every page carries a `title` and the `flashes` taken from the session;
//! both are consumed by `base.html`.

use askama::Template;
use axum::response::Html;

use crate::{
    error::AppError,
    models::{
        class::{ClassListing, ClassSummary},
        message::ReceivedMessage,
        question::Question,
        quiz::{Quiz, QuizListing},
        user::User,
    },
};

/// Renders a template into an HTML response body.
pub fn render<T: Template>(page: &T) -> Result<Html<String>, AppError> {
    Ok(Html(page.render()?))
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomePage {
    pub title: String,
    pub flashes: Vec<String>,
    pub logged_in: bool,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterPage {
    pub title: String,
    pub flashes: Vec<String>,
    pub username: String,
    pub is_teacher: bool,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub title: String,
    pub flashes: Vec<String>,
    pub username: String,
}

#[derive(Template)]
#[template(path = "teacher_dashboard.html")]
pub struct TeacherDashboard {
    pub title: String,
    pub flashes: Vec<String>,
    pub username: String,
    pub classes: Vec<ClassSummary>,
    pub quizzes: Vec<QuizListing>,
}

#[derive(Template)]
#[template(path = "student_dashboard.html")]
pub struct StudentDashboard {
    pub title: String,
    pub flashes: Vec<String>,
    pub username: String,
    pub joined: Vec<ClassListing>,
    pub available: Vec<ClassListing>,
    pub quizzes: Vec<QuizListing>,
}

#[derive(Template)]
#[template(path = "create_class.html")]
pub struct CreateClassPage {
    pub title: String,
    pub flashes: Vec<String>,
    pub name: String,
}

#[derive(Template)]
#[template(path = "create_quiz.html")]
pub struct CreateQuizPage {
    pub title: String,
    pub flashes: Vec<String>,
    pub quiz_title: String,
}

#[derive(Template)]
#[template(path = "questions.html")]
pub struct QuestionsPage {
    pub title: String,
    pub flashes: Vec<String>,
    pub quiz: Quiz,
    pub questions: Vec<Question>,
    pub text: String,
    pub answer: String,
}

#[derive(Template)]
#[template(path = "take_quiz.html")]
pub struct TakeQuizPage {
    pub title: String,
    pub flashes: Vec<String>,
    pub quiz: Quiz,
    pub questions: Vec<Question>,
}

#[derive(Template)]
#[template(path = "quiz_result.html")]
pub struct QuizResultPage {
    pub title: String,
    pub flashes: Vec<String>,
    pub quiz: Quiz,
    pub score: usize,
    pub total: usize,
}

#[derive(Template)]
#[template(path = "contact.html")]
pub struct ContactPage {
    pub title: String,
    pub flashes: Vec<String>,
    pub creator: User,
    pub message: String,
}

#[derive(Template)]
#[template(path = "messages.html")]
pub struct InboxPage {
    pub title: String,
    pub flashes: Vec<String>,
    pub messages: Vec<ReceivedMessage>,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
    pub title: String,
    pub flashes: Vec<String>,
    pub status: u16,
    pub message: String,
}
