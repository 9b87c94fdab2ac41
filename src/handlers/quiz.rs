// src/handlers/quiz.rs

use std::collections::HashMap;

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
    models::{
        question::{CreateQuestionForm, Question},
        quiz::{CreateQuizForm, Quiz},
        user::User,
    },
    utils::session::Session,
    views::{CreateQuizPage, QuestionsPage, QuizResultPage, TakeQuizPage, render},
};

fn create_quiz_page(mut session: Session, quiz_title: &str) -> Result<Response, AppError> {
    let page = CreateQuizPage {
        title: "Create a quiz".to_string(),
        flashes: session.take_flashes(),
        quiz_title: quiz_title.to_string(),
    };

    let body = render(&page)?;
    Ok((session.commit()?, body).into_response())
}

async fn load_quiz(pool: &SqlitePool, quiz_id: i64) -> Result<Quiz, AppError> {
    Quiz::find(pool, quiz_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Quiz {} not found", quiz_id)))
}

/// Loads a quiz that `user` is allowed to edit.
async fn load_own_quiz(pool: &SqlitePool, quiz_id: i64, user: &User) -> Result<Quiz, AppError> {
    let quiz = load_quiz(pool, quiz_id).await?;
    if quiz.creator_id != user.id {
        tracing::warn!(quiz_id, user_id = user.id, "Edit attempt on someone else's quiz");
        return Err(AppError::Forbidden(
            "Only the quiz creator can edit its questions.".to_string(),
        ));
    }
    Ok(quiz)
}

async fn questions_page(
    pool: &SqlitePool,
    mut session: Session,
    quiz: Quiz,
    form: Option<&CreateQuestionForm>,
) -> Result<Response, AppError> {
    let questions = Question::for_quiz(pool, quiz.id).await?;

    let page = QuestionsPage {
        title: "Questions".to_string(),
        flashes: session.take_flashes(),
        quiz,
        questions,
        text: form.map(|f| f.text.clone()).unwrap_or_default(),
        answer: form.map(|f| f.answer.clone()).unwrap_or_default(),
    };

    let body = render(&page)?;
    Ok((session.commit()?, body).into_response())
}

pub async fn create_quiz_form(
    State(pool): State<SqlitePool>,
    mut session: Session,
) -> Result<Response, AppError> {
    match current_user(&pool, &mut session).await? {
        Some(_) => create_quiz_page(session, ""),
        None => login_redirect(session),
    }
}

/// Creates a quiz owned by the logged-in user. Any role may create quizzes.
pub async fn create_quiz(
    State(pool): State<SqlitePool>,
    mut session: Session,
    Form(form): Form<CreateQuizForm>,
) -> Result<Response, AppError> {
    let Some(creator) = current_user(&pool, &mut session).await? else {
        return login_redirect(session);
    };

    if let Err(validation_errors) = form.validate() {
        for message in validation_flashes(&validation_errors) {
            session.flash(message);
        }
        return create_quiz_page(session, &form.title);
    }

    let quiz_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO quizzes (title, creator_id) VALUES (?, ?) RETURNING id",
    )
    .bind(&form.title)
    .bind(creator.id)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create quiz: {:?}", e);
        AppError::from(e)
    })?;

    tracing::info!(quiz_id, creator_id = creator.id, "Quiz created");
    session.flash(format!("Quiz '{}' created. Add some questions.", form.title));
    redirect_with(session, &format!("/quiz/{}/questions", quiz_id))
}

pub async fn questions_form(
    State(pool): State<SqlitePool>,
    mut session: Session,
    Path(quiz_id): Path<i64>,
) -> Result<Response, AppError> {
    let Some(user) = current_user(&pool, &mut session).await? else {
        return login_redirect(session);
    };

    let quiz = match load_own_quiz(&pool, quiz_id, &user).await {
        Ok(quiz) => quiz,
        Err(e) => return Ok(fail_with(session, e)),
    };
    questions_page(&pool, session, quiz, None).await
}

/// Adds a question to a quiz. Creator only.
pub async fn add_question(
    State(pool): State<SqlitePool>,
    mut session: Session,
    Path(quiz_id): Path<i64>,
    Form(form): Form<CreateQuestionForm>,
) -> Result<Response, AppError> {
    let Some(user) = current_user(&pool, &mut session).await? else {
        return login_redirect(session);
    };

    let quiz = match load_own_quiz(&pool, quiz_id, &user).await {
        Ok(quiz) => quiz,
        Err(e) => return Ok(fail_with(session, e)),
    };

    if let Err(validation_errors) = form.validate() {
        for message in validation_flashes(&validation_errors) {
            session.flash(message);
        }
        return questions_page(&pool, session, quiz, Some(&form)).await;
    }

    let question_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO questions (text, answer, quiz_id) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(&form.text)
    .bind(&form.answer)
    .bind(quiz.id)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to add question: {:?}", e);
        AppError::from(e)
    })?;

    tracing::info!(question_id, quiz_id = quiz.id, "Question added");
    session.flash("Question added.");
    redirect_with(session, &format!("/quiz/{}/questions", quiz.id))
}

/// Shows a quiz's questions without their answers.
pub async fn take_quiz(
    State(pool): State<SqlitePool>,
    mut session: Session,
    Path(quiz_id): Path<i64>,
) -> Result<Response, AppError> {
    if current_user(&pool, &mut session).await?.is_none() {
        return login_redirect(session);
    }

    let quiz = match load_quiz(&pool, quiz_id).await {
        Ok(quiz) => quiz,
        Err(e) => return Ok(fail_with(session, e)),
    };
    let questions = Question::for_quiz(&pool, quiz.id).await?;

    let page = TakeQuizPage {
        title: quiz.title.clone(),
        flashes: session.take_flashes(),
        quiz,
        questions,
    };

    let body = render(&page)?;
    Ok((session.commit()?, body).into_response())
}

/// Counts answers that match the stored ones.
///
/// Answers are read from `q_<question id>` fields; missing fields count as wrong.
fn score(questions: &[Question], answers: &HashMap<String, String>) -> usize {
    questions
        .iter()
        .filter(|question| {
            answers
                .get(&format!("q_{}", question.id))
                .is_some_and(|submitted| question.is_correct(submitted))
        })
        .count()
}

/// Grades a submitted quiz. Nothing is persisted.
pub async fn submit_quiz(
    State(pool): State<SqlitePool>,
    mut session: Session,
    Path(quiz_id): Path<i64>,
    Form(answers): Form<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let Some(user) = current_user(&pool, &mut session).await? else {
        return login_redirect(session);
    };

    let quiz = match load_quiz(&pool, quiz_id).await {
        Ok(quiz) => quiz,
        Err(e) => return Ok(fail_with(session, e)),
    };
    let questions = Question::for_quiz(&pool, quiz.id).await?;
    let correct = score(&questions, &answers);

    tracing::info!(quiz_id = quiz.id, user_id = user.id, correct, total = questions.len(), "Quiz submitted");

    let page = QuizResultPage {
        title: format!("Results: {}", quiz.title),
        flashes: session.take_flashes(),
        quiz,
        score: correct,
        total: questions.len(),
    };

    let body = render(&page)?;
    Ok((session.commit()?, body).into_response())
}
