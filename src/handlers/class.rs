// src/handlers/class.rs

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
    models::class::{Class, ClassStudent, CreateClassForm},
    utils::session::Session,
    views::{CreateClassPage, render},
};

fn create_class_page(mut session: Session, name: &str) -> Result<Response, AppError> {
    let page = CreateClassPage {
        title: "Create a class".to_string(),
        flashes: session.take_flashes(),
        name: name.to_string(),
    };

    let body = render(&page)?;
    Ok((session.commit()?, body).into_response())
}

fn not_a_teacher(mut session: Session) -> Result<Response, AppError> {
    session.flash("Only teachers can create classes.");
    redirect_with(session, "/dashboard")
}

pub async fn create_class_form(
    State(pool): State<SqlitePool>,
    mut session: Session,
) -> Result<Response, AppError> {
    match current_user(&pool, &mut session).await? {
        None => login_redirect(session),
        Some(user) if !user.is_teacher => not_a_teacher(session),
        Some(_) => create_class_page(session, ""),
    }
}

/// Creates a class owned by the logged-in teacher.
pub async fn create_class(
    State(pool): State<SqlitePool>,
    mut session: Session,
    Form(form): Form<CreateClassForm>,
) -> Result<Response, AppError> {
    let teacher = match current_user(&pool, &mut session).await? {
        None => return login_redirect(session),
        Some(user) if !user.is_teacher => {
            tracing::warn!(user_id = user.id, "Non-teacher tried to create a class");
            return not_a_teacher(session);
        }
        Some(user) => user,
    };

    if let Err(validation_errors) = form.validate() {
        for message in validation_flashes(&validation_errors) {
            session.flash(message);
        }
        return create_class_page(session, &form.name);
    }

    let class_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO classes (name, teacher_id) VALUES (?, ?) RETURNING id",
    )
    .bind(&form.name)
    .bind(teacher.id)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create class: {:?}", e);
        AppError::from(e)
    })?;

    tracing::info!(class_id, teacher_id = teacher.id, "Class created");
    session.flash(format!("Class '{}' created.", form.name));
    redirect_with(session, "/dashboard")
}

/// Enrols the logged-in student in a class.
pub async fn join_class(
    State(pool): State<SqlitePool>,
    mut session: Session,
    Path(class_id): Path<i64>,
) -> Result<Response, AppError> {
    let Some(student) = current_user(&pool, &mut session).await? else {
        return login_redirect(session);
    };

    if student.is_teacher {
        session.flash("Teachers cannot join classes.");
        return redirect_with(session, "/dashboard");
    }

    let class = sqlx::query_as::<_, Class>("SELECT id, name, teacher_id FROM classes WHERE id = ?")
        .bind(class_id)
        .fetch_optional(&pool)
        .await?;

    let Some(class) = class else {
        return Ok(fail_with(
            session,
            AppError::NotFound(format!("Class {} not found", class_id)),
        ));
    };

    let membership = sqlx::query_as::<_, ClassStudent>(
        "SELECT id, class_id, student_id FROM class_students WHERE class_id = ? AND student_id = ?",
    )
    .bind(class.id)
    .bind(student.id)
    .fetch_optional(&pool)
    .await?;

    if membership.is_some() {
        session.flash(format!("You are already a member of '{}'.", class.name));
        return redirect_with(session, "/dashboard");
    }

    sqlx::query("INSERT INTO class_students (class_id, student_id) VALUES (?, ?)")
        .bind(class.id)
        .bind(student.id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to join class: {:?}", e);
            AppError::from(e)
        })?;

    tracing::info!(class_id = class.id, student_id = student.id, "Student joined class");
    session.flash(format!("You joined '{}'.", class.name));
    redirect_with(session, "/dashboard")
}
