// src/handlers/dashboard.rs

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    handlers::{current_user, login_redirect},
    models::{
        class::{ClassListing, ClassSummary},
        quiz::QuizListing,
    },
    utils::session::Session,
    views::{StudentDashboard, TeacherDashboard, render},
};

const QUIZ_LISTING: &str = r#"
    SELECT
        q.id,
        q.title,
        q.creator_id,
        u.username AS creator_name,
        (SELECT COUNT(*) FROM questions qs WHERE qs.quiz_id = q.id) AS question_count
    FROM quizzes q
    JOIN users u ON u.id = q.creator_id
"#;

/// Landing page after login.
///
/// Teachers see the classes they own and their quizzes; students see their
/// classes, the classes open to join and every quiz.
pub async fn dashboard(
    State(pool): State<SqlitePool>,
    mut session: Session,
) -> Result<Response, AppError> {
    let Some(user) = current_user(&pool, &mut session).await? else {
        return login_redirect(session);
    };

    let body = if user.is_teacher {
        let classes = sqlx::query_as::<_, ClassSummary>(
            r#"
            SELECT c.id, c.name, COUNT(cs.id) AS student_count
            FROM classes c
            LEFT JOIN class_students cs ON cs.class_id = c.id
            WHERE c.teacher_id = ?
            GROUP BY c.id, c.name
            ORDER BY c.id
            "#,
        )
        .bind(user.id)
        .fetch_all(&pool)
        .await?;

        let quizzes = sqlx::query_as::<_, QuizListing>(&format!(
            "{} WHERE q.creator_id = ? ORDER BY q.id DESC",
            QUIZ_LISTING
        ))
        .bind(user.id)
        .fetch_all(&pool)
        .await?;

        render(&TeacherDashboard {
            title: "Teacher dashboard".to_string(),
            flashes: session.take_flashes(),
            username: user.username,
            classes,
            quizzes,
        })?
    } else {
        let joined = sqlx::query_as::<_, ClassListing>(
            r#"
            SELECT c.id, c.name, u.username AS teacher_name
            FROM class_students cs
            JOIN classes c ON c.id = cs.class_id
            JOIN users u ON u.id = c.teacher_id
            WHERE cs.student_id = ?
            ORDER BY c.name
            "#,
        )
        .bind(user.id)
        .fetch_all(&pool)
        .await?;

        let available = sqlx::query_as::<_, ClassListing>(
            r#"
            SELECT c.id, c.name, u.username AS teacher_name
            FROM classes c
            JOIN users u ON u.id = c.teacher_id
            WHERE c.id NOT IN (SELECT class_id FROM class_students WHERE student_id = ?)
            ORDER BY c.name
            "#,
        )
        .bind(user.id)
        .fetch_all(&pool)
        .await?;

        let quizzes = sqlx::query_as::<_, QuizListing>(&format!("{} ORDER BY q.id DESC", QUIZ_LISTING))
            .fetch_all(&pool)
            .await?;

        render(&StudentDashboard {
            title: "Student dashboard".to_string(),
            flashes: session.take_flashes(),
            username: user.username,
            joined,
            available,
            quizzes,
        })?
    };

    Ok((session.commit()?, body).into_response())
}
