// tests/quiz_tests.rs

mod common;

use common::{TestApp, location, session_of, spawn_app};

async fn create_quiz(app: &TestApp, token: &str, title: &str) -> i64 {
    let response = app.post_form("/create_quiz", &[("title", title)], Some(token)).await;
    assert_eq!(response.status().as_u16(), 302);

    let quiz_id: i64 = sqlx::query_scalar("SELECT id FROM quizzes WHERE title = ?")
        .bind(title)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(location(&response), format!("/quiz/{}/questions", quiz_id));
    quiz_id
}

async fn add_question(app: &TestApp, token: &str, quiz_id: i64, text: &str, answer: &str) -> reqwest::Response {
    app.post_form(
        &format!("/quiz/{}/questions", quiz_id),
        &[("text", text), ("answer", answer)],
        Some(token),
    )
    .await
}

#[tokio::test]
async fn any_logged_in_user_can_create_quiz() {
    let app = spawn_app().await;
    let (student_id, student) = app.signed_in("s", false).await;

    let quiz_id = create_quiz(&app, &student, "Student's own quiz").await;

    let creator_id: i64 = sqlx::query_scalar("SELECT creator_id FROM quizzes WHERE id = ?")
        .bind(quiz_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(creator_id, student_id);
}

#[tokio::test]
async fn anonymous_cannot_create_quiz() {
    let app = spawn_app().await;

    let response = app.post_form("/create_quiz", &[("title", "Ghost")], None).await;

    assert_eq!(response.status().as_u16(), 302);
    assert_eq!(location(&response), "/login");
    assert_eq!(app.count("quizzes").await, 0);
}

#[tokio::test]
async fn empty_quiz_title_rerenders_form() {
    let app = spawn_app().await;
    let (_, token) = app.signed_in("t", true).await;

    let response = app.post_form("/create_quiz", &[("title", "")], Some(&token)).await;

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(app.count("quizzes").await, 0);
}

#[tokio::test]
async fn quiz_and_questions_round_trip() {
    let app = spawn_app().await;
    let (_, token) = app.signed_in("t", true).await;
    let title = "Ünïcode & \"quotes\" <quiz>";
    let text = "What is 6 × 7?\nShow <work>.";
    let answer = " 42 ";

    let quiz_id = create_quiz(&app, &token, title).await;
    let response = add_question(&app, &token, quiz_id, text, answer).await;
    assert_eq!(response.status().as_u16(), 302);
    assert_eq!(location(&response), format!("/quiz/{}/questions", quiz_id));

    let (stored_text, stored_answer, stored_quiz): (String, String, i64) =
        sqlx::query_as("SELECT text, answer, quiz_id FROM questions")
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert_eq!(stored_text, text);
    assert_eq!(stored_answer, answer);
    assert_eq!(stored_quiz, quiz_id);

    let stored_title: String = sqlx::query_scalar("SELECT title FROM quizzes WHERE id = ?")
        .bind(quiz_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(stored_title, title);
}

#[tokio::test]
async fn empty_question_is_rejected() {
    let app = spawn_app().await;
    let (_, token) = app.signed_in("t", true).await;
    let quiz_id = create_quiz(&app, &token, "Empty").await;

    let response = add_question(&app, &token, quiz_id, "", "x").await;

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(app.count("questions").await, 0);
}

#[tokio::test]
async fn only_creator_adds_questions() {
    let app = spawn_app().await;
    let (_, owner) = app.signed_in("t", true).await;
    let (_, other) = app.signed_in("o", true).await;
    let quiz_id = create_quiz(&app, &owner, "Mine").await;

    let form = app.get(&format!("/quiz/{}/questions", quiz_id), Some(&other)).await;
    assert_eq!(form.status().as_u16(), 403);

    let response = add_question(&app, &other, quiz_id, "Intruder?", "yes").await;
    assert_eq!(response.status().as_u16(), 403);
    assert_eq!(app.count("questions").await, 0);
}

#[tokio::test]
async fn missing_quiz_is_404() {
    let app = spawn_app().await;
    let (_, token) = app.signed_in("t", true).await;

    assert_eq!(app.get("/quiz/4242", Some(&token)).await.status().as_u16(), 404);
    assert_eq!(
        add_question(&app, &token, 4242, "q", "a").await.status().as_u16(),
        404
    );
}

#[tokio::test]
async fn taking_a_quiz_hides_answers_and_scores_submissions() {
    let app = spawn_app().await;
    let (_, teacher) = app.signed_in("t", true).await;
    let (_, student) = app.signed_in("s", false).await;

    let quiz_id = create_quiz(&app, &teacher, "Capitals").await;
    add_question(&app, &teacher, quiz_id, "Capital of France?", "SecretParis").await;
    add_question(&app, &teacher, quiz_id, "Capital of Italy?", "SecretRome").await;

    let page = app.get(&format!("/quiz/{}", quiz_id), Some(&student)).await;
    assert_eq!(page.status().as_u16(), 200);
    let body = page.text().await.unwrap();
    assert!(body.contains("Capital of France?"));
    assert!(!body.contains("SecretParis"));

    let ids: Vec<i64> = sqlx::query_scalar("SELECT id FROM questions ORDER BY id")
        .fetch_all(&app.pool)
        .await
        .unwrap();
    let first = format!("q_{}", ids[0]);
    let second = format!("q_{}", ids[1]);

    let result = app
        .post_form(
            &format!("/quiz/{}", quiz_id),
            &[(first.as_str(), "SecretParis"), (second.as_str(), "Milan")],
            Some(&student),
        )
        .await;

    assert_eq!(result.status().as_u16(), 200);
    let body = result.text().await.unwrap();
    assert!(body.contains(r#"<strong class="score">1</strong> of 2"#), "{}", body);
}

#[tokio::test]
async fn taking_a_quiz_requires_login() {
    let app = spawn_app().await;
    let (_, teacher) = app.signed_in("t", true).await;
    let quiz_id = create_quiz(&app, &teacher, "Private").await;

    let response = app.get(&format!("/quiz/{}", quiz_id), None).await;

    assert_eq!(response.status().as_u16(), 302);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn overlong_quiz_title_rerenders_form() {
    let app = spawn_app().await;
    let (_, token) = app.signed_in("t", true).await;
    let title = "q".repeat(6000);

    let response = app.post_form("/create_quiz", &[("title", title.as_str())], Some(&token)).await;

    assert_eq!(response.status().as_u16(), 200);
    assert!(response.text().await.unwrap().contains("at most 200 characters"));
    assert_eq!(app.count("quizzes").await, 0);
}

#[tokio::test]
async fn refreshed_role_is_saved_even_when_quiz_is_missing() {
    let app = spawn_app().await;
    let (student_id, token) = app.signed_in("s", false).await;

    sqlx::query("UPDATE users SET is_teacher = TRUE WHERE id = ?")
        .bind(student_id)
        .execute(&app.pool)
        .await
        .unwrap();

    let missing = app.get("/quiz/4242", Some(&token)).await;
    assert_eq!(missing.status().as_u16(), 404);
    assert_eq!(session_of(&missing).is_teacher, Some(true));

    let forbidden_owner = app.signed_in("o", true).await.1;
    let quiz_id = create_quiz(&app, &forbidden_owner, "Not yours").await;
    let forbidden = app.get(&format!("/quiz/{}/questions", quiz_id), Some(&token)).await;
    assert_eq!(forbidden.status().as_u16(), 403);
    assert_eq!(session_of(&forbidden).user_id, Some(student_id));
}
