// src/routes.rs

use std::any::Any;

use axum::{
    Router,
    http::StatusCode,
    response::Response,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::{
    error::error_page,
    handlers::{auth, class, contact, dashboard, home, quiz},
    state::AppState,
};

/// Last-resort handler: a panicking request is logged and answered with
/// the generic 500 page instead of a dropped connection.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    tracing::error!("Request handler panicked: {}", detail);
    error_page(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Something went wrong on our side. Please try again later.".to_string(),
    )
}

/// Assembles the main application router.
///
/// * Public pages: home, register, login, logout.
/// * Session-backed pages: dashboard, classes, quizzes, messaging.
/// * Global middleware: request tracing and panic recovery.
pub fn create_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/register", get(auth::register_form).post(auth::register))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/logout", get(auth::logout));

    let class_routes = Router::new()
        .route(
            "/create_class",
            get(class::create_class_form).post(class::create_class),
        )
        .route("/join_class/{class_id}", post(class::join_class));

    let quiz_routes = Router::new()
        .route(
            "/create_quiz",
            get(quiz::create_quiz_form).post(quiz::create_quiz),
        )
        .route("/quiz/{quiz_id}", get(quiz::take_quiz).post(quiz::submit_quiz))
        .route(
            "/quiz/{quiz_id}/questions",
            get(quiz::questions_form).post(quiz::add_question),
        );

    let contact_routes = Router::new()
        .route(
            "/contact_quiz_creator/{creator_id}",
            get(contact::contact_form).post(contact::contact_quiz_creator),
        )
        .route("/messages", get(contact::inbox));

    Router::new()
        .route("/", get(home::home))
        .route("/dashboard", get(dashboard::dashboard))
        .merge(auth_routes)
        .merge(class_routes)
        .merge(quiz_routes)
        .merge(contact_routes)
        .fallback(home::not_found)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(handle_panic)),
        )
        .with_state(state)
}
