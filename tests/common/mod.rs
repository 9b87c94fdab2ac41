// tests/common/mod.rs

#![allow(dead_code)]

use std::str::FromStr;

use classquiz::{
    config::{Config, MessageDelivery},
    messaging::sink_for,
    routes,
    state::AppState,
    utils::session::{SESSION_COOKIE, SessionClaims, verify_session},
};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub const SESSION_SECRET: &str = "test_secret_for_integration_tests";
pub const PASSWORD: &str = "password123";

pub struct TestApp {
    pub address: String,
    pub pool: SqlitePool,
    pub client: reqwest::Client,
}

/// Spawns the app on a random port over a fresh in-memory database.
pub async fn spawn_app() -> TestApp {
    // A single never-recycled connection keeps the in-memory database alive.
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("Invalid SQLite URL")
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("Failed to open in-memory SQLite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        session_secret: SESSION_SECRET.to_string(),
        session_expiration: 600,
        bind_addr: "127.0.0.1:0".to_string(),
        rust_log: "error".to_string(),
        message_delivery: MessageDelivery::Store,
    };

    let messages = sink_for(config.message_delivery, &pool);
    let state = AppState {
        pool: pool.clone(),
        config,
        messages,
    };
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Redirects are asserted on, never followed.
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        address,
        pool,
        client,
    }
}

/// Value of the session cookie set by a response.
pub fn session_cookie(response: &reqwest::Response) -> Option<String> {
    response
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.value().to_string())
}

/// Decodes the session set by a response.
pub fn session_of(response: &reqwest::Response) -> SessionClaims {
    let token = session_cookie(response).expect("Response did not set a session cookie");
    verify_session(&token, SESSION_SECRET).expect("Session cookie does not verify")
}

pub fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .expect("No Location header")
        .to_str()
        .unwrap()
        .to_string()
}

pub fn unique_name(prefix: &str) -> String {
    format!("{}_{}", prefix, &uuid::Uuid::new_v4().to_string()[..8])
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn get(&self, path: &str, session: Option<&str>) -> reqwest::Response {
        let mut request = self.client.get(self.url(path));
        if let Some(token) = session {
            request = request.header(reqwest::header::COOKIE, format!("{}={}", SESSION_COOKIE, token));
        }
        request.send().await.expect("Failed to execute request")
    }

    pub async fn post_form(
        &self,
        path: &str,
        form: &[(&str, &str)],
        session: Option<&str>,
    ) -> reqwest::Response {
        let mut request = self.client.post(self.url(path)).form(form);
        if let Some(token) = session {
            request = request.header(reqwest::header::COOKIE, format!("{}={}", SESSION_COOKIE, token));
        }
        request.send().await.expect("Failed to execute request")
    }

    pub async fn register(&self, username: &str, is_teacher: bool) -> reqwest::Response {
        let mut form = vec![("username", username), ("password", PASSWORD)];
        if is_teacher {
            form.push(("is_teacher", "on"));
        }
        self.post_form("/register", &form, None).await
    }

    /// Logs in and returns the session token.
    pub async fn login(&self, username: &str) -> String {
        let response = self
            .post_form("/login", &[("username", username), ("password", PASSWORD)], None)
            .await;
        assert_eq!(response.status().as_u16(), 302, "login should redirect");
        session_cookie(&response).expect("login did not set a session")
    }

    /// Registers and logs in a fresh user, returning (user id, session token).
    pub async fn signed_in(&self, prefix: &str, is_teacher: bool) -> (i64, String) {
        let username = unique_name(prefix);
        let response = self.register(&username, is_teacher).await;
        assert_eq!(response.status().as_u16(), 302, "registration should redirect");

        let token = self.login(&username).await;
        let user_id = self.user_id(&username).await;
        (user_id, token)
    }

    pub async fn user_id(&self, username: &str) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .expect("User not found")
    }

    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }
}
