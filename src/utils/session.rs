// src/utils/session.rs

use std::{
    convert::Infallible,
    time::{SystemTime, UNIX_EPOCH},
};

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{config::Config, error::AppError};

/// Name of the cookie carrying the signed session.
pub const SESSION_COOKIE: &str = "session";

/// Signed session payload stored client-side.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct SessionClaims {
    /// Logged-in user, absent for anonymous visitors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    /// Role flag cached at login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_teacher: Option<bool>,
    /// Messages waiting to be shown on the next rendered page.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flashes: Vec<String>,
    /// Expiration time as Unix timestamp.
    #[serde(default)]
    pub exp: usize,
}

/// Signs the session claims, setting `exp` to now + `expiration_seconds`.
pub fn sign_session(
    claims: &SessionClaims,
    secret: &str,
    expiration_seconds: u64,
) -> Result<String, AppError> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .as_secs();

    let claims = SessionClaims {
        exp: (now + expiration_seconds) as usize,
        ..claims.clone()
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Verifies and decodes a session token.
///
/// Returns the `SessionClaims` if the signature and expiry are valid.
pub fn verify_session(token: &str, secret: &str) -> Result<SessionClaims, AppError> {
    let token_data = decode(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::AuthError("Invalid session".to_string()))?;

    Ok(token_data.claims)
}

/// Request-scoped session.
///
/// Extracted from the `session` cookie; a missing, tampered or expired
/// cookie yields an empty session. Changes only reach the client once the
/// handler returns the jar produced by [`Session::commit`].
pub struct Session {
    claims: SessionClaims,
    jar: CookieJar,
    secret: String,
    expiration: u64,
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    Config: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = Config::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);

        let claims = match jar.get(SESSION_COOKIE) {
            Some(cookie) => verify_session(cookie.value(), &config.session_secret)
                .unwrap_or_else(|_| {
                    tracing::debug!("Discarding invalid session cookie");
                    SessionClaims::default()
                }),
            None => SessionClaims::default(),
        };

        Ok(Session {
            claims,
            jar,
            secret: config.session_secret,
            expiration: config.session_expiration,
        })
    }
}

impl Session {
    pub fn user_id(&self) -> Option<i64> {
        self.claims.user_id
    }

    pub fn is_teacher(&self) -> bool {
        self.claims.is_teacher.unwrap_or(false)
    }

    /// Marks the session as belonging to `user_id`.
    pub fn log_in(&mut self, user_id: i64, is_teacher: bool) {
        self.claims.user_id = Some(user_id);
        self.claims.is_teacher = Some(is_teacher);
    }

    /// Drops identity and role. Pending flashes survive.
    pub fn log_out(&mut self) {
        self.claims.user_id = None;
        self.claims.is_teacher = None;
    }

    pub fn flash(&mut self, message: impl Into<String>) {
        self.claims.flashes.push(message.into());
    }

    /// Takes the pending flashes; they are gone once the session is committed.
    pub fn take_flashes(&mut self) -> Vec<String> {
        std::mem::take(&mut self.claims.flashes)
    }

    /// Signs the current state into the cookie jar to be returned with the response.
    pub fn commit(self) -> Result<CookieJar, AppError> {
        let token = sign_session(&self.claims, &self.secret, self.expiration)?;

        let cookie = Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build();

        Ok(self.jar.add(cookie))
    }
}
