//! # Sessions
//!
//! One shared password unlocks the chat pages. A correct password earns an
//! HS256 token in the `session` cookie, signed with `SESSION_SECRET`, so the
//! server keeps no session table.
use std::{sync::Arc, time::Duration};

use axum::{extract::FromRequestParts, http::request::Parts, response::Redirect};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::debug;

use crate::{state::AppState, utils::cookie_value};

pub const SESSION_COOKIE: &str = "session";
const SUBJECT: &str = "guest";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Invalid session token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: usize,
    exp: usize,
}

/// Compares digests so the time taken does not depend on how much of the
/// guess was right.
pub fn password_matches(candidate: &str, expected: &str) -> bool {
    Sha256::digest(candidate.as_bytes()) == Sha256::digest(expected.as_bytes())
}

pub fn issue_token(secret: &str, ttl: Duration) -> Result<String, SessionError> {
    issue_token_at(secret, Utc::now().timestamp(), ttl)
}

fn issue_token_at(secret: &str, now: i64, ttl: Duration) -> Result<String, SessionError> {
    let iat = now.max(0) as usize;
    let claims = Claims {
        sub: SUBJECT.to_string(),
        iat,
        exp: iat.saturating_add(usize::try_from(ttl.as_secs()).unwrap_or(usize::MAX)),
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

pub fn verify_token(secret: &str, token: &str) -> Result<(), SessionError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )?;

    Ok(())
}

pub fn session_cookie(token: &str, ttl: Duration) -> String {
    format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        ttl.as_secs()
    )
}

pub fn expired_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Extractor for pages behind the password. Anyone without a valid cookie is
/// sent to the login form.
pub struct Session;

impl FromRequestParts<Arc<AppState>> for Session {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = cookie_value(&parts.headers, SESSION_COOKIE) else {
            return Err(Redirect::to("/login"));
        };

        verify_token(&state.config.session_secret, token)
            .map(|_| Session)
            .map_err(|e| {
                debug!("Rejected session: {e}");
                Redirect::to("/login")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "session-secret";

    #[test]
    fn test_password_matches() {
        assert!(password_matches("hunter2", "hunter2"));
        assert!(!password_matches("hunter3", "hunter2"));
        assert!(!password_matches("", "hunter2"));
    }

    #[test]
    fn test_token_round_trip() {
        let token = issue_token(SECRET, Duration::from_secs(60)).unwrap();

        assert!(verify_token(SECRET, &token).is_ok());
    }

    #[test]
    fn test_wrong_secret() {
        let token = issue_token(SECRET, Duration::from_secs(60)).unwrap();

        assert!(verify_token("other-secret", &token).is_err());
    }

    #[test]
    fn test_expired_token() {
        let two_hours_ago = Utc::now().timestamp() - 2 * 60 * 60;
        let token = issue_token_at(SECRET, two_hours_ago, Duration::from_secs(60)).unwrap();

        assert!(verify_token(SECRET, &token).is_err());
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let token = issue_token(SECRET, Duration::from_secs(u64::MAX)).unwrap();

        assert!(verify_token(SECRET, &token).is_ok());
    }

    #[test]
    fn test_garbage_token() {
        assert!(verify_token(SECRET, "not.a.token").is_err());
    }

    #[test]
    fn test_cookies() {
        assert_eq!(
            session_cookie("abc", Duration::from_secs(10)),
            "session=abc; Path=/; HttpOnly; SameSite=Lax; Max-Age=10"
        );
        assert!(expired_cookie().starts_with("session=;"));
        assert!(expired_cookie().ends_with("Max-Age=0"));
    }
}
