use std::sync::Arc;

use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::{request::Parts, HeaderMap};
use base64::{engine::general_purpose, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Role, User};
use crate::state::AppState;

type HmacSha256 = Hmac<Sha256>;

pub fn hash_password(password: &str) -> String {
    let digest = Sha256::digest(password.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Accounts are restricted to Gmail addresses.
pub fn is_valid_email(email: &str) -> bool {
    let Some(local) = email.strip_suffix("@gmail.com") else {
        return false;
    };
    !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c))
}

/// At least eight characters, with at least one letter and one digit.
pub fn is_strong_password(password: &str) -> bool {
    password.len() >= 8
        && password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
}

#[derive(Debug, Clone)]
pub struct SessionClaims {
    pub user_id: i64,
    pub role: Role,
    pub exp: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid token format")]
    Invalid,
    #[error("signature mismatch")]
    Signature,
    #[error("expired")]
    Expired,
    #[error("bad role")]
    Role,
}

const SESSION_HOURS: i64 = 24;

pub fn sign_session(user_id: i64, role: Role, key: &[u8]) -> Result<String, SessionError> {
    let exp = Utc::now() + Duration::hours(SESSION_HOURS);
    let payload = format!("{}|{}|{}", user_id, role.as_str(), exp.timestamp());
    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| SessionError::Invalid)?;
    mac.update(payload.as_bytes());
    let sig = mac.finalize().into_bytes();
    Ok(format!(
        "{}.{}",
        general_purpose::STANDARD.encode(payload.as_bytes()),
        general_purpose::STANDARD.encode(sig)
    ))
}

pub fn verify_session(token: &str, key: &[u8]) -> Result<SessionClaims, SessionError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 2 {
        return Err(SessionError::Invalid);
    }
    let payload_bytes = general_purpose::STANDARD
        .decode(parts[0])
        .map_err(|_| SessionError::Invalid)?;
    let sig_bytes = general_purpose::STANDARD
        .decode(parts[1])
        .map_err(|_| SessionError::Invalid)?;

    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| SessionError::Invalid)?;
    mac.update(&payload_bytes);
    mac.verify_slice(&sig_bytes)
        .map_err(|_| SessionError::Signature)?;

    let payload = String::from_utf8(payload_bytes).map_err(|_| SessionError::Invalid)?;
    let pieces: Vec<&str> = payload.split('|').collect();
    if pieces.len() != 3 {
        return Err(SessionError::Invalid);
    }
    let user_id: i64 = pieces[0].parse().map_err(|_| SessionError::Invalid)?;
    let role = Role::parse(pieces[1]).ok_or(SessionError::Role)?;
    let exp: i64 = pieces[2].parse().map_err(|_| SessionError::Invalid)?;
    if Utc::now().timestamp() > exp {
        return Err(SessionError::Expired);
    }
    Ok(SessionClaims { user_id, role, exp })
}

/// Token from the Authorization header, or the `session` cookie.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(auth) = headers.get(axum::http::header::AUTHORIZATION) {
        if let Ok(val) = auth.to_str() {
            if let Some(bearer) = val.strip_prefix("Bearer ") {
                return Some(bearer.trim().to_string());
            }
        }
    }
    if let Some(cookie) = headers.get(axum::http::header::COOKIE) {
        if let Ok(val) = cookie.to_str() {
            for pair in val.split(';') {
                if let Some(rest) = pair.trim().strip_prefix("session=") {
                    return Some(rest.to_string());
                }
            }
        }
    }
    None
}

pub fn session_cookie(token: &str) -> String {
    format!(
        "session={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_HOURS * 3600
    )
}

pub fn clear_session_cookie() -> String {
    "session=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0".to_string()
}

/// The authenticated account behind the request. Verifies the token and
/// re-reads the account so a deleted user cannot ride an old session.
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = Arc::<AppState>::from_ref(state);

        let token = extract_token(&parts.headers).ok_or(AppError::Unauthorized)?;
        let claims = verify_session(&token, state.config.session_key.as_bytes()).map_err(|e| {
            tracing::debug!("session rejected: {e}");
            AppError::Unauthorized
        })?;

        let db = state.db.lock().unwrap();
        let user = queries::get_account(&db, claims.user_id)?.ok_or(AppError::Unauthorized)?;

        Ok(CurrentUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8] = b"test-session-key";

    #[test]
    fn test_session_round_trip() {
        let token = sign_session(42, Role::Admin, KEY).unwrap();
        let claims = verify_session(&token, KEY).unwrap();
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.role, Role::Admin);
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let token = sign_session(42, Role::Client, KEY).unwrap();
        let forged = format!("{}{}", &token[..token.len() - 2], "AA");
        assert!(verify_session(&forged, KEY).is_err());
    }

    #[test]
    fn test_wrong_key_rejected() {
        let token = sign_session(42, Role::Client, KEY).unwrap();
        assert!(matches!(
            verify_session(&token, b"other-key"),
            Err(SessionError::Signature)
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(matches!(verify_session("nope", KEY), Err(SessionError::Invalid)));
        assert!(matches!(verify_session("a.b.c", KEY), Err(SessionError::Invalid)));
    }

    #[test]
    fn test_token_extraction_prefers_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(axum::http::header::AUTHORIZATION, "Bearer abc".parse().unwrap());
        headers.insert(axum::http::header::COOKIE, "session=xyz".parse().unwrap());
        assert_eq!(extract_token(&headers).as_deref(), Some("abc"));
    }

    #[test]
    fn test_token_extraction_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::COOKIE,
            "theme=dark; session=xyz; lang=en".parse().unwrap(),
        );
        assert_eq!(extract_token(&headers).as_deref(), Some("xyz"));
    }

    #[test]
    fn test_password_hash_is_stable_hex() {
        let h = hash_password("hunter42x");
        assert_eq!(h.len(), 64);
        assert_eq!(h, hash_password("hunter42x"));
        assert_ne!(h, hash_password("hunter42y"));
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("alice.smith+1@gmail.com"));
        assert!(!is_valid_email("alice@yahoo.com"));
        assert!(!is_valid_email("@gmail.com"));
        assert!(!is_valid_email("al ice@gmail.com"));
    }

    #[test]
    fn test_password_strength() {
        assert!(is_strong_password("abcdefg1"));
        assert!(!is_strong_password("abc1"));
        assert!(!is_strong_password("abcdefgh"));
        assert!(!is_strong_password("12345678"));
    }
}
