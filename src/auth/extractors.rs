use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::warn;

use super::{claims::Claims, jwt::SessionKeys, repo_types::Session};
use crate::{error::AppError, state::AppState};

pub const SESSION_COOKIE: &str = "dcafolio_session";

/// Guard for session-gated handlers: resolves the caller's user ID or
/// short-circuits with an auth error.
pub struct AuthUser(pub i64);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let candidates = session_tokens(parts);
        if candidates.is_empty() {
            return Err(AppError::auth("not logged in"));
        }

        // a stale cookie must not shadow a valid bearer token
        let keys = SessionKeys::from_ref(state);
        for token in &candidates {
            let claims = match keys.verify(token) {
                Ok(c) => c,
                Err(_) => {
                    warn!("invalid or expired session token");
                    continue;
                }
            };
            if Session::is_active(&state.db, &claims.sid, claims.sub).await? {
                return Ok(AuthUser(claims.sub));
            }
            warn!(user_id = claims.sub, session_id = %claims.sid, "revoked session presented");
        }

        Err(AppError::auth("invalid or expired session"))
    }
}

/// Claims of the presented token, if any verifies. Never rejects.
pub struct MaybeSession(pub Option<Claims>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let keys = SessionKeys::from_ref(state);
        let claims = session_tokens(parts)
            .iter()
            .find_map(|token| keys.verify(token).ok());
        Ok(MaybeSession(claims))
    }
}

/// Tokens presented by the request: session cookie first, then `Authorization: Bearer`.
fn session_tokens(parts: &Parts) -> Vec<String> {
    let jar = CookieJar::from_headers(&parts.headers);
    let from_cookie = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value_trimmed().to_string())
        .filter(|t| !t.is_empty());

    let from_bearer = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|auth| {
            auth.strip_prefix("Bearer ")
                .or_else(|| auth.strip_prefix("bearer "))
        })
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    from_cookie.into_iter().chain(from_bearer).collect()
}

pub fn session_cookie(token: String, max_age_secs: u64, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age_secs as i64))
        .secure(secure)
        .build()
}

/// Template for removing the session cookie from a jar.
pub fn session_cookie_removal() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}
