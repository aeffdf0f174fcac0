use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::instrument;

use crate::{
    auth::{
        dto::{CredentialsRequest, MeResponse, PublicUser},
        extractors::{session_cookie, session_cookie_removal, AuthUser, MaybeSession},
        jwt::SessionKeys,
        services::{self, IssuedSession},
    },
    error::{Ack, AppError},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(get_me))
}

#[instrument(skip(state, jar, payload))]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload.map_err(|e| AppError::validation(e.body_text()))?;
    let issued = services::register(&state, &payload.username, &payload.password).await?;
    Ok(with_session_cookie(&state, jar, issued))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    // malformed bodies fail like bad credentials
    let Json(payload) =
        payload.map_err(|_| AppError::auth(services::INVALID_CREDENTIALS))?;
    let issued = services::login(&state, &payload.username, &payload.password).await?;
    Ok(with_session_cookie(&state, jar, issued))
}

#[instrument(skip(state, jar, session))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    MaybeSession(session): MaybeSession,
) -> Result<impl IntoResponse, AppError> {
    if let Some(claims) = session {
        services::logout(&state, &claims.sid).await?;
    }
    Ok((jar.remove(session_cookie_removal()), Json(Ack::ok())))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<MeResponse>, AppError> {
    let user = services::whoami(&state, user_id).await?;
    Ok(Json(MeResponse {
        ok: true,
        user: PublicUser {
            id: user.id,
            username: user.username,
        },
    }))
}

fn with_session_cookie(
    state: &AppState,
    jar: CookieJar,
    issued: IssuedSession,
) -> impl IntoResponse {
    let keys = SessionKeys::from_ref(state);
    let cookie = session_cookie(
        issued.token,
        keys.max_age(),
        state.config.session.cookie_secure,
    );
    (jar.add(cookie), Json(Ack::ok()))
}

#[cfg(test)]
mod me_tests {
    use super::*;

    #[test]
    fn test_me_response_serialization() {
        let response = MeResponse {
            ok: true,
            user: PublicUser {
                id: 7,
                username: "alice".to_string(),
            },
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(json["user"]["username"], "alice");
        assert_eq!(json["user"]["id"], 7);
    }
}
