use axum::extract::FromRef;
use tracing::{info, warn};

use crate::{
    auth::{
        jwt::SessionKeys,
        password::{hash_password, verify_against_dummy, verify_password},
        repo_types::{Session, User},
    },
    error::AppError,
    state::AppState,
};

/// Uniform message for every login failure.
pub const INVALID_CREDENTIALS: &str = "invalid credentials";

/// A freshly created session and the signed token that points at it.
#[derive(Debug)]
pub struct IssuedSession {
    pub user: User,
    pub session_id: String,
    pub token: String,
}

/// Trims the username and checks that both credentials are present.
pub fn validate_credentials<'a>(
    username: &'a str,
    password: &str,
) -> Result<&'a str, AppError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AppError::validation("username is required"));
    }
    if password.trim().is_empty() {
        return Err(AppError::validation("password is required"));
    }
    Ok(username)
}

pub async fn register(
    st: &AppState,
    username: &str,
    password: &str,
) -> Result<IssuedSession, AppError> {
    let username = validate_credentials(username, password)?;

    let plain = password.to_string();
    let hash = tokio::task::spawn_blocking(move || hash_password(&plain))
        .await
        .map_err(anyhow::Error::from)??;

    let user = match User::create(&st.db, username, &hash).await {
        Ok(u) => u,
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            warn!(username, "username already registered");
            return Err(AppError::Conflict("username already exists".into()));
        }
        Err(e) => return Err(e.into()),
    };

    info!(user_id = user.id, username = %user.username, "user registered");
    open_session(st, user).await
}

pub async fn login(
    st: &AppState,
    username: &str,
    password: &str,
) -> Result<IssuedSession, AppError> {
    let username = username.trim();
    let user = User::find_by_username(&st.db, username).await?;

    let plain = password.to_string();
    let (user, ok) = tokio::task::spawn_blocking(move || match user {
        Some(u) => {
            let ok = verify_password(&plain, &u.password_hash).unwrap_or(false);
            (Some(u), ok)
        }
        None => (None, verify_against_dummy(&plain)),
    })
    .await
    .map_err(anyhow::Error::from)?;

    match (user, ok) {
        (Some(user), true) => {
            info!(user_id = user.id, "user logged in");
            open_session(st, user).await
        }
        (Some(user), false) => {
            warn!(user_id = user.id, "login invalid password");
            Err(AppError::auth(INVALID_CREDENTIALS))
        }
        (None, _) => {
            warn!(username, "login unknown username");
            Err(AppError::auth(INVALID_CREDENTIALS))
        }
    }
}

/// Revokes the session. Unknown ids are ignored.
pub async fn logout(st: &AppState, session_id: &str) -> Result<(), AppError> {
    let removed = Session::delete(&st.db, session_id).await?;
    info!(session_id, removed, "session closed");
    Ok(())
}

pub async fn whoami(st: &AppState, user_id: i64) -> Result<User, AppError> {
    User::find_by_id(&st.db, user_id)
        .await?
        .ok_or_else(|| AppError::auth("user not found"))
}

async fn open_session(st: &AppState, user: User) -> Result<IssuedSession, AppError> {
    let session = Session::create(&st.db, user.id).await?;
    let token = SessionKeys::from_ref(st).sign(user.id, &session.id)?;
    Ok(IssuedSession {
        user,
        session_id: session.id,
        token,
    })
}
