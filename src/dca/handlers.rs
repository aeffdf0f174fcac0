use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};

use super::{
    dto::{
        AddEntryRequest, DeleteEntryRequest, EntryListResponse, EntryResponse, SummaryResponse,
    },
    services,
};
use crate::{
    auth::AuthUser,
    error::{Ack, AppError},
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/dca/entries", get(list_entries))
        .route("/dca/summary", get(get_summary))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/dca/entries", post(add_entry))
        .route("/dca/entries/delete", post(delete_entry))
}

#[instrument(skip(state))]
pub async fn list_entries(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<EntryListResponse>, AppError> {
    let entries = services::list_entries(&state, user_id).await?;
    Ok(Json(EntryListResponse {
        ok: true,
        entries: entries.into_iter().map(Into::into).collect(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn add_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<AddEntryRequest>, JsonRejection>,
) -> Result<Json<EntryResponse>, AppError> {
    let Json(payload) = payload.map_err(|e| {
        warn!(error = %e, "rejected entry payload");
        AppError::validation(e.body_text())
    })?;
    let entry = services::add_entry(&state, user_id, payload).await?;
    Ok(Json(EntryResponse {
        ok: true,
        entry: entry.into(),
    }))
}

/// Always `{"ok": true}` once the caller is authenticated, whether or not
/// anything was deleted.
#[instrument(skip(state, payload))]
pub async fn delete_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<DeleteEntryRequest>, JsonRejection>,
) -> Result<Json<Ack>, AppError> {
    let entry_id = match payload {
        Ok(Json(DeleteEntryRequest {
            entry_id: Some(id),
        })) => id.get(),
        _ => None,
    };
    let Some(entry_id) = entry_id else {
        return Ok(Json(Ack::ok()));
    };
    services::delete_entry(&state, user_id, entry_id).await?;
    Ok(Json(Ack::ok()))
}

#[instrument(skip(state))]
pub async fn get_summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<SummaryResponse>, AppError> {
    let summary = services::summary(&state, user_id).await?;
    Ok(Json(SummaryResponse { ok: true, summary }))
}
