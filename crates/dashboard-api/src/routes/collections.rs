//! Collection routes: reads, filtered fetches and mutations.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use dealer_core::{EntityKind, EntitySet};
use dealer_engine::{EngineError, MutationOutcome, StoreView};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::Result;
use crate::routes::params_from_body;
use crate::state::AppState;

/// Acknowledgement for a fetch that will complete in the background.
#[derive(Debug, Serialize)]
pub struct FetchAccepted {
    pub collection: String,
    pub debounce_ms: u64,
}

/// Whether a flush found a pending fetch to run.
#[derive(Debug, Serialize)]
pub struct FlushResponse {
    pub flushed: bool,
}

fn parse_kind(raw: &str) -> Result<EntityKind> {
    Ok(raw.parse::<EntityKind>().map_err(EngineError::from)?)
}

fn outcome_response(outcome: MutationOutcome, success: StatusCode) -> (StatusCode, Json<MutationOutcome>) {
    let status = if outcome.success {
        success
    } else {
        StatusCode::BAD_REQUEST
    };
    (status, Json(outcome))
}

/// Loading flag, error message and per-collection counts.
pub async fn state_api(State(state): State<AppState>) -> Json<StoreView> {
    Json(state.store.view().await)
}

/// The committed slice of one collection.
pub async fn list_api(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Json<EntitySet>> {
    let kind = parse_kind(&kind)?;
    Ok(Json(state.store.collection(kind).await))
}

/// Queue a filtered fetch. The result is observed through the state and
/// collection endpoints once the debounce window has passed.
pub async fn fetch_api(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    body: Option<Json<Value>>,
) -> Result<(StatusCode, Json<FetchAccepted>)> {
    let kind = parse_kind(&kind)?;
    let params = params_from_body(body.map(|Json(value)| value))?;
    debug!("Queued {} fetch with {:?}", kind, params);

    let store = state.store.clone();
    tokio::spawn(async move { store.fetch(kind, params).await });

    Ok((
        StatusCode::ACCEPTED,
        Json(FetchAccepted {
            collection: kind.collection().to_string(),
            debounce_ms: state.store.debounce().as_millis() as u64,
        }),
    ))
}

/// Run the pending fetch for a collection immediately.
pub async fn flush_api(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Json<FlushResponse>> {
    let kind = parse_kind(&kind)?;
    let flushed = state.store.flush(kind).await;
    Ok(Json(FlushResponse { flushed }))
}

pub async fn create_api(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Json(record): Json<Value>,
) -> Result<(StatusCode, Json<MutationOutcome>)> {
    let kind = parse_kind(&kind)?;
    let outcome = state.store.create_from_json(kind, record).await;
    Ok(outcome_response(outcome, StatusCode::CREATED))
}

pub async fn update_api(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
    Json(patch): Json<Map<String, Value>>,
) -> Result<(StatusCode, Json<MutationOutcome>)> {
    let kind = parse_kind(&kind)?;
    let outcome = state.store.update(kind, &id, &patch).await;
    Ok(outcome_response(outcome, StatusCode::OK))
}

pub async fn delete_api(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<(StatusCode, Json<MutationOutcome>)> {
    let kind = parse_kind(&kind)?;
    let outcome = state.store.delete(kind, &id).await;
    Ok(outcome_response(outcome, StatusCode::OK))
}
