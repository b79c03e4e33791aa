//! Route handlers for the dashboard API.

pub mod analytics;
pub mod collections;
pub mod health;
pub mod preferences;

use axum::routing::{get, patch, post, put};
use axum::Router;
use dealer_engine::FilterParams;
use serde_json::Value;

use crate::error::Result;
use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/state", get(collections::state_api))
        // Collections
        .route(
            "/api/collections/:kind",
            get(collections::list_api).post(collections::create_api),
        )
        .route("/api/collections/:kind/fetch", post(collections::fetch_api))
        .route("/api/collections/:kind/flush", post(collections::flush_api))
        .route(
            "/api/collections/:kind/:id",
            patch(collections::update_api).delete(collections::delete_api),
        )
        // Analytics
        .route("/api/analytics/:report", post(analytics::report_api))
        // Preferences
        .route("/api/preferences/widgets", get(preferences::widgets_api))
        .route("/api/preferences/widgets/:widget", put(preferences::set_widget_api))
}

/// Parse an optional JSON body into filter parameters.
pub(crate) fn params_from_body(body: Option<Value>) -> Result<FilterParams> {
    Ok(FilterParams::from_value(&body.unwrap_or(Value::Null))?)
}
