//! Dashboard widget visibility.

use axum::extract::{Path, State};
use axum::Json;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct VisibilityRequest {
    pub visible: bool,
}

#[derive(Debug, Serialize)]
pub struct WidgetVisibility {
    pub widget: String,
    pub visible: bool,
}

/// Widgets with an explicit visibility setting. Unlisted widgets are visible.
pub async fn widgets_api(State(state): State<AppState>) -> Json<IndexMap<String, bool>> {
    Json(state.store.widgets().await)
}

pub async fn set_widget_api(
    State(state): State<AppState>,
    Path(widget): Path<String>,
    Json(req): Json<VisibilityRequest>,
) -> Json<WidgetVisibility> {
    state.store.set_widget_visibility(&widget, req.visible).await;
    Json(WidgetVisibility {
        visible: state.store.widget_visible(&widget).await,
        widget,
    })
}
