//! Analytics routes.

use axum::extract::{Path, State};
use axum::Json;
use dealer_engine::Report;
use serde_json::Value;

use crate::error::Result;
use crate::routes::params_from_body;
use crate::state::AppState;

/// Compute a report over the committed collections.
pub async fn report_api(
    State(state): State<AppState>,
    Path(report): Path<String>,
    body: Option<Json<Value>>,
) -> Result<Json<Report>> {
    let params = params_from_body(body.map(|Json(value)| value))?;
    let report = state.store.analytics(&report, &params).await?;
    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealer_engine::{DealerStore, ReportKind, StoreConfig};
    use mock_source::InMemorySource;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_report_with_params() {
        let source = Arc::new(InMemorySource::seeded(5, chrono::Utc::now()));
        let store = DealerStore::new(source, StoreConfig::default());
        store.hydrate().await;
        let state = AppState::new(store);

        let Json(report) = report_api(
            State(state.clone()),
            Path("marketing".to_string()),
            Some(Json(json!({ "dateRange": "all_time", "status": "All" }))),
        )
        .await
        .unwrap();
        assert_eq!(report.report, ReportKind::Campaigns);
        assert!(report.kpi("totalCampaigns").unwrap() > 0.0);

        let missing = report_api(State(state), Path("weather".to_string()), None).await;
        assert!(missing.is_err());
    }
}
