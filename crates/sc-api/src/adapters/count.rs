use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use sc_common::{IntentAction, ScalingIntent};
use serde::Deserialize;

use crate::error::AdapterError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CountRequest {
    pub value: i64,
}

#[derive(Debug, Deserialize, Default)]
pub struct DryRunQuery {
    #[serde(rename = "dryRun", default)]
    pub dry_run: bool,
}

/// Manual "set absolute count" entry point.
pub async fn handle(
    State(state): State<AppState>,
    Path(pool): Path<String>,
    Query(query): Query<DryRunQuery>,
    body: axum::body::Bytes,
) -> Result<StatusCode, AdapterError> {
    let req: CountRequest = serde_json::from_slice(&body)?;
    if req.value < 0 {
        return Err(AdapterError::Validation("Value must be non-negative".to_string()));
    }

    let intent = ScalingIntent {
        target_pool: pool,
        action: IntentAction::Set,
        value: req.value,
        source: "api_count".to_string(),
        reason: "Manual Set Request".to_string(),
        dry_run: query.dry_run,
    };

    state
        .intent_tx
        .send(intent)
        .await
        .map_err(|_| AdapterError::BusClosed)?;
    Ok(StatusCode::OK)
}
