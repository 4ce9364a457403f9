use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use sc_common::{IntentAction, ScalingIntent};
use serde::Deserialize;

use crate::adapters::count::DryRunQuery;
use crate::error::AdapterError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DeltaRequest {
    pub delta: i64,
}

/// Manual "adjust count by N" entry point.
pub async fn handle(
    State(state): State<AppState>,
    Path(pool): Path<String>,
    Query(query): Query<DryRunQuery>,
    body: axum::body::Bytes,
) -> Result<StatusCode, AdapterError> {
    let req: DeltaRequest = serde_json::from_slice(&body)?;
    if req.delta == 0 {
        return Err(AdapterError::Validation("Delta cannot be zero".to_string()));
    }

    let intent = ScalingIntent {
        target_pool: pool,
        action: IntentAction::Delta,
        value: req.delta,
        source: "api_delta".to_string(),
        reason: "Manual Delta Request".to_string(),
        dry_run: query.dry_run,
    };

    state
        .intent_tx
        .send(intent)
        .await
        .map_err(|_| AdapterError::BusClosed)?;
    Ok(StatusCode::OK)
}
