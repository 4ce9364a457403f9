use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use sc_common::{IntentAction, ScalingIntent};
use serde::Deserialize;

use crate::error::AdapterError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct Alert {
    #[serde(default)]
    labels: HashMap<String, String>,
    #[serde(default)]
    #[allow(dead_code)]
    annotations: HashMap<String, String>,
    status: String,
}

#[derive(Debug, Deserialize)]
struct AlertmanagerPayload {
    #[serde(default)]
    alerts: Vec<Alert>,
}

/// Prometheus Alertmanager webhook entry point. Each firing alert's
/// `pool` label names the target pool, falling back to the path segment
/// when the label is absent; resolved alerts become one delta-+1 intent
/// apiece.
pub async fn handle(
    State(state): State<AppState>,
    Path(path_pool): Path<String>,
    body: axum::body::Bytes,
) -> Result<StatusCode, AdapterError> {
    let payload: AlertmanagerPayload = serde_json::from_slice(&body)?;

    for alert in payload.alerts {
        if alert.status != "firing" {
            continue;
        }

        let pool = match alert.labels.get("pool") {
            Some(pool) => pool.clone(),
            None if !path_pool.is_empty() => path_pool.clone(),
            None => continue,
        };

        let alert_name = alert.labels.get("alertname").cloned().unwrap_or_default();
        let intent = ScalingIntent {
            target_pool: pool,
            action: IntentAction::Delta,
            value: 1,
            source: "prometheus".to_string(),
            reason: format!("Alert {alert_name} firing"),
            dry_run: false,
        };

        state
            .intent_tx
            .send(intent)
            .await
            .map_err(|_| AdapterError::BusClosed)?;
    }

    Ok(StatusCode::OK)
}
