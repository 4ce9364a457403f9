use axum::extract::{Path, State};
use axum::http::StatusCode;
use sc_common::{IntentAction, ScalingIntent};
use serde::Deserialize;
use tracing::info;

use crate::error::AdapterError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct SnsPayload {
    #[serde(rename = "Type")]
    kind: String,
    #[serde(rename = "Message")]
    message: String,
}

#[derive(Debug, Deserialize)]
struct AlarmMessage {
    #[serde(rename = "NewStateValue")]
    new_state_value: String,
}

/// AWS SNS notification entry point for CloudWatch alarms. The alarm
/// payload is itself a JSON string nested inside the SNS envelope's
/// `Message` field; when it doesn't parse as the expected alarm shape,
/// this falls through and treats the notification as a trigger rather
/// than rejecting it, matching the permissive behavior of the system this
/// was distilled from.
pub async fn handle(
    State(state): State<AppState>,
    Path(pool): Path<String>,
    body: axum::body::Bytes,
) -> Result<StatusCode, AdapterError> {
    if pool.is_empty() {
        return Err(AdapterError::Validation("Pool parameter required".to_string()));
    }

    let payload: SnsPayload = serde_json::from_slice(&body)?;

    if payload.kind == "SubscriptionConfirmation" {
        info!("received SNS SubscriptionConfirmation, visit SubscribeURL to confirm");
        return Ok(StatusCode::OK);
    }

    if let Ok(alarm) = serde_json::from_str::<AlarmMessage>(&payload.message) {
        if alarm.new_state_value != "ALARM" {
            return Ok(StatusCode::OK);
        }
    }

    let intent = ScalingIntent {
        target_pool: pool,
        action: IntentAction::Delta,
        value: 1,
        source: "cloudwatch".to_string(),
        reason: "SNS Notification Received".to_string(),
        dry_run: false,
    };

    state
        .intent_tx
        .send(intent)
        .await
        .map_err(|_| AdapterError::BusClosed)?;
    Ok(StatusCode::OK)
}
