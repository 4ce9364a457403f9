use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use sc_api::{create_router, AppState};
use sc_common::{IntentAction, ScalingIntent};
use tokio::sync::mpsc;
use tower::ServiceExt;

fn app() -> (axum::Router, mpsc::Receiver<ScalingIntent>) {
    let (tx, rx) = mpsc::channel(10);
    let state = AppState::new(tx, None);
    (create_router(state), rx)
}

async fn body_json(res: axum::response::Response) -> serde_json::Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_is_open_and_returns_ok() {
    let (app, _rx) = app();
    let res = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn count_enqueues_a_set_intent() {
    let (app, mut rx) = app();
    let res = app
        .oneshot(
            Request::post("/webhook/workers/count")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"value": 7}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let intent = rx.recv().await.unwrap();
    assert_eq!(intent.target_pool, "workers");
    assert_eq!(intent.action, IntentAction::Set);
    assert_eq!(intent.value, 7);
    assert_eq!(intent.source, "api_count");
    assert!(!intent.dry_run);
}

#[tokio::test]
async fn count_rejects_negative_value() {
    let (app, _rx) = app();
    let res = app
        .oneshot(
            Request::post("/webhook/workers/count")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"value": -1}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res).await;
    assert!(body["error"].as_str().unwrap().contains("non-negative"));
}

#[tokio::test]
async fn count_honors_dry_run_query_param() {
    let (app, mut rx) = app();
    let res = app
        .oneshot(
            Request::post("/webhook/workers/count?dryRun=true")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"value": 3}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let intent = rx.recv().await.unwrap();
    assert!(intent.dry_run);
}

#[tokio::test]
async fn delta_rejects_zero() {
    let (app, _rx) = app();
    let res = app
        .oneshot(
            Request::post("/webhook/workers/delta")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"delta": 0}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delta_enqueues_a_delta_intent() {
    let (app, mut rx) = app();
    let res = app
        .oneshot(
            Request::post("/webhook/workers/delta")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"delta": -2}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let intent = rx.recv().await.unwrap();
    assert_eq!(intent.action, IntentAction::Delta);
    assert_eq!(intent.value, -2);
    assert_eq!(intent.source, "api_delta");
}

#[tokio::test]
async fn invalid_json_body_is_rejected() {
    let (app, _rx) = app();
    let res = app
        .oneshot(
            Request::post("/webhook/workers/count")
                .header("content-type", "application/json")
                .body(Body::from("not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cloudwatch_subscription_confirmation_is_acked_without_an_intent() {
    let (app, mut rx) = app();
    let res = app
        .oneshot(
            Request::post("/webhook/workers/cloudwatch")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"Type": "SubscriptionConfirmation", "Message": "subscribe here"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn cloudwatch_non_alarm_state_is_ignored() {
    let (app, mut rx) = app();
    let message = r#"{"NewStateValue": "OK", "AlarmName": "HighCpu"}"#;
    let body = serde_json::json!({ "Type": "Notification", "Message": message }).to_string();
    let res = app
        .oneshot(
            Request::post("/webhook/workers/cloudwatch")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn cloudwatch_alarm_state_enqueues_a_delta_intent() {
    let (app, mut rx) = app();
    let message = r#"{"NewStateValue": "ALARM", "AlarmName": "HighCpu"}"#;
    let body = serde_json::json!({ "Type": "Notification", "Message": message }).to_string();
    let res = app
        .oneshot(
            Request::post("/webhook/workers/cloudwatch")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let intent = rx.recv().await.unwrap();
    assert_eq!(intent.source, "cloudwatch");
    assert_eq!(intent.action, IntentAction::Delta);
    assert_eq!(intent.value, 1);
}

#[tokio::test]
async fn cloudwatch_unparsable_message_falls_through_as_a_trigger() {
    let (app, mut rx) = app();
    let body = serde_json::json!({ "Type": "Notification", "Message": "not json at all" }).to_string();
    let res = app
        .oneshot(
            Request::post("/webhook/workers/cloudwatch")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let intent = rx.recv().await.unwrap();
    assert_eq!(intent.source, "cloudwatch");
}

#[tokio::test]
async fn prometheus_only_processes_firing_alerts() {
    let (app, mut rx) = app();
    let body = serde_json::json!({
        "alerts": [
            { "labels": { "pool": "workers", "alertname": "HighLoad" }, "status": "resolved" },
            { "labels": { "pool": "workers", "alertname": "HighLoad" }, "status": "firing" },
        ]
    })
    .to_string();
    let res = app
        .oneshot(
            Request::post("/webhook/workers/prometheus")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let intent = rx.recv().await.unwrap();
    assert_eq!(intent.reason, "Alert HighLoad firing");
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn prometheus_falls_back_to_path_pool_when_label_missing() {
    let (app, mut rx) = app();
    let body = serde_json::json!({
        "alerts": [
            { "labels": { "alertname": "HighLoad" }, "status": "firing" },
        ]
    })
    .to_string();
    let res = app
        .oneshot(
            Request::post("/webhook/fallback-pool/prometheus")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let intent = rx.recv().await.unwrap();
    assert_eq!(intent.target_pool, "fallback-pool");
}

#[tokio::test]
async fn auth_gate_rejects_webhooks_without_a_valid_token() {
    let (tx, _rx) = mpsc::channel(10);
    let state = AppState::new(tx, Some("s3cret".to_string()));
    let app = create_router(state);

    let res = app
        .clone()
        .oneshot(
            Request::post("/webhook/workers/count")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"value": 1}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app
        .oneshot(
            Request::post("/webhook/workers/count")
                .header("content-type", "application/json")
                .header("authorization", "Bearer s3cret")
                .body(Body::from(r#"{"value": 1}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn auth_gate_does_not_cover_health() {
    let (tx, _rx) = mpsc::channel(10);
    let state = AppState::new(tx, Some("s3cret".to_string()));
    let app = create_router(state);
    let res = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}
