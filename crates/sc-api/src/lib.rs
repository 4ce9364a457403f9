//! The HTTP surface: a single `/health` route plus the four webhook
//! adapters, with a bearer-token gate in front of the webhooks when a
//! token is configured.

pub mod adapters;
pub mod auth;
pub mod error;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

pub use state::AppState;

async fn health() -> &'static str {
    "ok"
}

/// Builds the full router: an always-open health check, and the webhook
/// routes behind [`auth::require_bearer`] whenever `state.auth_token` is
/// set (the middleware itself is a no-op when it isn't).
pub fn create_router(state: AppState) -> Router {
    let webhooks = Router::<AppState>::new()
        .route("/webhook/:pool/count", post(adapters::count::handle))
        .route("/webhook/:pool/delta", post(adapters::delta::handle))
        .route("/webhook/:pool/cloudwatch", post(adapters::cloudwatch::handle))
        .route("/webhook/:pool/prometheus", post(adapters::prometheus::handle))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer,
        ));

    Router::<AppState>::new()
        .route("/health", get(health))
        .merge(webhooks)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
