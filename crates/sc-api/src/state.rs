use std::sync::Arc;

use sc_common::ScalingIntent;
use tokio::sync::mpsc;

/// Shared by every webhook handler. Adapters only ever touch the intent
/// sender — never the rule store, cooldown ledger, or orchestrator
/// directly, which all live downstream of the bus in the engine.
#[derive(Clone)]
pub struct AppState {
    pub intent_tx: mpsc::Sender<ScalingIntent>,
    pub auth_token: Option<Arc<str>>,
}

impl AppState {
    pub fn new(intent_tx: mpsc::Sender<ScalingIntent>, auth_token: Option<String>) -> Self {
        Self {
            intent_tx,
            auth_token: auth_token.map(Arc::from),
        }
    }
}
