use sc_common::ScalingIntent;
use tokio::sync::mpsc;

/// Bounded so a slow or stuck engine eventually applies backpressure to
/// the adapters enqueuing onto it, rather than growing without limit.
pub const INTENT_BUS_CAPACITY: usize = 100;

pub type IntentSender = mpsc::Sender<ScalingIntent>;
pub type IntentReceiver = mpsc::Receiver<ScalingIntent>;

pub fn intent_bus() -> (IntentSender, IntentReceiver) {
    mpsc::channel(INTENT_BUS_CAPACITY)
}
