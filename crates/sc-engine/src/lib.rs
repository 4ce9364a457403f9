//! The control loop's consumer side: the bounded intent bus, the cooldown
//! ledger, and the engine that serializes every intent through a single
//! guarded critical section.

mod bus;
mod cooldown;
mod engine;

pub use bus::{intent_bus, IntentReceiver, IntentSender, INTENT_BUS_CAPACITY};
pub use cooldown::CooldownLedger;
pub use engine::{Engine, RuleStore};
