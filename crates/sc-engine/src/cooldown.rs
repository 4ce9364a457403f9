use std::collections::HashMap;
use std::time::{Duration, Instant};

use sc_common::ScalingRule;

/// Tracks the last time each pool was actually applied, owned solely by
/// the engine's single consumer task — no external synchronization needed.
#[derive(Default)]
pub struct CooldownLedger {
    last_applied: HashMap<String, Instant>,
}

impl CooldownLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `rule`'s pool is still within its cooldown window.
    pub fn is_cooling_down(&self, rule: &ScalingRule, now: Instant) -> bool {
        match self.last_applied.get(&rule.pool_name) {
            Some(&last) => {
                now.duration_since(last) < Duration::from_secs(rule.cooldown_seconds.max(0) as u64)
            }
            None => false,
        }
    }

    /// Records a successful apply. Never called on dry-run or no-op paths.
    pub fn record_applied(&mut self, pool_name: &str, at: Instant) {
        self.last_applied.insert(pool_name.to_string(), at);
    }
}
