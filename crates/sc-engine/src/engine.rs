use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use sc_common::{IntentAction, ScalingIntent, ScalingRule};
use sc_orchestrator::{Orchestrator, StateManager};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::bus::IntentReceiver;
use crate::cooldown::CooldownLedger;

pub type RuleStore = Arc<HashMap<String, ScalingRule>>;

/// Owns the intent bus's single consumer and serializes every intent
/// through one mutex-guarded critical section, on top of the serialization
/// single ownership of the receiver already gives for free.
pub struct Engine<O> {
    rules: RuleStore,
    state: StateManager<O>,
    cooldown: Mutex<CooldownLedger>,
    receiver: IntentReceiver,
    cancel: CancellationToken,
}

impl<O: Orchestrator> Engine<O> {
    pub fn new(
        rules: RuleStore,
        state: StateManager<O>,
        receiver: IntentReceiver,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            rules,
            state,
            cooldown: Mutex::new(CooldownLedger::new()),
            receiver,
            cancel,
        }
    }

    /// Consumes intents until the bus closes or cancellation fires.
    pub async fn run(&mut self) {
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    info!("engine shutting down");
                    return;
                }
                maybe_intent = self.receiver.recv() => {
                    match maybe_intent {
                        Some(intent) => self.process_intent(intent).await,
                        None => {
                            info!("intent bus closed, engine stopping");
                            return;
                        }
                    }
                }
            }
        }
    }

    /// The per-intent algorithm: rule lookup, cooldown check, current-count
    /// read, target computation, clamping, no-op elision, and either a
    /// preview (dry run) or a guarded apply.
    async fn process_intent(&self, intent: ScalingIntent) {
        let rule = match self.rules.get(&intent.target_pool) {
            Some(rule) => rule.clone(),
            None => {
                error!(pool = %intent.target_pool, "no rule configured, dropping intent");
                return;
            }
        };

        let now = Instant::now();
        {
            let cooldown = self.cooldown.lock();
            if cooldown.is_cooling_down(&rule, now) {
                info!(pool = %rule.pool_name, "cooldown active, skipping intent");
                return;
            }
        }

        let current = match self.state.get_current_count(&rule.config_key).await {
            Ok(count) => Some(count),
            Err(err) => {
                if intent.action == IntentAction::Delta {
                    error!(pool = %rule.pool_name, error = %err, "could not read current count, aborting delta intent");
                    return;
                }
                // A set intent doesn't need the current count to compute its
                // target, but still needs *some* value for the no-op check
                // below; treat the unreadable count as 0, matching the Go
                // original's zero-valued `current` on a failed read.
                warn!(pool = %rule.pool_name, error = %err, "could not read current count, assuming 0 for set intent");
                Some(0)
            }
        };

        let target = match intent.action {
            IntentAction::Set => intent.value,
            IntentAction::Delta => current.expect("delta aborts above when current is unknown") + intent.value,
        };
        let target = rule.clamp(target);

        if let Some(current) = current {
            if target == current {
                info!(pool = %rule.pool_name, target, "target equals current count, no-op");
                return;
            }
        }

        if intent.dry_run {
            match self.state.preview(&rule.target_urn).await {
                Ok(_) => info!(pool = %rule.pool_name, target, "dry-run preview complete"),
                Err(err) => error!(pool = %rule.pool_name, error = %err, "dry-run preview failed"),
            }
            return;
        }

        match self
            .state
            .apply(&rule.config_key, target, &rule.target_urn, &self.cancel)
            .await
        {
            Ok(()) => {
                self.cooldown.lock().record_applied(&rule.pool_name, Instant::now());
                info!(pool = %rule.pool_name, target, source = %intent.source, "applied scaling intent");
            }
            Err(err) => {
                error!(pool = %rule.pool_name, error = %err, "failed to apply scaling intent");
            }
        }
    }
}
