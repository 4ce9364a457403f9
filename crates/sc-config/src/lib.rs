//! Loads and validates scaling rules from the stack's `pulumiscale` output.

use std::collections::HashMap;

use sc_common::{ScaleError, ScalingRule};
use sc_orchestrator::Orchestrator;
use tracing::warn;

const OUTPUT_KEY: &str = "pulumiscale";

/// Fetches the current rule map from an [`Orchestrator`]'s stack outputs.
pub struct RuleLoader<'o, O> {
    orchestrator: &'o O,
}

impl<'o, O: Orchestrator> RuleLoader<'o, O> {
    pub fn new(orchestrator: &'o O) -> Self {
        Self { orchestrator }
    }

    /// Loads, backfills `pool_name`, and validates every rule. The first
    /// invalid rule aborts the whole load, matching the loader this was
    /// distilled from: a partially-valid rule set is not loaded partially.
    pub async fn load_rules(&self) -> Result<HashMap<String, ScalingRule>, ScaleError> {
        let outputs = self
            .orchestrator
            .stack_outputs()
            .await
            .map_err(|err| ScaleError::RuleStoreLoad {
                output_key: OUTPUT_KEY.to_string(),
                source: serde_json::Error::io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    err.to_string(),
                )),
            })?;

        let raw = outputs.get(OUTPUT_KEY).cloned().unwrap_or(serde_json::Value::Null);
        let mut rules: HashMap<String, ScalingRule> =
            serde_json::from_value(raw).map_err(|source| ScaleError::RuleStoreLoad {
                output_key: OUTPUT_KEY.to_string(),
                source,
            })?;

        for (pool_name, rule) in rules.iter_mut() {
            rule.pool_name = pool_name.clone();
            validate_rule(rule).map_err(|message| ScaleError::Validation {
                pool: pool_name.clone(),
                message,
            })?;
        }

        Ok(rules)
    }

    /// Loads rules, logging and falling back to an empty rule set on
    /// failure rather than treating a bad stack as fatal at startup.
    pub async fn load_rules_or_warn(&self) -> HashMap<String, ScalingRule> {
        match self.load_rules().await {
            Ok(rules) => rules,
            Err(err) => {
                warn!(error = %err, "failed to load scaling rules, starting with none");
                HashMap::new()
            }
        }
    }
}

/// Mirrors the validation performed on each rule by the loader this was
/// distilled from.
pub fn validate_rule(rule: &ScalingRule) -> Result<(), String> {
    if rule.target_urn.is_empty() {
        return Err("targetUrn must not be empty".to_string());
    }
    if rule.config_key.is_empty() {
        return Err("configKey must not be empty".to_string());
    }
    if rule.min < 0 {
        return Err("min must not be negative".to_string());
    }
    if rule.max < rule.min {
        return Err("max must not be less than min".to_string());
    }
    if rule.cooldown_seconds < 0 {
        return Err("cooldownSeconds must not be negative".to_string());
    }
    Ok(())
}
