//! Shared domain types and error kinds for the scaling control loop.

use serde::{Deserialize, Serialize};

/// How a rule's target value should be derived from the pool's current
/// count. Defaults to [`ScalingStrategy::Incremental`] when a rule omits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScalingStrategy {
    #[default]
    Incremental,
    Absolute,
}

/// A single pool's scaling policy, sourced from the stack's
/// `pulumiscale` output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingRule {
    /// Backfilled from the output map key, never read from the JSON body.
    #[serde(skip)]
    pub pool_name: String,
    #[serde(rename = "targetUrn")]
    pub target_urn: String,
    #[serde(rename = "configKey")]
    pub config_key: String,
    pub min: i64,
    pub max: i64,
    /// Wire key is `cooldown`, not `cooldownSeconds` — the stack output's
    /// JSON tag for this field, unlike `targetUrn`/`configKey`, doesn't
    /// match the Rust field name.
    #[serde(rename = "cooldown")]
    pub cooldown_seconds: i64,
    #[serde(default)]
    pub strategy: ScalingStrategy,
}

/// What a [`ScalingIntent`] asks the engine to do to the pool's count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentAction {
    Set,
    Delta,
}

/// A unit of scaling work placed on the intent bus by a webhook adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingIntent {
    #[serde(rename = "targetPool")]
    pub target_pool: String,
    pub action: IntentAction,
    pub value: i64,
    pub source: String,
    pub reason: String,
    #[serde(rename = "dryRun", default)]
    pub dry_run: bool,
}

/// Errors surfaced by rule loading and validation, independent of any
/// particular orchestrator backend.
#[derive(Debug, thiserror::Error)]
pub enum ScaleError {
    #[error("no scaling rule configured for pool '{0}'")]
    UnknownPool(String),

    #[error("failed to load scaling rules from stack output '{output_key}': {source}")]
    RuleStoreLoad {
        output_key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid rule for pool '{pool}': {message}")]
    Validation { pool: String, message: String },
}

pub type Result<T> = std::result::Result<T, ScaleError>;

impl ScalingRule {
    /// Clamps a target count to this rule's `[min, max]` bounds.
    pub fn clamp(&self, target: i64) -> i64 {
        target.clamp(self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_defaults_to_incremental() {
        assert_eq!(ScalingStrategy::default(), ScalingStrategy::Incremental);
    }

    #[test]
    fn clamp_respects_bounds() {
        let rule = ScalingRule {
            pool_name: "workers".into(),
            target_urn: "urn:pulumi:...".into(),
            config_key: "app:workerCount".into(),
            min: 1,
            max: 10,
            cooldown_seconds: 60,
            strategy: ScalingStrategy::Incremental,
        };
        assert_eq!(rule.clamp(-5), 1);
        assert_eq!(rule.clamp(50), 10);
        assert_eq!(rule.clamp(5), 5);
    }

    #[test]
    fn rule_deserializes_camel_case_fields() {
        let json = r#"{"targetUrn":"urn:x","configKey":"k","min":1,"max":5,"cooldown":30}"#;
        let rule: ScalingRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.target_urn, "urn:x");
        assert_eq!(rule.cooldown_seconds, 30);
        assert_eq!(rule.strategy, ScalingStrategy::Incremental);
        assert_eq!(rule.pool_name, "");
    }
}
