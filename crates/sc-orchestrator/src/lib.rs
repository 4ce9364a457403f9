//! The boundary between the scaling engine and whatever drives the
//! infrastructure-as-code stack. Today that's the `pulumi` CLI, shelled out
//! to; the trait exists so the engine and the retry wrapper never need to
//! know that.

mod error;
mod pulumi_cli;
mod state_manager;

pub use error::{is_conflict, OrchestratorError};
pub use pulumi_cli::PulumiCliOrchestrator;
pub use state_manager::StateManager;

use async_trait::async_trait;

/// The four stack operations the control loop needs: read the rule map,
/// read/write a single config key, and preview or apply a targeted
/// convergence of one resource.
#[async_trait]
pub trait Orchestrator: Send + Sync {
    async fn stack_outputs(&self) -> Result<serde_json::Value, OrchestratorError>;
    async fn get_config(&self, key: &str) -> Result<String, OrchestratorError>;
    async fn set_config(&self, key: &str, value: &str) -> Result<(), OrchestratorError>;
    async fn preview_targeted(&self, urn: &str) -> Result<String, OrchestratorError>;
    async fn up_targeted(&self, urn: &str) -> Result<(), OrchestratorError>;
}
