use std::path::PathBuf;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::OrchestratorError;
use crate::Orchestrator;

/// Drives a Pulumi stack through the `pulumi` CLI as a subprocess. There is
/// no Automation API for Rust, so this plays the role the Go original gave
/// `auto.UpsertStackLocalSource`.
pub struct PulumiCliOrchestrator {
    stack: String,
    workdir: PathBuf,
}

impl PulumiCliOrchestrator {
    pub fn new(stack: impl Into<String>, workdir: impl Into<PathBuf>) -> Self {
        Self {
            stack: stack.into(),
            workdir: workdir.into(),
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new("pulumi");
        cmd.args(args)
            .arg("--stack")
            .arg(&self.stack)
            .arg("--cwd")
            .arg(&self.workdir);
        cmd
    }

    async fn run(&self, args: &[&str]) -> Result<String, OrchestratorError> {
        debug!(stack = %self.stack, ?args, "running pulumi command");
        let output = self.command(args).output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            return Err(classify(stderr));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Pulumi's CLI has no typed error surface over stdout/stderr; this
/// recognizes the one known conflict text structurally, with the
/// case-insensitive substring check in [`crate::is_conflict`] as fallback
/// for anything else.
fn classify(stderr: String) -> OrchestratorError {
    let lower = stderr.to_lowercase();
    if lower.contains("already being updated") || lower.contains("update already in progress") {
        OrchestratorError::Conflict { message: stderr }
    } else {
        OrchestratorError::Command { stderr }
    }
}

#[async_trait]
impl Orchestrator for PulumiCliOrchestrator {
    async fn stack_outputs(&self) -> Result<serde_json::Value, OrchestratorError> {
        let stdout = self.run(&["stack", "output", "--json"]).await?;
        serde_json::from_str(&stdout).map_err(|_| OrchestratorError::Command {
            stderr: format!("could not parse stack output JSON: {stdout}"),
        })
    }

    async fn get_config(&self, key: &str) -> Result<String, OrchestratorError> {
        self.run(&["config", "get", key]).await.map(|s| s.trim().to_string())
    }

    async fn set_config(&self, key: &str, value: &str) -> Result<(), OrchestratorError> {
        self.run(&["config", "set", key, value]).await?;
        Ok(())
    }

    async fn preview_targeted(&self, urn: &str) -> Result<String, OrchestratorError> {
        self.run(&["preview", "--json", "--target", urn]).await
    }

    async fn up_targeted(&self, urn: &str) -> Result<(), OrchestratorError> {
        self.run(&["up", "--yes", "--target", urn]).await?;
        Ok(())
    }
}
