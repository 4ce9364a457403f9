use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::error::{is_conflict, OrchestratorError};
use crate::Orchestrator;

const MAX_RETRIES: u32 = 5;
const BASE_DELAY: Duration = Duration::from_secs(1);

/// Wraps an [`Orchestrator`] with the read/write operations the engine
/// needs, retrying `up_targeted` across concurrent-update conflicts.
pub struct StateManager<O> {
    orchestrator: O,
}

impl<O: Orchestrator> StateManager<O> {
    pub fn new(orchestrator: O) -> Self {
        Self { orchestrator }
    }

    /// Reads the pool's current count from its config key.
    pub async fn get_current_count(&self, config_key: &str) -> Result<i64, OrchestratorError> {
        let raw = self.orchestrator.get_config(config_key).await?;
        raw.trim()
            .parse::<i64>()
            .map_err(|_| OrchestratorError::Parse {
                key: config_key.to_string(),
                value: raw,
            })
    }

    /// Previews the targeted convergence without writing config or
    /// applying anything (the dry-run path).
    pub async fn preview(&self, target_urn: &str) -> Result<String, OrchestratorError> {
        self.orchestrator.preview_targeted(target_urn).await
    }

    /// Writes the new config value, then retries the targeted `up` across
    /// concurrent-update conflicts with exponential backoff, cancellable
    /// via `cancel`.
    pub async fn apply(
        &self,
        config_key: &str,
        value: i64,
        target_urn: &str,
        cancel: &CancellationToken,
    ) -> Result<(), OrchestratorError> {
        self.orchestrator
            .set_config(config_key, &value.to_string())
            .await?;
        self.retry_on_concurrency(target_urn, cancel).await
    }

    async fn retry_on_concurrency(
        &self,
        target_urn: &str,
        cancel: &CancellationToken,
    ) -> Result<(), OrchestratorError> {
        // MAX_RETRIES retries means MAX_RETRIES + 1 attempts total: the
        // initial try plus one after each of the 5 backoff delays.
        for attempt in 0..=MAX_RETRIES {
            match self.orchestrator.up_targeted(target_urn).await {
                Ok(()) => return Ok(()),
                Err(err) if is_conflict(&err) => {
                    if attempt == MAX_RETRIES {
                        return Err(OrchestratorError::Command {
                            stderr: format!("max retries exceeded for concurrent update: {err}"),
                        });
                    }
                    let delay = BASE_DELAY * 2u32.pow(attempt);
                    warn!(target_urn, attempt, ?delay, "concurrent update, retrying");
                    tokio::select! {
                        _ = cancel.cancelled() => return Err(OrchestratorError::Cancelled),
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                Err(err) => return Err(err),
            }
        }
        unreachable!("loop either returns or errors before exhausting MAX_RETRIES")
    }
}
