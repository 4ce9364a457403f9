use std::io;

/// Errors surfaced by an [`crate::Orchestrator`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    /// The underlying command (or API call) failed; `stderr` carries
    /// whatever diagnostic text the backend produced.
    #[error("orchestrator command failed: {stderr}")]
    Command { stderr: String },

    /// A structurally-recognized concurrent-update conflict, distinct from
    /// a generic command failure so [`crate::is_conflict`] can check it
    /// first before falling back to substring matching.
    #[error("concurrent stack update: {message}")]
    Conflict { message: String },

    #[error("failed to spawn orchestrator process: {0}")]
    Io(#[from] io::Error),

    #[error("could not parse config value for '{key}': '{value}'")]
    Parse { key: String, value: String },

    #[error("orchestrator operation cancelled")]
    Cancelled,
}

/// Centralizes conflict classification: prefer the structural
/// [`OrchestratorError::Conflict`] variant, fall back to the substring test
/// documented by the system this was distilled from for anything that
/// slips through as a generic command failure.
pub fn is_conflict(err: &OrchestratorError) -> bool {
    match err {
        OrchestratorError::Conflict { .. } => true,
        OrchestratorError::Command { stderr } => {
            let lower = stderr.to_lowercase();
            lower.contains("conflict") || lower.contains("concurrent update")
        }
        _ => false,
    }
}
