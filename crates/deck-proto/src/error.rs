use thiserror::Error;

use crate::launch::LaunchError;

#[derive(Debug, Error)]
pub enum DeckError {
    /// Save blocked: the draft path fails its type's rule.
    #[error("channel {id}: {reason}")]
    InvalidPath { id: String, reason: &'static str },

    /// The in-memory edit stands; only the write failed.
    #[error("failed to persist channels: {0:#}")]
    Persist(anyhow::Error),

    #[error(transparent)]
    Launch(#[from] LaunchError),
}

impl DeckError {
    /// Inline message for the editor / toast.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidPath { reason, .. } => reason.to_string(),
            other => other.to_string(),
        }
    }
}
