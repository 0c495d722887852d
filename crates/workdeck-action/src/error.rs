//! Error types for user actions.

use workdeck_core::error::WorkdeckError;
use workdeck_core::CardOutcome;

use crate::types::{ActionKind, SendState};

/// Errors from the send/edit lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("Invalid send transition: {0} -> {1}")]
    InvalidTransition(SendState, SendState),
    #[error("Card {0} is not sendable")]
    NotSendable(String),
    #[error("Card {0} is already resolved as {1}")]
    AlreadyResolved(String, CardOutcome),
    #[error("Card {0} has no draft text to send")]
    EmptyDraft(String),
    #[error("Lifecycle is tracking card {tracked:?}, not {requested}")]
    WrongCard {
        tracked: Option<String>,
        requested: String,
    },
    #[error("Draft cannot be edited while {0}")]
    EditLocked(SendState),
    #[error("Not editing")]
    NotEditing,
}

/// Errors from the output channel.
#[derive(Debug, thiserror::Error)]
pub enum OutboxError {
    #[error("Refusing to emit an empty {0} action")]
    EmptyPayload(ActionKind),
    #[error("Failed to encode {kind} action: {source}")]
    Encode {
        kind: ActionKind,
        #[source]
        source: serde_json::Error,
    },
}

impl From<LifecycleError> for WorkdeckError {
    fn from(err: LifecycleError) -> Self {
        WorkdeckError::Lifecycle(err.to_string())
    }
}

impl From<OutboxError> for WorkdeckError {
    fn from(err: OutboxError) -> Self {
        WorkdeckError::Host(err.to_string())
    }
}
