//! Error types for host-driven handlers.

use workdeck_action::{LifecycleError, OutboxError};
use workdeck_core::error::WorkdeckError;
use workdeck_ui::NavigationError;

/// Why a user action was refused. Handlers return these instead of
/// panicking; the surface stays usable and the action can be retried.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("No data yet: the host has not refreshed")]
    NotReady,

    #[error("No card is open")]
    NoCardOpen,

    #[error("Card not in the current collection: {0}")]
    UnknownCard(String),

    #[error("Card has no draft: {0}")]
    NoDraft(String),

    #[error("Card already dismissed: {0}")]
    AlreadyDismissed(String),

    #[error(transparent)]
    Navigation(#[from] NavigationError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Outbox(#[from] OutboxError),
}

impl From<HostError> for WorkdeckError {
    fn from(err: HostError) -> Self {
        match err {
            HostError::Navigation(e) => e.into(),
            HostError::Lifecycle(e) => e.into(),
            HostError::Outbox(e) => e.into(),
            other => WorkdeckError::Host(other.to_string()),
        }
    }
}
