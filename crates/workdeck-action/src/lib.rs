//! User actions for Workdeck.
//!
//! Owns the per-card send/edit lifecycle and the output channel through
//! which user actions reach the host exactly once.

pub mod error;
pub mod lifecycle;
pub mod outbox;
pub mod types;

pub use error::{LifecycleError, OutboxError};
pub use lifecycle::{validate_transition, SendLifecycle};
pub use outbox::{Notifier, OutputChannel};
pub use types::{ActionKind, CommandPayload, OutputAction, OutputSnapshot, SendPayload, SendState};
