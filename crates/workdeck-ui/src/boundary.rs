//! Render error boundary.
//!
//! Wraps screen rendering so a failure in any view (an error or a panic)
//! degrades to a fallback panel instead of taking the host down. Once
//! tripped the boundary keeps showing the fallback until the user retries.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use workdeck_core::WorkdeckError;

pub const FALLBACK_TITLE: &str = "Something went wrong";
pub const RETRY_LABEL: &str = "Try Again";

/// Identifies one tripped state. A retry only resets the failure it was
/// issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RetryHandle(Uuid);

impl RetryHandle {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fallback {
    pub title: &'static str,
    pub message: String,
    pub retry: RetryHandle,
}

impl fmt::Display for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.message)?;
        writeln!(f, "[{}]", RETRY_LABEL)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rendered<T> {
    Content(T),
    Fallback(Fallback),
}

impl<T> Rendered<T> {
    pub fn content(&self) -> Option<&T> {
        match self {
            Rendered::Content(t) => Some(t),
            Rendered::Fallback(_) => None,
        }
    }

    pub fn fallback(&self) -> Option<&Fallback> {
        match self {
            Rendered::Fallback(fb) => Some(fb),
            Rendered::Content(_) => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct ErrorBoundary {
    failed: Option<Fallback>,
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl ErrorBoundary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_tripped(&self) -> bool {
        self.failed.is_some()
    }

    /// Run `render`, converting an error or panic into a fallback.
    pub fn render<T, F>(&mut self, render: F) -> Rendered<T>
    where
        F: FnOnce() -> Result<T, WorkdeckError>,
    {
        if let Some(fallback) = &self.failed {
            return Rendered::Fallback(fallback.clone());
        }

        let message = match panic::catch_unwind(AssertUnwindSafe(render)) {
            Ok(Ok(content)) => return Rendered::Content(content),
            Ok(Err(e)) => {
                error!(error = %e, "Render failed");
                e.to_string()
            }
            Err(payload) => {
                let msg = panic_message(payload.as_ref());
                error!(panic = %msg, "Render panicked");
                msg
            }
        };

        let fallback = Fallback {
            title: FALLBACK_TITLE,
            message,
            retry: RetryHandle::new(),
        };
        self.failed = Some(fallback.clone());
        Rendered::Fallback(fallback)
    }

    /// Clear the failure so the next render runs again. Returns `false` for
    /// a stale or unknown handle.
    pub fn retry(&mut self, handle: RetryHandle) -> bool {
        match &self.failed {
            Some(fallback) if fallback.retry == handle => {
                info!("Retrying after render failure");
                self.failed = None;
                true
            }
            Some(_) => {
                warn!("Retry handle does not match the current failure");
                false
            }
            None => false,
        }
    }
}
