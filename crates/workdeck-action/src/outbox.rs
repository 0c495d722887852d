//! Output action channel.
//!
//! One write-once-read-once slot per [`ActionKind`]. Handlers [`emit`] into a
//! slot and the host is notified; the host [`drain`]s every slot at once,
//! which clears them. A second emit of the same kind before a drain replaces
//! the first.
//!
//! [`emit`]: OutputChannel::emit
//! [`drain`]: OutputChannel::drain

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, trace};

use crate::error::OutboxError;
use crate::types::{ActionKind, OutputAction, OutputSnapshot};

/// Host callback signalling that outputs changed and should be pulled.
pub type Notifier = Box<dyn Fn()>;

#[derive(Default)]
pub struct OutputChannel {
    slots: BTreeMap<ActionKind, String>,
    notify: Option<Notifier>,
}

impl fmt::Debug for OutputChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputChannel")
            .field("slots", &self.slots)
            .field("notify", &self.notify.is_some())
            .finish()
    }
}

impl OutputChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_notifier(notify: Notifier) -> Self {
        Self {
            slots: BTreeMap::new(),
            notify: Some(notify),
        }
    }

    pub fn set_notifier(&mut self, notify: Notifier) {
        self.notify = Some(notify);
    }

    /// Store `action` in its slot and signal the host.
    pub fn emit(&mut self, action: OutputAction) -> Result<(), OutboxError> {
        let kind = action.kind();
        let encoded = action
            .encode()
            .map_err(|source| OutboxError::Encode { kind, source })?;
        if encoded.is_empty() {
            return Err(OutboxError::EmptyPayload(kind));
        }

        if self.slots.insert(kind, encoded).is_some() {
            debug!(%kind, "Overwriting undrained action");
        } else {
            trace!(%kind, "Action emitted");
        }

        if let Some(notify) = &self.notify {
            notify();
        }
        Ok(())
    }

    /// Pending payload of one slot, without consuming it.
    pub fn peek(&self, kind: ActionKind) -> Option<&str> {
        self.slots.get(&kind).map(String::as_str)
    }

    pub fn has_pending(&self) -> bool {
        !self.slots.is_empty()
    }

    /// Read every slot and reset them all to empty.
    pub fn drain(&mut self) -> OutputSnapshot {
        let mut snapshot = OutputSnapshot::default();
        for (kind, value) in std::mem::take(&mut self.slots) {
            *snapshot.slot_mut(kind) = value;
        }
        snapshot
    }
}
