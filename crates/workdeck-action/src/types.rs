use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Send lifecycle
// =============================================================================

/// Local send state of the selected card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SendState {
    #[default]
    Idle,
    Confirming,
    Sending,
    Sent,
}

impl fmt::Display for SendState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendState::Idle => write!(f, "idle"),
            SendState::Confirming => write!(f, "confirming"),
            SendState::Sending => write!(f, "sending"),
            SendState::Sent => write!(f, "sent"),
        }
    }
}

// =============================================================================
// Output actions
// =============================================================================

/// The six kinds of action reported to the host, one slot each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Select,
    Send,
    Copy,
    Dismiss,
    Jump,
    Command,
}

impl ActionKind {
    pub const ALL: [ActionKind; 6] = [
        ActionKind::Select,
        ActionKind::Send,
        ActionKind::Copy,
        ActionKind::Dismiss,
        ActionKind::Jump,
        ActionKind::Command,
    ];

    /// Name of the host output property backing this slot.
    pub fn output_name(&self) -> &'static str {
        match self {
            ActionKind::Select => "selectedCardId",
            ActionKind::Send => "sendDraftAction",
            ActionKind::Copy => "copyDraftAction",
            ActionKind::Dismiss => "dismissCardAction",
            ActionKind::Jump => "jumpToCardAction",
            ActionKind::Command => "commandAction",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Select => write!(f, "select"),
            ActionKind::Send => write!(f, "send"),
            ActionKind::Copy => write!(f, "copy"),
            ActionKind::Dismiss => write!(f, "dismiss"),
            ActionKind::Jump => write!(f, "jump"),
            ActionKind::Command => write!(f, "command"),
        }
    }
}

/// Confirmed send of a draft reply.
///
/// `edit_distance_ratio` is 0 when the humanized draft went out unchanged,
/// which the host uses to record `SENT_AS_IS` rather than `SENT_EDITED`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendPayload {
    pub card_id: String,
    pub final_text: String,
    pub edit_distance_ratio: u32,
}

/// A command bar submission, with the card open at the time (if any).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandPayload {
    pub command: String,
    pub current_card_id: Option<String>,
}

/// A user action bound for the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputAction {
    Select(String),
    Send(SendPayload),
    Copy(String),
    Dismiss(String),
    Jump(String),
    Command(CommandPayload),
}

impl OutputAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            OutputAction::Select(_) => ActionKind::Select,
            OutputAction::Send(_) => ActionKind::Send,
            OutputAction::Copy(_) => ActionKind::Copy,
            OutputAction::Dismiss(_) => ActionKind::Dismiss,
            OutputAction::Jump(_) => ActionKind::Jump,
            OutputAction::Command(_) => ActionKind::Command,
        }
    }

    /// Slot encoding: structured actions as JSON, simple ones as the bare id.
    pub fn encode(&self) -> serde_json::Result<String> {
        match self {
            OutputAction::Select(id)
            | OutputAction::Copy(id)
            | OutputAction::Dismiss(id)
            | OutputAction::Jump(id) => Ok(id.clone()),
            OutputAction::Send(payload) => serde_json::to_string(payload),
            OutputAction::Command(payload) => serde_json::to_string(payload),
        }
    }
}

/// The host-facing output properties. Empty string means "no action".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputSnapshot {
    pub selected_card_id: String,
    pub send_draft_action: String,
    pub copy_draft_action: String,
    pub dismiss_card_action: String,
    pub jump_to_card_action: String,
    pub command_action: String,
}

impl OutputSnapshot {
    pub fn get(&self, kind: ActionKind) -> &str {
        match kind {
            ActionKind::Select => &self.selected_card_id,
            ActionKind::Send => &self.send_draft_action,
            ActionKind::Copy => &self.copy_draft_action,
            ActionKind::Dismiss => &self.dismiss_card_action,
            ActionKind::Jump => &self.jump_to_card_action,
            ActionKind::Command => &self.command_action,
        }
    }

    pub(crate) fn slot_mut(&mut self, kind: ActionKind) -> &mut String {
        match kind {
            ActionKind::Select => &mut self.selected_card_id,
            ActionKind::Send => &mut self.send_draft_action,
            ActionKind::Copy => &mut self.copy_draft_action,
            ActionKind::Dismiss => &mut self.dismiss_card_action,
            ActionKind::Jump => &mut self.jump_to_card_action,
            ActionKind::Command => &mut self.command_action,
        }
    }

    pub fn is_empty(&self) -> bool {
        ActionKind::ALL.iter().all(|k| self.get(*k).is_empty())
    }

    /// Decode the send slot, if it holds a payload.
    pub fn send_payload(&self) -> Option<SendPayload> {
        serde_json::from_str(&self.send_draft_action).ok()
    }

    /// Decode the command slot, if it holds a payload.
    pub fn command_payload(&self) -> Option<CommandPayload> {
        serde_json::from_str(&self.command_action).ok()
    }
}
