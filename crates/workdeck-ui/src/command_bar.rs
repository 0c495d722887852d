//! Command bar: a session-scoped transcript with the orchestrator agent.
//!
//! The widget never talks to the orchestrator directly. A submission is
//! emitted as a command action; the host runs it and pushes the reply back
//! as a JSON string on a later refresh, together with a processing flag.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use workdeck_action::CommandPayload;
use workdeck_core::config::{CommandBarConfig, QuickAction};

// =============================================================================
// Orchestrator response
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardLink {
    pub card_id: String,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SideEffectKind {
    UpdateCard,
    CreateCard,
    RefineDraft,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideEffect {
    pub action: SideEffectKind,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorResponse {
    pub response_text: String,
    #[serde(default)]
    pub card_links: Vec<CardLink>,
    #[serde(default)]
    pub side_effects: Vec<SideEffect>,
}

impl OrchestratorResponse {
    /// Parse the host's response string. Absent or blank input is `None`
    /// silently; anything that fails to parse is `None` with a warning.
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
        match serde_json::from_str(raw) {
            Ok(response) => Some(response),
            Err(e) => {
                warn!(error = %e, "Ignoring malformed orchestrator response");
                None
            }
        }
    }
}

// =============================================================================
// Transcript
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "you"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub role: Role,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub card_links: Vec<CardLink>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct CommandBar {
    entries: Vec<ConversationEntry>,
    expanded: bool,
    quick_actions: Vec<QuickAction>,
}

impl CommandBar {
    pub fn from_config(config: &CommandBarConfig) -> Self {
        Self {
            entries: Vec::new(),
            expanded: false,
            quick_actions: config.quick_actions.clone(),
        }
    }

    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Chips offered to the user. Hidden once a conversation is open and
    /// while a command is in flight.
    pub fn visible_quick_actions(&self, processing: bool) -> &[QuickAction] {
        if self.expanded || processing {
            &[]
        } else {
            &self.quick_actions
        }
    }

    /// Submit typed input. Returns the command to emit, or `None` when the
    /// input is blank or a command is already in flight.
    pub fn submit(
        &mut self,
        input: &str,
        processing: bool,
        current_card_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> Option<CommandPayload> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        if processing {
            debug!("Command submitted while processing, ignoring");
            return None;
        }
        Some(self.push_command(trimmed, current_card_id, now))
    }

    /// Run the quick action at `index`.
    pub fn quick_action(
        &mut self,
        index: usize,
        processing: bool,
        current_card_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> Option<CommandPayload> {
        if processing {
            return None;
        }
        let command = self.quick_actions.get(index)?.command.clone();
        Some(self.push_command(&command, current_card_id, now))
    }

    /// Fold the latest orchestrator response into the transcript. Ignored
    /// while processing, and when it repeats the last assistant entry (the
    /// host re-sends the same response on every refresh). Returns `true` if
    /// an entry was appended.
    pub fn receive(
        &mut self,
        response: Option<&OrchestratorResponse>,
        processing: bool,
        now: DateTime<Utc>,
    ) -> bool {
        let Some(response) = response else {
            return false;
        };
        if processing {
            return false;
        }
        if let Some(last) = self.entries.last() {
            if last.role == Role::Assistant && last.text == response.response_text {
                return false;
            }
        }
        for effect in &response.side_effects {
            debug!(action = ?effect.action, description = %effect.description, "Orchestrator side effect");
        }
        self.entries.push(ConversationEntry {
            role: Role::Assistant,
            text: response.response_text.clone(),
            card_links: response.card_links.clone(),
            timestamp: now,
        });
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.expanded = false;
    }

    fn push_command(
        &mut self,
        command: &str,
        current_card_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> CommandPayload {
        self.entries.push(ConversationEntry {
            role: Role::User,
            text: command.to_string(),
            card_links: Vec::new(),
            timestamp: now,
        });
        self.expanded = true;
        CommandPayload {
            command: command.to_string(),
            current_card_id: current_card_id.map(str::to_string),
        }
    }
}
