//! Detail view model for a single card.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use workdeck_action::{SendLifecycle, SendState};
use workdeck_core::safety::LinkTarget;
use workdeck_core::{
    Card, CardOutcome, CardStatus, DraftPayload, Priority, TemporalHorizon, TriggerType,
};

use crate::briefing::{briefing_view, BriefingView};

static BULLET_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-*\x{2022}]\s*").expect("valid regex"));

/// Split free-text findings into display bullets. Each line loses a leading
/// `-`, `*` or `•` marker; blank lines are dropped.
pub fn split_key_findings(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| BULLET_MARKER.replace(line, "").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

// =============================================================================
// View parts
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Priority(Priority),
    Confidence(u8),
    Trigger(TriggerType),
    Horizon(TemporalHorizon),
    Sent,
    Dismissed,
}

impl Badge {
    pub fn label(&self) -> String {
        match self {
            Badge::Priority(p) => p.as_str().to_string(),
            Badge::Confidence(score) => format!("Confidence: {}%", score),
            Badge::Trigger(t) => t.as_str().to_string(),
            Badge::Horizon(h) => h.as_str().to_string(),
            Badge::Sent => "Sent".to_string(),
            Badge::Dismissed => "Dismissed".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub target: LinkTarget,
    pub tier: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DraftSection {
    /// The humanized draft; `text` is the edit buffer while editing.
    Humanized {
        text: String,
        editable: bool,
        editing: bool,
        modified: bool,
    },
    /// A structured draft still waiting for humanization.
    PendingHumanization { raw_draft: String },
    Plain(String),
    Briefing(BriefingView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPanel {
    pub to: String,
    pub subject: String,
    pub modified: bool,
}

/// Which action buttons are offered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Affordances {
    /// `Some(enabled)` when Send is shown.
    pub send: Option<bool>,
    pub sent: bool,
    pub copy: bool,
    pub dismiss: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub card_id: String,
    pub badges: Vec<Badge>,
    pub summary: String,
    pub low_confidence_warning: Option<String>,
    pub key_findings: Vec<String>,
    pub research_log: Option<String>,
    pub sources: Vec<SourceLine>,
    pub draft: Option<DraftSection>,
    pub send_state: SendState,
    pub confirm: Option<ConfirmPanel>,
    pub actions: Affordances,
}

// =============================================================================
// Construction
// =============================================================================

pub fn detail_view(card: &Card, lifecycle: &SendLifecycle) -> DetailView {
    let tracking = lifecycle.card_id() == Some(card.id.as_str());
    let send_state = lifecycle.effective_state(card);
    let sendable = card.is_sendable();
    let is_sent = send_state == SendState::Sent;
    let is_dismissed = card.card_outcome == CardOutcome::Dismissed;
    let editing = tracking && lifecycle.is_editing();
    let modified = tracking && lifecycle.is_modified();

    let mut badges = Vec::new();
    if let Some(p) = card.priority {
        badges.push(Badge::Priority(p));
    }
    if let Some(score) = card.confidence_score {
        badges.push(Badge::Confidence(score));
    }
    badges.push(Badge::Trigger(card.trigger_type));
    if let Some(h) = card.temporal_horizon {
        badges.push(Badge::Horizon(h));
    }
    if is_sent {
        badges.push(Badge::Sent);
    }
    if is_dismissed {
        badges.push(Badge::Dismissed);
    }

    let low_confidence_warning = match (&card.card_status, &card.low_confidence_note) {
        (CardStatus::LowConfidence, Some(note)) if !note.is_empty() => Some(note.clone()),
        _ => None,
    };

    let sources = card
        .verified_sources
        .iter()
        .flatten()
        .map(|s| SourceLine {
            target: LinkTarget::classify(&s.title, &s.url),
            tier: s.tier,
        })
        .collect();

    let draft = card.draft_payload.as_ref().map(|payload| {
        if let Some(humanized) = card.humanized_draft.as_deref().filter(|d| !d.is_empty()) {
            let text = if editing {
                lifecycle.edited_text().to_string()
            } else {
                humanized.to_string()
            };
            return DraftSection::Humanized {
                text,
                editable: sendable && !is_sent && !is_dismissed,
                editing,
                modified,
            };
        }
        if card.trigger_type == TriggerType::DailyBriefing {
            return DraftSection::Briefing(briefing_view(card));
        }
        match payload {
            DraftPayload::Structured(draft) => DraftSection::PendingHumanization {
                raw_draft: draft.raw_draft.clone(),
            },
            DraftPayload::Text(text) => DraftSection::Plain(text.clone()),
            DraftPayload::Opaque(value) => DraftSection::Plain(value.to_string()),
        }
    });

    let confirm = (send_state == SendState::Confirming && sendable).then(|| {
        let email = card.original_sender_email.clone().unwrap_or_default();
        let to = match card.original_sender_display.as_deref() {
            Some(display) if !display.is_empty() => format!("{} <{}>", display, email),
            _ => email,
        };
        let subject = card
            .original_subject
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or("(no subject)");
        ConfirmPanel {
            to,
            subject: format!("Re: {}", subject),
            modified,
        }
    });

    let actions = Affordances {
        send: (sendable && !is_sent && !is_dismissed).then_some(send_state == SendState::Idle),
        sent: is_sent,
        copy: card.draft_payload.is_some() && !is_dismissed,
        dismiss: !is_sent && !is_dismissed,
    };

    DetailView {
        card_id: card.id.clone(),
        badges,
        summary: card.item_summary.clone(),
        low_confidence_warning,
        key_findings: card
            .key_findings
            .as_deref()
            .map(split_key_findings)
            .unwrap_or_default(),
        research_log: card.research_log.clone().filter(|s| !s.is_empty()),
        sources,
        draft,
        send_state,
        confirm,
        actions,
    }
}

// =============================================================================
// Text rendering
// =============================================================================

impl fmt::Display for DetailView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<String> = self.badges.iter().map(Badge::label).collect();
        writeln!(f, "< Back    [{}]", labels.join("] ["))?;
        writeln!(f, "{}", self.summary)?;

        if let Some(warning) = &self.low_confidence_warning {
            writeln!(f, "! {}", warning)?;
        }

        if !self.key_findings.is_empty() {
            writeln!(f, "\nKey Findings")?;
            for line in &self.key_findings {
                writeln!(f, "  - {}", line)?;
            }
        }

        if let Some(log) = &self.research_log {
            writeln!(f, "\nResearch Log\n{}", log)?;
        }

        if !self.sources.is_empty() {
            writeln!(f, "\nSources")?;
            for source in &self.sources {
                match &source.target {
                    LinkTarget::Link { label, href } => {
                        writeln!(f, "  {} <{}> (Tier {})", label, href, source.tier)?
                    }
                    LinkTarget::Text { label } => {
                        writeln!(f, "  {} (Tier {})", label, source.tier)?
                    }
                }
            }
        }

        match &self.draft {
            Some(DraftSection::Humanized {
                text,
                editable,
                editing,
                modified,
            }) => {
                writeln!(f, "\nHumanized Draft")?;
                if *editing {
                    writeln!(f, "Editing{}", if *modified { " (modified)" } else { "" })?;
                } else if *editable {
                    writeln!(f, "[Edit draft]")?;
                }
                writeln!(f, "{}", text)?;
            }
            Some(DraftSection::PendingHumanization { raw_draft }) => {
                writeln!(f, "\nDraft (Humanizing...)\n{}", raw_draft)?;
            }
            Some(DraftSection::Plain(text)) => writeln!(f, "\nDraft\n{}", text)?,
            Some(DraftSection::Briefing(briefing)) => write!(f, "\n{}", briefing)?,
            None => {}
        }

        if let Some(confirm) = &self.confirm {
            let how = if confirm.modified { "(edited)" } else { "(as-is)" };
            writeln!(f, "\nConfirm send {}", how)?;
            writeln!(f, "To: {}", confirm.to)?;
            writeln!(f, "Subject: {}", confirm.subject)?;
            if confirm.modified {
                writeln!(f, "Draft has been modified from the original.")?;
            }
        }
        if self.send_state == SendState::Sending {
            writeln!(f, "\nSending...")?;
        }

        let mut buttons = Vec::new();
        match self.actions.send {
            Some(true) => buttons.push("[Send]"),
            Some(false) => buttons.push("(Send)"),
            None => {}
        }
        if self.actions.sent {
            buttons.push("(Sent)");
        }
        if self.actions.copy {
            buttons.push("[Copy to Clipboard]");
        }
        if self.actions.dismiss {
            buttons.push("[Dismiss]");
        }
        if !buttons.is_empty() {
            writeln!(f, "\n{}", buttons.join(" "))?;
        }
        Ok(())
    }
}
