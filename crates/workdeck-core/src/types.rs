use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Enums
// =============================================================================

/// What produced the upstream record a card was derived from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerType {
    #[default]
    Email,
    TeamsMessage,
    CalendarScan,
    DailyBriefing,
    SelfReminder,
    CommandResult,
}

impl TriggerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "EMAIL",
            Self::TeamsMessage => "TEAMS_MESSAGE",
            Self::CalendarScan => "CALENDAR_SCAN",
            Self::DailyBriefing => "DAILY_BRIEFING",
            Self::SelfReminder => "SELF_REMINDER",
            Self::CommandResult => "COMMAND_RESULT",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "EMAIL" => Some(Self::Email),
            "TEAMS_MESSAGE" => Some(Self::TeamsMessage),
            "CALENDAR_SCAN" => Some(Self::CalendarScan),
            "DAILY_BRIEFING" => Some(Self::DailyBriefing),
            "SELF_REMINDER" => Some(Self::SelfReminder),
            "COMMAND_RESULT" => Some(Self::CommandResult),
            _ => None,
        }
    }
}

/// How much upstream processing a card received.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriageTier {
    Skip,
    #[default]
    Light,
    Full,
}

impl TriageTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skip => "SKIP",
            Self::Light => "LIGHT",
            Self::Full => "FULL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SKIP" => Some(Self::Skip),
            "LIGHT" => Some(Self::Light),
            "FULL" => Some(Self::Full),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Parse a priority label. The upstream `"N/A"` sentinel is not a priority.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "High" => Some(Self::High),
            "Medium" => Some(Self::Medium),
            "Low" => Some(Self::Low),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemporalHorizon {
    Today,
    ThisWeek,
    NextWeek,
    Beyond,
}

impl TemporalHorizon {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "TODAY",
            Self::ThisWeek => "THIS_WEEK",
            Self::NextWeek => "NEXT_WEEK",
            Self::Beyond => "BEYOND",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "TODAY" => Some(Self::Today),
            "THIS_WEEK" => Some(Self::ThisWeek),
            "NEXT_WEEK" => Some(Self::NextWeek),
            "BEYOND" => Some(Self::Beyond),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardStatus {
    Ready,
    LowConfidence,
    #[default]
    SummaryOnly,
    NoOutput,
    Nudge,
}

impl CardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ready => "READY",
            Self::LowConfidence => "LOW_CONFIDENCE",
            Self::SummaryOnly => "SUMMARY_ONLY",
            Self::NoOutput => "NO_OUTPUT",
            Self::Nudge => "NUDGE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "READY" => Some(Self::Ready),
            "LOW_CONFIDENCE" => Some(Self::LowConfidence),
            "SUMMARY_ONLY" => Some(Self::SummaryOnly),
            "NO_OUTPUT" => Some(Self::NoOutput),
            "NUDGE" => Some(Self::Nudge),
            _ => None,
        }
    }
}

/// Host-persisted disposition of a card.
///
/// Transitions only `Pending -> {SentAsIs, SentEdited, Dismissed, Expired}`;
/// every non-pending outcome is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardOutcome {
    #[default]
    Pending,
    SentAsIs,
    SentEdited,
    Dismissed,
    Expired,
}

impl CardOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::SentAsIs => "SENT_AS_IS",
            Self::SentEdited => "SENT_EDITED",
            Self::Dismissed => "DISMISSED",
            Self::Expired => "EXPIRED",
        }
    }

    /// Parse a formatted outcome label. Unset or unrecognized labels are `Pending`.
    pub fn parse_or_pending(s: Option<&str>) -> Self {
        match s {
            Some("SENT_AS_IS") => Self::SentAsIs,
            Some("SENT_EDITED") => Self::SentEdited,
            Some("DISMISSED") => Self::Dismissed,
            Some("EXPIRED") => Self::Expired,
            _ => Self::Pending,
        }
    }

    pub fn is_sent(&self) -> bool {
        matches!(self, Self::SentAsIs | Self::SentEdited)
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub fn can_transition_to(&self, target: CardOutcome) -> bool {
        matches!(self, Self::Pending) && target.is_terminal()
    }
}

macro_rules! display_as_str {
    ($($ty:ty),* $(,)?) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(
    TriggerType,
    TriageTier,
    Priority,
    TemporalHorizon,
    CardStatus,
    CardOutcome,
    DraftType,
    RecipientRelationship,
    InferredTone,
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DraftType {
    Email,
    TeamsMessage,
}

impl DraftType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "EMAIL" => Some(Self::Email),
            "TEAMS_MESSAGE" => Some(Self::TeamsMessage),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "EMAIL",
            Self::TeamsMessage => "TEAMS_MESSAGE",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecipientRelationship {
    #[serde(rename = "Internal colleague")]
    InternalColleague,
    #[serde(rename = "External client")]
    ExternalClient,
    Leadership,
    #[default]
    Unknown,
}

impl RecipientRelationship {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Internal colleague" => Some(Self::InternalColleague),
            "External client" => Some(Self::ExternalClient),
            "Leadership" => Some(Self::Leadership),
            "Unknown" => Some(Self::Unknown),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InternalColleague => "Internal colleague",
            Self::ExternalClient => "External client",
            Self::Leadership => "Leadership",
            Self::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InferredTone {
    Formal,
    SemiFormal,
    Direct,
    Collaborative,
}

impl InferredTone {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "formal" => Some(Self::Formal),
            "semi-formal" => Some(Self::SemiFormal),
            "direct" => Some(Self::Direct),
            "collaborative" => Some(Self::Collaborative),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Formal => "formal",
            Self::SemiFormal => "semi-formal",
            Self::Direct => "direct",
            Self::Collaborative => "collaborative",
        }
    }
}

// =============================================================================
// Newtype Wrappers
// =============================================================================

/// Unix timestamp in seconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now().timestamp())
    }

    pub fn to_datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.0, 0).unwrap_or_default()
    }

    pub fn plus_secs(&self, secs: i64) -> Self {
        Self(self.0.saturating_add(secs))
    }
}

// =============================================================================
// Domain Structs
// =============================================================================

/// A citation the upstream research step verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedSource {
    pub title: String,
    pub url: String,
    /// Source reliability tier, 1 (best) to 5.
    pub tier: u8,
}

/// Structured draft produced by the upstream drafting step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftObject {
    pub draft_type: Option<DraftType>,
    pub raw_draft: String,
    #[serde(default)]
    pub research_summary: Option<String>,
    #[serde(default)]
    pub recipient_relationship: Option<RecipientRelationship>,
    #[serde(default)]
    pub inferred_tone: Option<InferredTone>,
    #[serde(default)]
    pub confidence_score: Option<f64>,
    #[serde(default)]
    pub user_context: Option<String>,
}

/// The draft attached to a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DraftPayload {
    /// Plain narrative text (calendar briefings, serialized briefing JSON).
    Text(String),
    /// A structured draft awaiting or carrying humanization.
    Structured(DraftObject),
    /// Any other object, kept verbatim (e.g. an inline briefing document).
    Opaque(serde_json::Value),
}

impl DraftPayload {
    pub fn as_structured(&self) -> Option<&DraftObject> {
        match self {
            DraftPayload::Structured(draft) => Some(draft),
            _ => None,
        }
    }
}

/// A normalized unit of work surfaced to the user.
///
/// Immutable per refresh cycle: the whole collection is replaced on every
/// host push.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub trigger_type: TriggerType,
    pub triage_tier: TriageTier,
    pub item_summary: String,
    pub priority: Option<Priority>,
    pub temporal_horizon: Option<TemporalHorizon>,
    pub research_log: Option<String>,
    pub key_findings: Option<String>,
    pub verified_sources: Option<Vec<VerifiedSource>>,
    pub confidence_score: Option<u8>,
    pub card_status: CardStatus,
    pub draft_payload: Option<DraftPayload>,
    pub low_confidence_note: Option<String>,
    pub humanized_draft: Option<String>,
    pub created_on: String,
    pub card_outcome: CardOutcome,
    pub original_sender_email: Option<String>,
    pub original_sender_display: Option<String>,
    pub original_subject: Option<String>,
    pub conversation_cluster_id: Option<String>,
    pub source_signal_id: Option<String>,
}

impl Card {
    /// A bare pending card with the given id and every optional field absent.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            trigger_type: TriggerType::default(),
            triage_tier: TriageTier::default(),
            item_summary: String::new(),
            priority: None,
            temporal_horizon: None,
            research_log: None,
            key_findings: None,
            verified_sources: None,
            confidence_score: None,
            card_status: CardStatus::default(),
            draft_payload: None,
            low_confidence_note: None,
            humanized_draft: None,
            created_on: String::new(),
            card_outcome: CardOutcome::Pending,
            original_sender_email: None,
            original_sender_display: None,
            original_subject: None,
            conversation_cluster_id: None,
            source_signal_id: None,
        }
    }

    /// Whether the card can be sent from the dashboard as an email reply.
    pub fn is_sendable(&self) -> bool {
        self.trigger_type == TriggerType::Email
            && self.triage_tier == TriageTier::Full
            && self.card_status == CardStatus::Ready
            && self.humanized_draft.as_deref().is_some_and(|d| !d.is_empty())
            && self
                .original_sender_email
                .as_deref()
                .is_some_and(|e| !e.is_empty())
    }

    /// Cards counted by analytics: resolved and not an aggregate briefing.
    pub fn is_resolved(&self) -> bool {
        self.card_outcome.is_terminal() && self.trigger_type != TriggerType::DailyBriefing
    }

    /// The humanized draft, or the empty string while it is pending.
    pub fn humanized_text(&self) -> &str {
        self.humanized_draft.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sendable_card() -> Card {
        let mut card = Card::new("full-001");
        card.trigger_type = TriggerType::Email;
        card.triage_tier = TriageTier::Full;
        card.card_status = CardStatus::Ready;
        card.humanized_draft = Some("Dear Fabrikam team".into());
        card.original_sender_email = Some("legal@fabrikam.com".into());
        card
    }

    #[test]
    fn test_enum_parse_roundtrip() {
        for t in [
            TriggerType::Email,
            TriggerType::TeamsMessage,
            TriggerType::CalendarScan,
            TriggerType::DailyBriefing,
            TriggerType::SelfReminder,
            TriggerType::CommandResult,
        ] {
            assert_eq!(TriggerType::parse(t.as_str()), Some(t));
        }
        assert_eq!(TriggerType::parse("FAX"), None);
        assert_eq!(Priority::parse("N/A"), None);
        assert_eq!(TemporalHorizon::parse("N/A"), None);
        assert_eq!(CardStatus::parse("LOW_CONFIDENCE"), Some(CardStatus::LowConfidence));
    }

    #[test]
    fn test_serde_names_match_labels() {
        let json = serde_json::to_string(&TriggerType::TeamsMessage).unwrap();
        assert_eq!(json, "\"TEAMS_MESSAGE\"");
        let json = serde_json::to_string(&Priority::High).unwrap();
        assert_eq!(json, "\"High\"");
        let json = serde_json::to_string(&CardOutcome::SentAsIs).unwrap();
        assert_eq!(json, "\"SENT_AS_IS\"");
        let json = serde_json::to_string(&InferredTone::SemiFormal).unwrap();
        assert_eq!(json, "\"semi-formal\"");
        let rel: RecipientRelationship = serde_json::from_str("\"External client\"").unwrap();
        assert_eq!(rel, RecipientRelationship::ExternalClient);
    }

    #[test]
    fn test_outcome_parse_defaults_to_pending() {
        assert_eq!(CardOutcome::parse_or_pending(None), CardOutcome::Pending);
        assert_eq!(CardOutcome::parse_or_pending(Some("")), CardOutcome::Pending);
        assert_eq!(CardOutcome::parse_or_pending(Some("ARCHIVED")), CardOutcome::Pending);
        assert_eq!(
            CardOutcome::parse_or_pending(Some("SENT_EDITED")),
            CardOutcome::SentEdited
        );
    }

    #[test]
    fn test_outcome_transitions_are_one_way() {
        let all = [
            CardOutcome::Pending,
            CardOutcome::SentAsIs,
            CardOutcome::SentEdited,
            CardOutcome::Dismissed,
            CardOutcome::Expired,
        ];
        let mut valid = 0;
        for from in all {
            for to in all {
                if from.can_transition_to(to) {
                    assert_eq!(from, CardOutcome::Pending);
                    valid += 1;
                }
            }
        }
        assert_eq!(valid, 4);
    }

    #[test]
    fn test_is_sendable_requires_every_condition() {
        assert!(sendable_card().is_sendable());

        let mut card = sendable_card();
        card.trigger_type = TriggerType::TeamsMessage;
        assert!(!card.is_sendable());

        let mut card = sendable_card();
        card.triage_tier = TriageTier::Light;
        assert!(!card.is_sendable());

        let mut card = sendable_card();
        card.card_status = CardStatus::LowConfidence;
        assert!(!card.is_sendable());

        let mut card = sendable_card();
        card.humanized_draft = Some(String::new());
        assert!(!card.is_sendable());

        let mut card = sendable_card();
        card.original_sender_email = None;
        assert!(!card.is_sendable());
    }

    #[test]
    fn test_is_resolved_excludes_briefings_and_pending() {
        let mut card = Card::new("a");
        assert!(!card.is_resolved());
        card.card_outcome = CardOutcome::Expired;
        assert!(card.is_resolved());
        card.trigger_type = TriggerType::DailyBriefing;
        assert!(!card.is_resolved());
    }

    #[test]
    fn test_draft_payload_untagged_variants() {
        let text: DraftPayload = serde_json::from_str("\"Meeting briefing\"").unwrap();
        assert_eq!(text, DraftPayload::Text("Meeting briefing".into()));

        let structured: DraftPayload = serde_json::from_str(
            r#"{"draft_type":"EMAIL","raw_draft":"Hi","inferred_tone":"formal"}"#,
        )
        .unwrap();
        let draft = structured.as_structured().unwrap();
        assert_eq!(draft.raw_draft, "Hi");
        assert_eq!(draft.inferred_tone, Some(InferredTone::Formal));

        let opaque: DraftPayload =
            serde_json::from_str(r#"{"briefing_type":"DAILY"}"#).unwrap();
        assert!(matches!(opaque, DraftPayload::Opaque(_)));
    }

    #[test]
    fn test_timestamp_plus_secs() {
        let ts = Timestamp(1_000);
        assert_eq!(ts.plus_secs(60), Timestamp(1_060));
        assert_eq!(Timestamp(i64::MAX).plus_secs(1), Timestamp(i64::MAX));
    }
}
