//! Daily briefing payload carried by `DAILY_BRIEFING` cards.

use serde::{Deserialize, Serialize};

use crate::types::DraftPayload;

/// Hours after which a stale item is flagged as critical rather than a warning.
pub const STALE_CRITICAL_HOURS: f64 = 48.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FyiCategory {
    MeetingPrep,
    InfoUpdate,
    LowPriority,
}

impl FyiCategory {
    pub fn label(&self) -> &'static str {
        match self {
            FyiCategory::MeetingPrep => "Meeting prep",
            FyiCategory::InfoUpdate => "Info",
            FyiCategory::LowPriority => "Low priority",
        }
    }
}

/// What the briefing agent recommends doing with a stale item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StaleDisposition {
    Respond,
    Delegate,
    Dismiss,
}

impl StaleDisposition {
    pub fn as_str(&self) -> &'static str {
        match self {
            StaleDisposition::Respond => "respond",
            StaleDisposition::Delegate => "delegate",
            StaleDisposition::Dismiss => "dismiss",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleSeverity {
    Warning,
    Critical,
}

/// A ranked item the user should act on today.
///
/// `rank` is a dense 1-based display order, not an identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionItem {
    pub rank: u32,
    #[serde(default)]
    pub card_ids: Vec<String>,
    pub thread_summary: String,
    pub recommended_action: String,
    #[serde(default)]
    pub urgency_reason: String,
    #[serde(default)]
    pub related_calendar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FyiItem {
    #[serde(default)]
    pub card_ids: Vec<String>,
    pub summary: String,
    pub category: FyiCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaleAlert {
    pub card_id: String,
    pub summary: String,
    pub hours_pending: f64,
    pub recommended_action: StaleDisposition,
}

impl StaleAlert {
    pub fn severity(&self) -> StaleSeverity {
        if self.hours_pending > STALE_CRITICAL_HOURS {
            StaleSeverity::Critical
        } else {
            StaleSeverity::Warning
        }
    }

    /// Hours pending rounded for display.
    pub fn rounded_hours(&self) -> i64 {
        self.hours_pending.round() as i64
    }
}

/// A date-stamped aggregate summarizing the open queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBriefing {
    #[serde(default)]
    pub briefing_type: Option<String>,
    pub briefing_date: String,
    #[serde(default)]
    pub total_open_items: u32,
    pub day_shape: String,
    #[serde(default)]
    pub action_items: Vec<ActionItem>,
    #[serde(default)]
    pub fyi_items: Option<Vec<FyiItem>>,
    #[serde(default)]
    pub stale_alerts: Option<Vec<StaleAlert>>,
}

impl DailyBriefing {
    /// Extract the briefing from a card's draft payload.
    ///
    /// The payload may be the serialized briefing document or the document
    /// itself. Returns `None` when it is neither.
    pub fn from_payload(payload: &DraftPayload) -> Option<Self> {
        let parsed = match payload {
            DraftPayload::Text(text) if !text.is_empty() => serde_json::from_str(text),
            DraftPayload::Opaque(value) => serde_json::from_value(value.clone()),
            _ => return None,
        };
        match parsed {
            Ok(briefing) => Some(briefing),
            Err(e) => {
                tracing::debug!(error = %e, "Briefing payload did not parse");
                None
            }
        }
    }

    /// Action items in rank order.
    pub fn ranked_action_items(&self) -> Vec<&ActionItem> {
        let mut items: Vec<&ActionItem> = self.action_items.iter().collect();
        items.sort_by_key(|item| item.rank);
        items
    }

    pub fn fyi_items(&self) -> &[FyiItem] {
        self.fyi_items.as_deref().unwrap_or_default()
    }

    pub fn stale_alerts(&self) -> &[StaleAlert] {
        self.stale_alerts.as_deref().unwrap_or_default()
    }

    /// True when there is nothing to act on and nothing overdue.
    pub fn is_clear(&self) -> bool {
        self.action_items.is_empty() && self.stale_alerts().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BRIEFING_JSON: &str = r#"{
        "briefing_type": "DAILY",
        "briefing_date": "2026-02-28",
        "total_open_items": 8,
        "day_shape": "You have 8 open items with 3 needing action today.",
        "action_items": [
            {"rank": 2, "card_ids": ["c2"], "thread_summary": "Vendor invoice",
             "recommended_action": "Approve", "urgency_reason": "Due Friday",
             "related_calendar": null},
            {"rank": 1, "card_ids": ["c1", "c3"], "thread_summary": "Budget revision",
             "recommended_action": "Reply to Sarah", "urgency_reason": "36h pending",
             "related_calendar": "2 PM budget call"}
        ],
        "fyi_items": [
            {"card_ids": ["c4"], "summary": "Offsite agenda posted", "category": "INFO_UPDATE"}
        ],
        "stale_alerts": [
            {"card_id": "c5", "summary": "Contract question", "hours_pending": 72.4,
             "recommended_action": "RESPOND"},
            {"card_id": "c6", "summary": "Survey", "hours_pending": 30.6,
             "recommended_action": "DISMISS"}
        ]
    }"#;

    #[test]
    fn test_parse_from_text_payload() {
        let payload = DraftPayload::Text(BRIEFING_JSON.to_string());
        let briefing = DailyBriefing::from_payload(&payload).unwrap();
        assert_eq!(briefing.briefing_date, "2026-02-28");
        assert_eq!(briefing.total_open_items, 8);
        assert_eq!(briefing.action_items.len(), 2);
        assert_eq!(briefing.fyi_items().len(), 1);
        assert_eq!(briefing.stale_alerts().len(), 2);
    }

    #[test]
    fn test_parse_from_object_payload() {
        let value: serde_json::Value = serde_json::from_str(BRIEFING_JSON).unwrap();
        let briefing = DailyBriefing::from_payload(&DraftPayload::Opaque(value)).unwrap();
        assert_eq!(briefing.day_shape, "You have 8 open items with 3 needing action today.");
    }

    #[test]
    fn test_plain_text_is_not_a_briefing() {
        let payload = DraftPayload::Text("Meeting briefing: QBR at 2 PM".to_string());
        assert!(DailyBriefing::from_payload(&payload).is_none());
        assert!(DailyBriefing::from_payload(&DraftPayload::Text(String::new())).is_none());
    }

    #[test]
    fn test_ranked_action_items_sorted_by_rank() {
        let payload = DraftPayload::Text(BRIEFING_JSON.to_string());
        let briefing = DailyBriefing::from_payload(&payload).unwrap();
        let ranked = briefing.ranked_action_items();
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[0].thread_summary, "Budget revision");
        assert_eq!(ranked[1].rank, 2);
    }

    #[test]
    fn test_stale_severity_and_rounding() {
        let payload = DraftPayload::Text(BRIEFING_JSON.to_string());
        let briefing = DailyBriefing::from_payload(&payload).unwrap();
        let alerts = briefing.stale_alerts();
        assert_eq!(alerts[0].severity(), StaleSeverity::Critical);
        assert_eq!(alerts[0].rounded_hours(), 72);
        assert_eq!(alerts[1].severity(), StaleSeverity::Warning);
        assert_eq!(alerts[1].rounded_hours(), 31);
        assert_eq!(alerts[1].recommended_action.as_str(), "dismiss");
    }

    #[test]
    fn test_exactly_48_hours_is_warning() {
        let alert = StaleAlert {
            card_id: "c".into(),
            summary: "s".into(),
            hours_pending: 48.0,
            recommended_action: StaleDisposition::Delegate,
        };
        assert_eq!(alert.severity(), StaleSeverity::Warning);
    }

    #[test]
    fn test_clear_briefing() {
        let json = r#"{"briefing_date":"2026-03-01","day_shape":"Quiet day","action_items":[]}"#;
        let briefing = DailyBriefing::from_payload(&DraftPayload::Text(json.into())).unwrap();
        assert!(briefing.is_clear());
        assert!(briefing.fyi_items().is_empty());
    }

    #[test]
    fn test_fyi_category_labels() {
        assert_eq!(FyiCategory::MeetingPrep.label(), "Meeting prep");
        assert_eq!(FyiCategory::InfoUpdate.label(), "Info");
        assert_eq!(FyiCategory::LowPriority.label(), "Low priority");
    }
}
