//! Daily briefing view model.

use std::fmt;

use workdeck_core::briefing::{DailyBriefing, StaleSeverity};
use workdeck_core::Card;

#[derive(Debug, Clone, PartialEq)]
pub struct StaleLine {
    pub card_id: String,
    pub summary: String,
    pub hours: i64,
    pub severity: StaleSeverity,
    pub suggestion: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionLine {
    pub rank: u32,
    pub summary: String,
    pub recommendation: String,
    pub reason: String,
    pub calendar: Option<String>,
    /// Each id renders as an "Open card" link that jumps.
    pub card_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FyiLine {
    pub label: &'static str,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedBriefing {
    pub card_id: String,
    pub date: String,
    pub open_items: u32,
    pub day_shape: String,
    pub stale: Vec<StaleLine>,
    pub actions: Vec<ActionLine>,
    pub fyi: Vec<FyiLine>,
    pub all_clear: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BriefingView {
    Parsed(ParsedBriefing),
    /// The payload was not a briefing document. Not an error for the host.
    Unparseable { card_id: String, created_on: String },
}

impl BriefingView {
    pub fn card_id(&self) -> &str {
        match self {
            BriefingView::Parsed(b) => &b.card_id,
            BriefingView::Unparseable { card_id, .. } => card_id,
        }
    }

    /// Every card id this briefing links to, for jump targets.
    pub fn linked_card_ids(&self) -> Vec<&str> {
        let BriefingView::Parsed(b) = self else {
            return Vec::new();
        };
        b.stale
            .iter()
            .map(|s| s.card_id.as_str())
            .chain(b.actions.iter().flat_map(|a| a.card_ids.iter().map(String::as_str)))
            .collect()
    }
}

pub fn briefing_view(card: &Card) -> BriefingView {
    let Some(briefing) = card.draft_payload.as_ref().and_then(DailyBriefing::from_payload) else {
        return BriefingView::Unparseable {
            card_id: card.id.clone(),
            created_on: card.created_on.clone(),
        };
    };

    let stale = briefing
        .stale_alerts()
        .iter()
        .map(|alert| StaleLine {
            card_id: alert.card_id.clone(),
            summary: alert.summary.clone(),
            hours: alert.rounded_hours(),
            severity: alert.severity(),
            suggestion: alert.recommended_action.as_str(),
        })
        .collect();

    let actions = briefing
        .ranked_action_items()
        .into_iter()
        .map(|item| ActionLine {
            rank: item.rank,
            summary: item.thread_summary.clone(),
            recommendation: item.recommended_action.clone(),
            reason: item.urgency_reason.clone(),
            calendar: item.related_calendar.clone(),
            card_ids: item.card_ids.clone(),
        })
        .collect();

    let fyi = briefing
        .fyi_items()
        .iter()
        .map(|item| FyiLine {
            label: item.category.label(),
            summary: item.summary.clone(),
        })
        .collect();

    BriefingView::Parsed(ParsedBriefing {
        card_id: card.id.clone(),
        date: briefing.briefing_date.clone(),
        open_items: briefing.total_open_items,
        day_shape: briefing.day_shape.clone(),
        stale,
        actions,
        fyi,
        all_clear: briefing.is_clear(),
    })
}

impl fmt::Display for BriefingView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = match self {
            BriefingView::Unparseable { created_on, .. } => {
                writeln!(f, "Daily Briefing  {}", created_on)?;
                return writeln!(
                    f,
                    "Unable to parse briefing data. The briefing agent may have returned an unexpected format."
                );
            }
            BriefingView::Parsed(b) => b,
        };

        let plural = if b.open_items == 1 { "" } else { "s" };
        writeln!(f, "Daily Briefing  {}  {} open item{}", b.date, b.open_items, plural)?;
        writeln!(f, "{}", b.day_shape)?;

        if b.all_clear {
            writeln!(f, "You're all caught up. Nothing needs action right now.")?;
        }

        if !b.stale.is_empty() {
            writeln!(f, "\nOverdue Items")?;
            for s in &b.stale {
                let marker = match s.severity {
                    StaleSeverity::Critical => "!!",
                    StaleSeverity::Warning => "! ",
                };
                writeln!(
                    f,
                    "{} {} ({}h pending) Suggested: {} [{}]",
                    marker, s.summary, s.hours, s.suggestion, s.card_id
                )?;
            }
        }

        if !b.actions.is_empty() {
            writeln!(f, "\nAction Items")?;
            for a in &b.actions {
                writeln!(f, "#{} {}", a.rank, a.summary)?;
                writeln!(f, "   {}", a.recommendation)?;
                if !a.reason.is_empty() {
                    writeln!(f, "   {}", a.reason)?;
                }
                if let Some(cal) = &a.calendar {
                    writeln!(f, "   Calendar: {}", cal)?;
                }
                if !a.card_ids.is_empty() {
                    writeln!(f, "   Open card: {}", a.card_ids.join(", "))?;
                }
            }
        }

        if !b.fyi.is_empty() {
            writeln!(f, "\nFor Your Information ({})", b.fyi.len())?;
            for item in &b.fyi {
                writeln!(f, "[{}] {}", item.label, item.summary)?;
            }
        }
        Ok(())
    }
}
