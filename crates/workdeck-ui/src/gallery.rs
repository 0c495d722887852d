//! Gallery view model: filter bar plus one item per visible card.

use std::fmt;

use workdeck_core::{Card, CardStatus, Priority, TemporalHorizon, TriggerType};

use crate::briefing::{briefing_view, BriefingView};
use crate::filter::CardFilters;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// No refresh has delivered data yet.
    Loading,
    /// The host delivered an empty collection.
    NoCards,
    /// Cards exist but the filters exclude every one.
    NoMatches,
}

impl EmptyState {
    pub fn message(&self) -> &'static str {
        match self {
            EmptyState::Loading => "Loading cards...",
            EmptyState::NoCards => "No cards yet.",
            EmptyState::NoMatches => "No cards match the current filters.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterBarView {
    pub card_count: usize,
    pub active_filters: Vec<String>,
}

impl fmt::Display for FilterBarView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.card_count == 1 { "card" } else { "cards" };
        write!(f, "{} {}", self.card_count, noun)?;
        if !self.active_filters.is_empty() {
            write!(f, "  [{}]", self.active_filters.join("] ["))?;
        }
        Ok(())
    }
}

/// One row of the gallery.
#[derive(Debug, Clone, PartialEq)]
pub struct CardSummary {
    pub card_id: String,
    pub trigger_type: TriggerType,
    pub status: CardStatus,
    pub priority: Option<Priority>,
    pub horizon: Option<TemporalHorizon>,
    pub summary: String,
    pub created_on: String,
}

impl CardSummary {
    fn from_card(card: &Card) -> Self {
        Self {
            card_id: card.id.clone(),
            trigger_type: card.trigger_type,
            status: card.card_status,
            priority: card.priority,
            horizon: card.temporal_horizon,
            summary: card.item_summary.clone(),
            created_on: card.created_on.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GalleryItem {
    Card(CardSummary),
    /// Briefings render inline rather than as a clickable row.
    Briefing(BriefingView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GalleryView {
    /// Hidden until the first refresh.
    pub filter_bar: Option<FilterBarView>,
    pub items: Vec<GalleryItem>,
    pub empty: Option<EmptyState>,
}

/// Build the gallery. `cards` is `None` before the first refresh.
pub fn gallery_view(cards: Option<&[Card]>, filters: &CardFilters) -> GalleryView {
    let Some(cards) = cards else {
        return GalleryView {
            filter_bar: None,
            items: Vec::new(),
            empty: Some(EmptyState::Loading),
        };
    };

    let visible = filters.apply(cards);
    let empty = if cards.is_empty() {
        Some(EmptyState::NoCards)
    } else if visible.is_empty() {
        Some(EmptyState::NoMatches)
    } else {
        None
    };

    let items = visible
        .iter()
        .map(|card| match card.trigger_type {
            TriggerType::DailyBriefing => GalleryItem::Briefing(briefing_view(card)),
            _ => GalleryItem::Card(CardSummary::from_card(card)),
        })
        .collect();

    GalleryView {
        filter_bar: Some(FilterBarView {
            card_count: visible.len(),
            active_filters: filters.active_labels().into_iter().map(String::from).collect(),
        }),
        items,
        empty,
    }
}

impl fmt::Display for GalleryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(bar) = &self.filter_bar {
            writeln!(f, "{}", bar)?;
        }
        if let Some(empty) = self.empty {
            return writeln!(f, "{}", empty.message());
        }
        for item in &self.items {
            match item {
                GalleryItem::Card(c) => {
                    let priority = c.priority.map(|p| p.as_str()).unwrap_or("-");
                    write!(f, "[{}] {:<6} {}", c.card_id, priority, c.status)?;
                    if let Some(h) = c.horizon {
                        write!(f, " {}", h)?;
                    }
                    writeln!(f, "  {}  ({})", c.summary, c.created_on)?;
                }
                GalleryItem::Briefing(b) => {
                    writeln!(f, "----")?;
                    write!(f, "{}", b)?;
                    writeln!(f, "----")?;
                }
            }
        }
        Ok(())
    }
}
