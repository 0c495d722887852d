//! Host-supplied card filters.

use serde::{Deserialize, Serialize};

use workdeck_core::Card;

/// Four free-text filters. Each compares against the card's label for that
/// field; an empty (or blank) filter places no constraint. All four must
/// match for a card to pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardFilters {
    pub trigger_type: String,
    pub priority: String,
    pub card_status: String,
    pub temporal_horizon: String,
}

fn constraint(filter: &str) -> Option<&str> {
    let trimmed = filter.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

impl CardFilters {
    pub fn is_empty(&self) -> bool {
        self.active_labels().is_empty()
    }

    pub fn matches(&self, card: &Card) -> bool {
        if let Some(want) = constraint(&self.trigger_type) {
            if card.trigger_type.as_str() != want {
                return false;
            }
        }
        if let Some(want) = constraint(&self.priority) {
            if card.priority.map(|p| p.as_str()) != Some(want) {
                return false;
            }
        }
        if let Some(want) = constraint(&self.card_status) {
            if card.card_status.as_str() != want {
                return false;
            }
        }
        if let Some(want) = constraint(&self.temporal_horizon) {
            if card.temporal_horizon.map(|h| h.as_str()) != Some(want) {
                return false;
            }
        }
        true
    }

    /// Cards passing every filter, in collection order.
    pub fn apply<'a>(&self, cards: &'a [Card]) -> Vec<&'a Card> {
        cards.iter().filter(|c| self.matches(c)).collect()
    }

    /// Labels of the filters currently constraining the collection.
    pub fn active_labels(&self) -> Vec<&str> {
        [
            &self.trigger_type,
            &self.priority,
            &self.card_status,
            &self.temporal_horizon,
        ]
        .into_iter()
        .filter_map(|f| constraint(f))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workdeck_core::{CardStatus, Priority, TemporalHorizon, TriggerType};

    fn card(id: &str, trigger: TriggerType, priority: Option<Priority>) -> Card {
        let mut card = Card::new(id);
        card.trigger_type = trigger;
        card.priority = priority;
        card
    }

    fn collection() -> Vec<Card> {
        let mut today = card("c", TriggerType::CalendarScan, Some(Priority::Low));
        today.temporal_horizon = Some(TemporalHorizon::Today);
        today.card_status = CardStatus::Ready;
        vec![
            card("a", TriggerType::Email, Some(Priority::High)),
            card("b", TriggerType::TeamsMessage, Some(Priority::High)),
            today,
            card("d", TriggerType::Email, None),
        ]
    }

    fn ids(cards: &[&Card]) -> Vec<String> {
        cards.iter().map(|c| c.id.clone()).collect()
    }

    #[test]
    fn test_empty_filters_pass_everything() {
        let cards = collection();
        let filters = CardFilters::default();
        assert!(filters.is_empty());
        assert_eq!(filters.apply(&cards).len(), 4);
    }

    #[test]
    fn test_single_filter() {
        let cards = collection();
        let filters = CardFilters {
            trigger_type: "EMAIL".into(),
            ..CardFilters::default()
        };
        assert_eq!(ids(&filters.apply(&cards)), vec!["a", "d"]);
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let cards = collection();
        let filters = CardFilters {
            trigger_type: "EMAIL".into(),
            priority: "High".into(),
            ..CardFilters::default()
        };
        assert_eq!(ids(&filters.apply(&cards)), vec!["a"]);
    }

    #[test]
    fn test_absent_field_never_matches_a_constraint() {
        let cards = collection();
        let filters = CardFilters {
            temporal_horizon: "TODAY".into(),
            card_status: "READY".into(),
            ..CardFilters::default()
        };
        assert_eq!(ids(&filters.apply(&cards)), vec!["c"]);
    }

    #[test]
    fn test_blank_filter_is_no_constraint() {
        let cards = collection();
        let filters = CardFilters {
            priority: "   ".into(),
            ..CardFilters::default()
        };
        assert!(filters.is_empty());
        assert_eq!(filters.apply(&cards).len(), 4);
    }

    #[test]
    fn test_active_labels_in_field_order() {
        let filters = CardFilters {
            trigger_type: "EMAIL".into(),
            temporal_horizon: "TODAY".into(),
            ..CardFilters::default()
        };
        assert_eq!(filters.active_labels(), vec!["EMAIL", "TODAY"]);
    }
}
