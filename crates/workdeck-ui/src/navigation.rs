//! View navigation state machine.
//!
//! Gallery -> Detail(id)   select a card, or jump to one
//! Gallery -> Analytics
//! Detail / Analytics -> Gallery   back
//! any -> Detail(id)       jump from a briefing or command link
//!
//! Only the selected id is stored. The card itself is looked up in the
//! current collection on every render, and [`Navigator::evaluate`] falls back
//! to the gallery once that lookup fails.

use std::fmt;

use tracing::{debug, info};

use workdeck_core::Card;

use crate::error::NavigationError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Gallery,
    Detail(String),
    Analytics,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Gallery => write!(f, "gallery"),
            View::Detail(id) => write!(f, "detail({})", id),
            View::Analytics => write!(f, "analytics"),
        }
    }
}

/// Validate a user-initiated view transition.
pub fn validate_transition(from: &View, to: &View) -> Result<(), NavigationError> {
    let valid = matches!(
        (from, to),
        (View::Gallery, View::Detail(_))
            | (View::Gallery, View::Analytics)
            | (View::Detail(_), View::Gallery)
            | (View::Analytics, View::Gallery)
    );

    if valid {
        Ok(())
    } else {
        Err(NavigationError::InvalidTransition(from.clone(), to.clone()))
    }
}

fn find<'a>(cards: &[&'a Card], card_id: &str) -> Option<&'a Card> {
    cards.iter().copied().find(|c| c.id == card_id)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigator {
    view: View,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn selected_card_id(&self) -> Option<&str> {
        match &self.view {
            View::Detail(id) => Some(id),
            _ => None,
        }
    }

    /// Open a card from the gallery. `cards` is the visible collection.
    pub fn select(&mut self, card_id: &str, cards: &[&Card]) -> Result<(), NavigationError> {
        let target = View::Detail(card_id.to_string());
        validate_transition(&self.view, &target)?;
        if find(cards, card_id).is_none() {
            return Err(NavigationError::UnknownCard(card_id.to_string()));
        }
        self.go(target);
        Ok(())
    }

    /// Jump to a card from anywhere. Returns `false`, leaving the view
    /// unchanged, when the card is not in `cards`.
    pub fn jump(&mut self, card_id: &str, cards: &[&Card]) -> bool {
        if find(cards, card_id).is_none() {
            debug!(card_id, "Jump target not in the visible collection");
            return false;
        }
        self.go(View::Detail(card_id.to_string()));
        true
    }

    pub fn back(&mut self) -> Result<(), NavigationError> {
        validate_transition(&self.view, &View::Gallery)?;
        self.go(View::Gallery);
        Ok(())
    }

    pub fn open_analytics(&mut self) -> Result<(), NavigationError> {
        validate_transition(&self.view, &View::Analytics)?;
        self.go(View::Analytics);
        Ok(())
    }

    /// The selected card, resolved against `cards` right now.
    pub fn resolve<'a>(&self, cards: &[&'a Card]) -> Option<&'a Card> {
        self.selected_card_id().and_then(|id| find(cards, id))
    }

    /// Correct the view against the current collection. A detail view whose
    /// card has vanished returns to the gallery. Returns `true` if the view
    /// changed.
    pub fn evaluate(&mut self, cards: &[&Card]) -> bool {
        let Some(id) = self.selected_card_id() else {
            return false;
        };
        if find(cards, id).is_some() {
            return false;
        }
        info!(card_id = id, "Selected card no longer present, returning to gallery");
        self.go(View::Gallery);
        true
    }

    fn go(&mut self, to: View) {
        debug!(from = %self.view, to = %to, "View transition");
        self.view = to;
    }
}
