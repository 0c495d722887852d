//! What one render produces.

use std::fmt;

use workdeck_core::config::{AnalyticsConfig, QuickAction};
use workdeck_core::{Card, WorkdeckError};
use workdeck_insight::{compute, render_report, CalibrationReport};
use workdeck_action::SendLifecycle;
use workdeck_ui::{
    detail_view, gallery_view, CardFilters, ConversationEntry, DetailView, GalleryView, Navigator,
    Rendered, View,
};

use crate::context::Viewport;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsScreen {
    pub report: CalibrationReport,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Gallery(GalleryView),
    Detail(DetailView),
    Analytics(AnalyticsScreen),
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Screen::Gallery(view) => write!(f, "{}", view),
            Screen::Detail(view) => write!(f, "{}", view),
            Screen::Analytics(view) => write!(f, "{}", view.text),
        }
    }
}

/// Build the screen for the current view.
///
/// `cards` is the full collection (analytics reads all of it); `visible` is
/// the filtered subset the navigator resolves against.
pub(crate) fn build_screen(
    navigator: &Navigator,
    cards: Option<&[Card]>,
    visible: &[&Card],
    filters: &CardFilters,
    lifecycle: &SendLifecycle,
    analytics: &AnalyticsConfig,
) -> Result<Screen, WorkdeckError> {
    match navigator.view() {
        View::Gallery => Ok(Screen::Gallery(gallery_view(cards, filters))),
        View::Detail(id) => {
            let card = navigator.resolve(visible).ok_or_else(|| {
                WorkdeckError::Render(format!("selected card {} is not in the collection", id))
            })?;
            Ok(Screen::Detail(detail_view(card, lifecycle)))
        }
        View::Analytics => {
            let report = compute(cards.unwrap_or_default(), analytics.top_senders);
            let text = render_report(&report, analytics);
            Ok(Screen::Analytics(AnalyticsScreen { report, text }))
        }
    }
}

/// A full render: the screen inside the error boundary plus the command bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub viewport: Viewport,
    pub screen: Rendered<Screen>,
    pub conversation: Vec<ConversationEntry>,
    pub quick_actions: Vec<QuickAction>,
    pub processing: bool,
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.screen {
            Rendered::Content(screen) => write!(f, "{}", screen)?,
            Rendered::Fallback(fallback) => write!(f, "{}", fallback)?,
        }

        if !self.conversation.is_empty() {
            writeln!(f, "\n> Command bar")?;
            for entry in &self.conversation {
                writeln!(f, "{}: {}", entry.role, entry.text)?;
                for link in &entry.card_links {
                    writeln!(f, "    {} -> [{}]", link.label, link.card_id)?;
                }
            }
        }
        if self.processing {
            writeln!(f, "Working...")?;
        }
        if !self.quick_actions.is_empty() {
            let labels: Vec<&str> = self.quick_actions.iter().map(|q| q.label.as_str()).collect();
            writeln!(f, "\nQuick actions: {}", labels.join(" | "))?;
        }
        Ok(())
    }
}
