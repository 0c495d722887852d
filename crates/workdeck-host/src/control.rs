//! The dashboard control: the single object the host talks to.
//!
//! The host drives three entry points on its own schedule, never
//! concurrently:
//!
//! 1. `update_view(context)` after pushing new records. Bumps the generation,
//!    normalizes, reconciles navigation and the send lifecycle, and renders.
//! 2. `get_outputs()` after a notify. Drains every output slot.
//! 3. User handlers (`select_card`, `confirm_send`, ...), which mutate local
//!    state and emit output actions.
//!
//! Nothing here propagates a fault to the host. Handlers return
//! [`HostError`] for refused actions and rendering runs inside an
//! [`ErrorBoundary`].

use chrono::Utc;
use tracing::{debug, info};

use workdeck_action::{
    LifecycleError, Notifier, OutputAction, OutputChannel, OutputSnapshot, SendLifecycle,
};
use workdeck_core::{Card, CardOutcome, Timestamp, WorkdeckConfig};
use workdeck_ingest::CardCache;
use workdeck_ui::{
    CardFilters, CommandBar, ErrorBoundary, Navigator, OrchestratorResponse, RetryHandle, View,
};

use crate::context::{UpdateContext, Viewport};
use crate::error::HostError;
use crate::screen::{build_screen, Frame};

/// Cards passing the current filters, in collection order.
fn visible_cards<'a>(cache: &'a CardCache, filters: &CardFilters) -> Vec<&'a Card> {
    cache
        .current()
        .map(|batch| filters.apply(&batch.cards))
        .unwrap_or_default()
}

pub struct DashboardControl {
    config: WorkdeckConfig,
    generation: u64,
    cache: CardCache,
    filters: CardFilters,
    viewport: Viewport,
    processing: bool,
    navigator: Navigator,
    lifecycle: SendLifecycle,
    command_bar: CommandBar,
    outbox: OutputChannel,
    boundary: ErrorBoundary,
}

impl DashboardControl {
    pub fn new(config: WorkdeckConfig) -> Self {
        Self {
            generation: 0,
            cache: CardCache::new(),
            filters: CardFilters::default(),
            viewport: Viewport::resolve(0, 0, &config.host),
            processing: false,
            navigator: Navigator::new(),
            lifecycle: SendLifecycle::from_config(&config.send),
            command_bar: CommandBar::from_config(&config.command_bar),
            outbox: OutputChannel::new(),
            boundary: ErrorBoundary::new(),
            config,
        }
    }

    /// Register the callback that tells the host outputs are pending.
    pub fn init(&mut self, notify: Notifier) {
        self.outbox.set_notifier(notify);
        info!("Dashboard control initialized");
    }

    // =========================================================================
    // Host entry points
    // =========================================================================

    /// Refresh from the host and render.
    pub fn update_view(&mut self, ctx: UpdateContext<'_>) -> Frame {
        self.generation += 1;
        self.cache.get_or_normalize(ctx.records, self.generation);
        self.filters = ctx.filters;
        self.viewport = Viewport::resolve(ctx.width, ctx.height, &self.config.host);
        self.processing = ctx.processing;

        let response = OrchestratorResponse::parse(ctx.orchestrator_response);
        self.command_bar
            .receive(response.as_ref(), ctx.processing, Utc::now());

        self.reconcile(ctx.now);
        self.render()
    }

    /// Drain every output slot. A second call with no action in between
    /// returns all-empty.
    pub fn get_outputs(&mut self) -> OutputSnapshot {
        self.outbox.drain()
    }

    /// Fire the send timeout if due. Hosts with a timer call this between
    /// refreshes; `update_view` also checks it.
    pub fn tick(&mut self, now: Timestamp) -> bool {
        self.lifecycle.tick(now)
    }

    /// Render the current state without a refresh.
    pub fn render(&mut self) -> Frame {
        let cards = self.cache.current().map(|b| b.cards.as_slice());
        let visible = visible_cards(&self.cache, &self.filters);
        let navigator = &self.navigator;
        let filters = &self.filters;
        let lifecycle = &self.lifecycle;
        let analytics = &self.config.analytics;

        let screen = self.boundary.render(|| {
            build_screen(navigator, cards, &visible, filters, lifecycle, analytics)
        });

        Frame {
            viewport: self.viewport,
            screen,
            conversation: self.command_bar.entries().to_vec(),
            quick_actions: self
                .command_bar
                .visible_quick_actions(self.processing)
                .to_vec(),
            processing: self.processing,
        }
    }

    /// Clear a tripped error boundary. Returns `false` for a stale handle.
    pub fn retry(&mut self, handle: RetryHandle) -> bool {
        self.boundary.retry(handle)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &WorkdeckConfig {
        &self.config
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn view(&self) -> &View {
        self.navigator.view()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The full normalized collection, `None` before the first refresh.
    pub fn cards(&self) -> Option<&[Card]> {
        self.cache.current().map(|b| b.cards.as_slice())
    }

    pub fn visible_cards(&self) -> Vec<&Card> {
        visible_cards(&self.cache, &self.filters)
    }

    pub fn lifecycle(&self) -> &SendLifecycle {
        &self.lifecycle
    }

    pub fn command_bar(&self) -> &CommandBar {
        &self.command_bar
    }

    // =========================================================================
    // Navigation handlers
    // =========================================================================

    /// Open a card from the gallery and report the selection to the host.
    pub fn select_card(&mut self, card_id: &str) -> Result<(), HostError> {
        let visible = visible_cards(&self.cache, &self.filters);
        self.navigator.select(card_id, &visible)?;
        if let Some(card) = self.navigator.resolve(&visible) {
            self.lifecycle.sync_card(card);
        }
        self.outbox.emit(OutputAction::Select(card_id.to_string()))?;
        Ok(())
    }

    /// Jump to a card from a briefing or command link. The jump is always
    /// reported to the host; the view changes only if the card is visible.
    pub fn jump_to_card(&mut self, card_id: &str) -> Result<bool, HostError> {
        self.outbox.emit(OutputAction::Jump(card_id.to_string()))?;
        let visible = visible_cards(&self.cache, &self.filters);
        let moved = self.navigator.jump(card_id, &visible);
        if let Some(card) = self.navigator.resolve(&visible) {
            self.lifecycle.sync_card(card);
        }
        Ok(moved)
    }

    pub fn back(&mut self) -> Result<(), HostError> {
        self.navigator.back()?;
        self.lifecycle.clear();
        Ok(())
    }

    pub fn open_analytics(&mut self) -> Result<(), HostError> {
        self.navigator.open_analytics()?;
        Ok(())
    }

    // =========================================================================
    // Card action handlers
    // =========================================================================

    pub fn request_send(&mut self) -> Result<(), HostError> {
        let visible = visible_cards(&self.cache, &self.filters);
        let card = self.navigator.resolve(&visible).ok_or(HostError::NoCardOpen)?;
        self.lifecycle.request_send(card)?;
        Ok(())
    }

    pub fn cancel_send(&mut self) -> Result<(), HostError> {
        self.lifecycle.cancel_send()?;
        Ok(())
    }

    /// Confirm the pending send and emit its payload. The timeout window
    /// starts at `now`.
    pub fn confirm_send(&mut self, now: Timestamp) -> Result<(), HostError> {
        let visible = visible_cards(&self.cache, &self.filters);
        let card = self.navigator.resolve(&visible).ok_or(HostError::NoCardOpen)?;
        let payload = self.lifecycle.confirm_send(card, now)?;
        info!(
            card_id = %payload.card_id,
            edit_distance_ratio = payload.edit_distance_ratio,
            "Send confirmed"
        );
        self.outbox.emit(OutputAction::Send(payload))?;
        Ok(())
    }

    pub fn begin_edit(&mut self) -> Result<(), HostError> {
        let visible = visible_cards(&self.cache, &self.filters);
        let card = self.navigator.resolve(&visible).ok_or(HostError::NoCardOpen)?;
        self.lifecycle.begin_edit(card)?;
        Ok(())
    }

    pub fn update_edit(&mut self, text: &str) -> Result<(), HostError> {
        self.lifecycle.update_edit(text)?;
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.lifecycle.cancel_edit();
    }

    /// Ask the host to copy a card's draft to the clipboard.
    pub fn copy_draft(&mut self, card_id: &str) -> Result<(), HostError> {
        let card = self.find_visible(card_id)?;
        if card.card_outcome == CardOutcome::Dismissed {
            return Err(HostError::AlreadyDismissed(card_id.to_string()));
        }
        if card.draft_payload.is_none() {
            return Err(HostError::NoDraft(card_id.to_string()));
        }
        self.outbox.emit(OutputAction::Copy(card_id.to_string()))?;
        Ok(())
    }

    /// Ask the host to dismiss a card, from its detail view or a briefing.
    pub fn dismiss_card(&mut self, card_id: &str) -> Result<(), HostError> {
        let card = self.find_visible(card_id)?;
        if card.card_outcome == CardOutcome::Dismissed {
            return Err(HostError::AlreadyDismissed(card_id.to_string()));
        }
        if card.card_outcome.is_sent() {
            return Err(
                LifecycleError::AlreadyResolved(card_id.to_string(), card.card_outcome).into(),
            );
        }
        self.outbox.emit(OutputAction::Dismiss(card_id.to_string()))?;
        Ok(())
    }

    // =========================================================================
    // Command bar handlers
    // =========================================================================

    /// Submit typed input. Returns `false` when the input was ignored.
    pub fn submit_command(&mut self, input: &str) -> Result<bool, HostError> {
        let current = self.navigator.selected_card_id();
        let Some(payload) = self
            .command_bar
            .submit(input, self.processing, current, Utc::now())
        else {
            return Ok(false);
        };
        self.outbox.emit(OutputAction::Command(payload))?;
        Ok(true)
    }

    pub fn run_quick_action(&mut self, index: usize) -> Result<bool, HostError> {
        let current = self.navigator.selected_card_id();
        let Some(payload) =
            self.command_bar
                .quick_action(index, self.processing, current, Utc::now())
        else {
            return Ok(false);
        };
        self.outbox.emit(OutputAction::Command(payload))?;
        Ok(true)
    }

    pub fn clear_conversation(&mut self) {
        self.command_bar.clear();
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Correct navigation and the send lifecycle against the fresh
    /// collection.
    fn reconcile(&mut self, now: Timestamp) {
        let visible = visible_cards(&self.cache, &self.filters);
        if self.navigator.evaluate(&visible) {
            self.lifecycle.clear();
        }
        match self.navigator.resolve(&visible) {
            Some(card) => {
                if self.lifecycle.sync_card(card) {
                    debug!(card_id = %card.id, "Send lifecycle reset for refreshed card");
                }
                self.lifecycle.observe(card);
            }
            None => self.lifecycle.clear(),
        }
        self.lifecycle.tick(now);
    }

    fn find_visible(&self, card_id: &str) -> Result<&Card, HostError> {
        let batch = self.cache.current().ok_or(HostError::NotReady)?;
        batch
            .cards
            .iter()
            .find(|c| c.id == card_id && self.filters.matches(c))
            .ok_or_else(|| HostError::UnknownCard(card_id.to_string()))
    }
}
