//! Send/edit lifecycle of the selected card.
//!
//! Two pieces of state decide what the send affordance shows: the host's
//! persisted [`CardOutcome`] and the local [`SendState`] driven by the user.
//! They are never merged. [`SendLifecycle::effective_state`] reconciles them
//! fresh on every render, and the outcome always wins once it is terminal.
//!
//! Local transitions:
//! Idle -> Confirming -> Sending -> Sent
//! Confirming -> Idle (cancel)
//! Sending -> Idle (timeout)
//!
//! Editing is a separate flag and does not change the send state.

use tracing::{debug, warn};

use workdeck_core::config::SendConfig;
use workdeck_core::{levenshtein_ratio, Card, CardOutcome, Timestamp};

use crate::error::LifecycleError;
use crate::types::{SendPayload, SendState};

/// Validate that a local send transition is allowed.
pub fn validate_transition(from: SendState, to: SendState) -> Result<(), LifecycleError> {
    let valid = matches!(
        (from, to),
        (SendState::Idle, SendState::Confirming)
            | (SendState::Confirming, SendState::Idle)
            | (SendState::Confirming, SendState::Sending)
            | (SendState::Sending, SendState::Idle)
            | (SendState::Sending, SendState::Sent)
    );

    if valid {
        Ok(())
    } else {
        Err(LifecycleError::InvalidTransition(from, to))
    }
}

/// Local interaction state for the card open in the detail view.
#[derive(Debug, Clone, PartialEq)]
pub struct SendLifecycle {
    card_id: Option<String>,
    /// Humanized draft the state was last reset against.
    original: String,
    state: SendState,
    editing: bool,
    edited_text: String,
    /// When a `Sending` state gives up waiting for the host.
    deadline: Option<Timestamp>,
    timeout_secs: i64,
}

impl Default for SendLifecycle {
    fn default() -> Self {
        Self::new(SendConfig::default().timeout_secs)
    }
}

impl SendLifecycle {
    pub fn new(timeout_secs: i64) -> Self {
        Self {
            card_id: None,
            original: String::new(),
            state: SendState::Idle,
            editing: false,
            edited_text: String::new(),
            deadline: None,
            timeout_secs,
        }
    }

    pub fn from_config(config: &SendConfig) -> Self {
        Self::new(config.timeout_secs)
    }

    pub fn card_id(&self) -> Option<&str> {
        self.card_id.as_deref()
    }

    /// Local state, before reconciliation with the card's outcome.
    pub fn local_state(&self) -> SendState {
        self.state
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn edited_text(&self) -> &str {
        &self.edited_text
    }

    pub fn deadline(&self) -> Option<Timestamp> {
        self.deadline
    }

    /// Whether the text that would be sent differs from the humanized draft.
    pub fn is_modified(&self) -> bool {
        self.editing && self.edited_text != self.original
    }

    /// Text that a confirm would send right now.
    pub fn final_text(&self) -> &str {
        if self.editing {
            &self.edited_text
        } else {
            &self.original
        }
    }

    // -----------------------------------------------------------------
    // Card tracking
    // -----------------------------------------------------------------

    /// Follow the card currently shown. Switching to another card, or the
    /// same card arriving with a different humanized draft, resets all local
    /// state. Returns `true` if a reset happened.
    pub fn sync_card(&mut self, card: &Card) -> bool {
        let same_card = self.card_id.as_deref() == Some(card.id.as_str());
        if same_card && self.original == card.humanized_text() {
            return false;
        }
        self.reset_for(card);
        true
    }

    /// Drop local state for `card`: idle, not editing, edited text reset to
    /// the card's humanized draft. Any pending timeout is cancelled.
    pub fn reset_for(&mut self, card: &Card) {
        debug!(card_id = %card.id, "Resetting send lifecycle");
        self.card_id = Some(card.id.clone());
        self.original = card.humanized_text().to_string();
        self.state = SendState::Idle;
        self.editing = false;
        self.edited_text = self.original.clone();
        self.deadline = None;
    }

    /// Forget the tracked card, e.g. when leaving the detail view.
    pub fn clear(&mut self) {
        *self = Self::new(self.timeout_secs);
    }

    // -----------------------------------------------------------------
    // Reconciliation
    // -----------------------------------------------------------------

    /// State to display for `card`. A sent outcome shows `Sent` and a
    /// dismissed one shows `Idle` whatever the local state is.
    pub fn effective_state(&self, card: &Card) -> SendState {
        match card.card_outcome {
            CardOutcome::SentAsIs | CardOutcome::SentEdited => SendState::Sent,
            CardOutcome::Dismissed => SendState::Idle,
            CardOutcome::Pending | CardOutcome::Expired => {
                if self.card_id.as_deref() == Some(card.id.as_str()) {
                    self.state
                } else {
                    SendState::Idle
                }
            }
        }
    }

    /// Fold a freshly normalized copy of the tracked card into local state.
    /// A sent outcome arriving while `Sending` completes the send.
    pub fn observe(&mut self, card: &Card) {
        if self.state == SendState::Sending
            && self.card_id.as_deref() == Some(card.id.as_str())
            && card.card_outcome.is_sent()
        {
            self.transition(SendState::Sent);
            debug!(card_id = %card.id, outcome = %card.card_outcome, "Send confirmed by host");
        }
    }

    /// Fire the send timeout if its deadline has passed. Returns `true` if
    /// the state reverted to `Idle`.
    pub fn tick(&mut self, now: Timestamp) -> bool {
        match self.deadline {
            Some(deadline) if self.state == SendState::Sending && now >= deadline => {
                warn!(
                    card_id = self.card_id.as_deref().unwrap_or_default(),
                    timeout_secs = self.timeout_secs,
                    "Send not confirmed in time, reverting to idle"
                );
                self.transition(SendState::Idle);
                true
            }
            _ => false,
        }
    }

    // -----------------------------------------------------------------
    // Send flow
    // -----------------------------------------------------------------

    /// Open the confirmation step for `card`.
    pub fn request_send(&mut self, card: &Card) -> Result<(), LifecycleError> {
        self.ensure_tracking(card)?;
        if card.card_outcome.is_sent() || card.card_outcome == CardOutcome::Dismissed {
            return Err(LifecycleError::AlreadyResolved(card.id.clone(), card.card_outcome));
        }
        if !card.is_sendable() {
            return Err(LifecycleError::NotSendable(card.id.clone()));
        }
        self.try_transition(SendState::Confirming)
    }

    pub fn cancel_send(&mut self) -> Result<(), LifecycleError> {
        self.try_transition(SendState::Idle)
    }

    /// Confirm the send. Produces the payload for the host and starts the
    /// timeout window at `now`.
    pub fn confirm_send(
        &mut self,
        card: &Card,
        now: Timestamp,
    ) -> Result<SendPayload, LifecycleError> {
        self.ensure_tracking(card)?;
        validate_transition(self.state, SendState::Sending)?;

        let final_text = self.final_text().to_string();
        if final_text.is_empty() {
            return Err(LifecycleError::EmptyDraft(card.id.clone()));
        }
        let ratio = levenshtein_ratio(&self.original, &final_text);

        self.transition(SendState::Sending);
        self.deadline = Some(now.plus_secs(self.timeout_secs));

        Ok(SendPayload {
            card_id: card.id.clone(),
            final_text,
            edit_distance_ratio: ratio,
        })
    }

    // -----------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------

    /// Enter edit mode, starting from the humanized draft.
    pub fn begin_edit(&mut self, card: &Card) -> Result<(), LifecycleError> {
        self.ensure_tracking(card)?;
        let effective = self.effective_state(card);
        if !matches!(effective, SendState::Idle | SendState::Confirming)
            || card.card_outcome == CardOutcome::Dismissed
        {
            return Err(LifecycleError::EditLocked(effective));
        }
        self.editing = true;
        self.edited_text = self.original.clone();
        Ok(())
    }

    pub fn update_edit(&mut self, text: impl Into<String>) -> Result<(), LifecycleError> {
        if !self.editing {
            return Err(LifecycleError::NotEditing);
        }
        if self.state == SendState::Sending {
            return Err(LifecycleError::EditLocked(self.state));
        }
        self.edited_text = text.into();
        Ok(())
    }

    /// Leave edit mode and discard the edits.
    pub fn cancel_edit(&mut self) {
        self.editing = false;
        self.edited_text = self.original.clone();
    }

    // -----------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------

    fn ensure_tracking(&mut self, card: &Card) -> Result<(), LifecycleError> {
        match self.card_id.as_deref() {
            None => {
                self.reset_for(card);
                Ok(())
            }
            Some(id) if id == card.id => Ok(()),
            Some(id) => Err(LifecycleError::WrongCard {
                tracked: Some(id.to_string()),
                requested: card.id.clone(),
            }),
        }
    }

    fn try_transition(&mut self, to: SendState) -> Result<(), LifecycleError> {
        validate_transition(self.state, to)?;
        self.transition(to);
        Ok(())
    }

    fn transition(&mut self, to: SendState) {
        debug!(from = %self.state, to = %to, "Send state transition");
        self.state = to;
        if to != SendState::Sending {
            self.deadline = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;
    use workdeck_core::{CardStatus, TriageTier, TriggerType};

    const DRAFT: &str = "Dear Fabrikam team, thanks for the update.";

    fn sendable(id: &str) -> Card {
        let mut card = Card::new(id);
        card.trigger_type = TriggerType::Email;
        card.triage_tier = TriageTier::Full;
        card.card_status = CardStatus::Ready;
        card.humanized_draft = Some(DRAFT.into());
        card.original_sender_email = Some("legal@fabrikam.com".into());
        card
    }

    fn tracking(card: &Card) -> SendLifecycle {
        let mut lifecycle = SendLifecycle::new(60);
        lifecycle.sync_card(card);
        lifecycle
    }

    // =====================================================================
    // Transition table
    // =====================================================================

    #[test]
    fn test_valid_transitions() {
        assert!(validate_transition(SendState::Idle, SendState::Confirming).is_ok());
        assert!(validate_transition(SendState::Confirming, SendState::Idle).is_ok());
        assert!(validate_transition(SendState::Confirming, SendState::Sending).is_ok());
        assert!(validate_transition(SendState::Sending, SendState::Idle).is_ok());
        assert!(validate_transition(SendState::Sending, SendState::Sent).is_ok());
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(validate_transition(SendState::Idle, SendState::Sending).is_err());
        assert!(validate_transition(SendState::Idle, SendState::Sent).is_err());
        assert!(validate_transition(SendState::Confirming, SendState::Sent).is_err());
        assert!(validate_transition(SendState::Sent, SendState::Idle).is_err());
        assert!(validate_transition(SendState::Idle, SendState::Idle).is_err());
    }

    // =====================================================================
    // Send flow
    // =====================================================================

    #[test]
    fn test_unedited_send_has_zero_ratio() {
        let card = sendable("a");
        let mut lifecycle = tracking(&card);

        lifecycle.request_send(&card).unwrap();
        assert_eq!(lifecycle.local_state(), SendState::Confirming);

        let payload = lifecycle.confirm_send(&card, Timestamp(1_000)).unwrap();
        assert_eq!(payload.card_id, "a");
        assert_eq!(payload.final_text, DRAFT);
        assert_eq!(payload.edit_distance_ratio, 0);
        assert_eq!(lifecycle.local_state(), SendState::Sending);
        assert_eq!(lifecycle.deadline(), Some(Timestamp(1_060)));
    }

    #[test]
    fn test_edited_send_carries_edited_text() {
        let card = sendable("a");
        let mut lifecycle = tracking(&card);

        lifecycle.begin_edit(&card).unwrap();
        lifecycle.update_edit("Thanks!").unwrap();
        assert!(lifecycle.is_modified());
        lifecycle.request_send(&card).unwrap();

        let payload = lifecycle.confirm_send(&card, Timestamp(0)).unwrap();
        assert_eq!(payload.final_text, "Thanks!");
        assert_eq!(payload.edit_distance_ratio, levenshtein_ratio(DRAFT, "Thanks!"));
        assert!(payload.edit_distance_ratio > 0);
    }

    #[test]
    fn test_cancel_returns_to_idle() {
        let card = sendable("a");
        let mut lifecycle = tracking(&card);
        lifecycle.request_send(&card).unwrap();
        lifecycle.cancel_send().unwrap();
        assert_eq!(lifecycle.local_state(), SendState::Idle);
        assert!(lifecycle.cancel_send().is_err());
    }

    #[test]
    fn test_confirm_without_request_is_rejected() {
        let card = sendable("a");
        let mut lifecycle = tracking(&card);
        let err = lifecycle.confirm_send(&card, Timestamp(0)).unwrap_err();
        assert_eq!(
            err,
            LifecycleError::InvalidTransition(SendState::Idle, SendState::Sending)
        );
    }

    #[test]
    fn test_request_send_requires_sendable() {
        let mut card = sendable("light-001");
        card.triage_tier = TriageTier::Light;
        let mut lifecycle = tracking(&card);
        assert_eq!(
            lifecycle.request_send(&card),
            Err(LifecycleError::NotSendable("light-001".into()))
        );
        assert_eq!(lifecycle.local_state(), SendState::Idle);
    }

    #[test]
    fn test_request_send_rejected_once_resolved() {
        let mut card = sendable("a");
        card.card_outcome = CardOutcome::Dismissed;
        let mut lifecycle = tracking(&card);
        assert!(matches!(
            lifecycle.request_send(&card),
            Err(LifecycleError::AlreadyResolved(_, CardOutcome::Dismissed))
        ));
    }

    #[test]
    fn test_empty_edit_cannot_be_sent() {
        let card = sendable("a");
        let mut lifecycle = tracking(&card);
        lifecycle.begin_edit(&card).unwrap();
        lifecycle.update_edit("").unwrap();
        lifecycle.request_send(&card).unwrap();
        assert_eq!(
            lifecycle.confirm_send(&card, Timestamp(0)),
            Err(LifecycleError::EmptyDraft("a".into()))
        );
        assert_eq!(lifecycle.local_state(), SendState::Confirming);
    }

    #[test]
    fn test_actions_on_untracked_card_rejected() {
        let a = sendable("a");
        let b = sendable("b");
        let mut lifecycle = tracking(&a);
        assert!(matches!(
            lifecycle.request_send(&b),
            Err(LifecycleError::WrongCard { .. })
        ));
    }

    // =====================================================================
    // Timeout
    // =====================================================================

    #[test]
    #[traced_test]
    fn test_sending_times_out_to_idle() {
        let card = sendable("a");
        let mut lifecycle = tracking(&card);
        lifecycle.request_send(&card).unwrap();
        lifecycle.confirm_send(&card, Timestamp(100)).unwrap();

        assert!(!lifecycle.tick(Timestamp(159)));
        assert_eq!(lifecycle.local_state(), SendState::Sending);

        assert!(lifecycle.tick(Timestamp(160)));
        assert_eq!(lifecycle.local_state(), SendState::Idle);
        assert_eq!(lifecycle.deadline(), None);
        assert!(logs_contain("reverting to idle"));

        // Retry is possible after the revert.
        lifecycle.request_send(&card).unwrap();
    }

    #[test]
    fn test_timeout_cancelled_when_leaving_sending() {
        let mut card = sendable("a");
        let mut lifecycle = tracking(&card);
        lifecycle.request_send(&card).unwrap();
        lifecycle.confirm_send(&card, Timestamp(0)).unwrap();

        card.card_outcome = CardOutcome::SentAsIs;
        lifecycle.observe(&card);
        assert_eq!(lifecycle.local_state(), SendState::Sent);
        assert_eq!(lifecycle.deadline(), None);
        assert!(!lifecycle.tick(Timestamp(1_000)));
        assert_eq!(lifecycle.local_state(), SendState::Sent);
    }

    #[test]
    fn test_custom_timeout_from_config() {
        let config = SendConfig { timeout_secs: 5 };
        let card = sendable("a");
        let mut lifecycle = SendLifecycle::from_config(&config);
        lifecycle.sync_card(&card);
        lifecycle.request_send(&card).unwrap();
        lifecycle.confirm_send(&card, Timestamp(10)).unwrap();
        assert_eq!(lifecycle.deadline(), Some(Timestamp(15)));
    }

    // =====================================================================
    // Reconciliation
    // =====================================================================

    #[test]
    fn test_outcome_overrides_local_state() {
        let mut card = sendable("a");
        let mut lifecycle = tracking(&card);
        lifecycle.request_send(&card).unwrap();
        assert_eq!(lifecycle.effective_state(&card), SendState::Confirming);

        card.card_outcome = CardOutcome::SentEdited;
        assert_eq!(lifecycle.effective_state(&card), SendState::Sent);

        card.card_outcome = CardOutcome::Dismissed;
        assert_eq!(lifecycle.effective_state(&card), SendState::Idle);
    }

    #[test]
    fn test_sent_outcome_without_local_send() {
        let mut card = sendable("a");
        card.card_outcome = CardOutcome::SentAsIs;
        let lifecycle = SendLifecycle::new(60);
        assert_eq!(lifecycle.effective_state(&card), SendState::Sent);
    }

    #[test]
    fn test_local_state_of_other_card_not_shown() {
        let a = sendable("a");
        let b = sendable("b");
        let mut lifecycle = tracking(&a);
        lifecycle.request_send(&a).unwrap();
        assert_eq!(lifecycle.effective_state(&b), SendState::Idle);
    }

    // =====================================================================
    // Editing and card switches
    // =====================================================================

    #[test]
    fn test_switching_card_resets_edit_state() {
        let a = sendable("a");
        let mut b = sendable("b");
        b.humanized_draft = Some("Hi Contoso".into());

        let mut lifecycle = tracking(&a);
        lifecycle.begin_edit(&a).unwrap();
        lifecycle.update_edit("changed").unwrap();
        lifecycle.request_send(&a).unwrap();

        assert!(lifecycle.sync_card(&b));
        assert!(!lifecycle.is_editing());
        assert_eq!(lifecycle.edited_text(), "Hi Contoso");
        assert_eq!(lifecycle.local_state(), SendState::Idle);
        assert_eq!(lifecycle.card_id(), Some("b"));
    }

    #[test]
    fn test_same_card_does_not_reset() {
        let a = sendable("a");
        let mut lifecycle = tracking(&a);
        lifecycle.begin_edit(&a).unwrap();
        assert!(!lifecycle.sync_card(&a));
        assert!(lifecycle.is_editing());
    }

    #[test]
    fn test_new_humanized_draft_resets() {
        let mut a = sendable("a");
        let mut lifecycle = tracking(&a);
        lifecycle.begin_edit(&a).unwrap();

        a.humanized_draft = Some("Revised draft".into());
        assert!(lifecycle.sync_card(&a));
        assert!(!lifecycle.is_editing());
        assert_eq!(lifecycle.edited_text(), "Revised draft");
    }

    #[test]
    fn test_cancel_edit_reverts_text() {
        let a = sendable("a");
        let mut lifecycle = tracking(&a);
        lifecycle.begin_edit(&a).unwrap();
        lifecycle.update_edit("scratch").unwrap();
        lifecycle.cancel_edit();
        assert!(!lifecycle.is_editing());
        assert_eq!(lifecycle.edited_text(), DRAFT);
        assert_eq!(lifecycle.final_text(), DRAFT);
    }

    #[test]
    fn test_edit_locked_while_sending_and_after_sent() {
        let mut a = sendable("a");
        let mut lifecycle = tracking(&a);
        lifecycle.request_send(&a).unwrap();
        lifecycle.confirm_send(&a, Timestamp(0)).unwrap();
        assert_eq!(
            lifecycle.begin_edit(&a),
            Err(LifecycleError::EditLocked(SendState::Sending))
        );

        a.card_outcome = CardOutcome::SentAsIs;
        assert_eq!(
            lifecycle.begin_edit(&a),
            Err(LifecycleError::EditLocked(SendState::Sent))
        );
    }

    #[test]
    fn test_update_without_begin_fails() {
        let mut lifecycle = SendLifecycle::default();
        assert_eq!(lifecycle.update_edit("x"), Err(LifecycleError::NotEditing));
    }

    #[test]
    fn test_clear_forgets_card() {
        let a = sendable("a");
        let mut lifecycle = tracking(&a);
        lifecycle.request_send(&a).unwrap();
        lifecycle.clear();
        assert_eq!(lifecycle.card_id(), None);
        assert_eq!(lifecycle.local_state(), SendState::Idle);
    }
}
