//! Analytics aggregation.
//!
//! A pure function of the card collection, recomputed in full on every call.

use std::collections::HashMap;

use tracing::debug;

use workdeck_core::{Card, CardOutcome, TriageTier};

use crate::types::{AccuracyBucket, CalibrationReport, DraftStats, Rate, SenderEngagement, TriageStats};

/// Confidence bucket bounds, highest first.
pub const BUCKETS: [(u8, u8); 4] = [(90, 100), (70, 89), (40, 69), (0, 39)];

/// Cards the user has dealt with: not pending, not an aggregate briefing.
pub fn resolved_cards(cards: &[Card]) -> Vec<&Card> {
    cards.iter().filter(|c| c.is_resolved()).collect()
}

/// Compute every analytics view. `top_senders` caps the engagement ranking.
pub fn compute(cards: &[Card], top_senders: usize) -> CalibrationReport {
    let resolved = resolved_cards(cards);

    let report = CalibrationReport {
        resolved_count: resolved.len(),
        buckets: confidence_buckets(&resolved),
        triage: triage_stats(&resolved),
        drafts: draft_stats(&resolved),
        top_senders: sender_engagement(cards, top_senders),
    };

    debug!(
        cards = cards.len(),
        resolved = report.resolved_count,
        senders = report.top_senders.len(),
        "Computed analytics"
    );
    report
}

fn is_acted(card: &Card) -> bool {
    card.card_outcome.is_sent()
}

fn is_dismissed(card: &Card) -> bool {
    card.card_outcome == CardOutcome::Dismissed
}

pub fn confidence_buckets(resolved: &[&Card]) -> Vec<AccuracyBucket> {
    let mut counts = [(0usize, 0usize, 0usize); 4];

    for card in resolved {
        let Some(score) = card.confidence_score else {
            continue;
        };
        let Some(idx) = BUCKETS
            .iter()
            .position(|(low, high)| (*low..=*high).contains(&score))
        else {
            continue;
        };
        let (total, acted, dismissed) = &mut counts[idx];
        *total += 1;
        if is_acted(card) {
            *acted += 1;
        } else if is_dismissed(card) {
            *dismissed += 1;
        }
    }

    BUCKETS
        .iter()
        .zip(counts)
        .map(|(&(low, high), (total, acted, dismissed))| AccuracyBucket {
            low,
            high,
            total,
            acted,
            dismissed,
            action_rate: Rate::of(acted, total),
        })
        .collect()
}

pub fn triage_stats(resolved: &[&Card]) -> TriageStats {
    let full: Vec<&&Card> = resolved
        .iter()
        .filter(|c| c.triage_tier == TriageTier::Full)
        .collect();
    let full_acted = full.iter().filter(|c| is_acted(c)).count();
    let full_dismissed = full.iter().filter(|c| is_dismissed(c)).count();

    let light: Vec<&&Card> = resolved
        .iter()
        .filter(|c| c.triage_tier == TriageTier::Light)
        .collect();
    let light_dismissed = light.iter().filter(|c| is_dismissed(c)).count();

    TriageStats {
        full_total: full.len(),
        full_acted,
        full_dismissed,
        full_action_rate: Rate::of(full_acted, full.len()),
        light_total: light.len(),
        light_dismissed,
        light_dismiss_rate: Rate::of(light_dismissed, light.len()),
    }
}

pub fn draft_stats(resolved: &[&Card]) -> DraftStats {
    let sent_as_is = resolved
        .iter()
        .filter(|c| c.card_outcome == CardOutcome::SentAsIs)
        .count();
    let sent_edited = resolved
        .iter()
        .filter(|c| c.card_outcome == CardOutcome::SentEdited)
        .count();
    let total_sent = sent_as_is + sent_edited;

    DraftStats {
        total_sent,
        sent_as_is,
        sent_edited,
        as_is_rate: Rate::of(sent_as_is, total_sent),
    }
}

/// Group every card (resolved or not) by sender, rank by signal count.
/// Ties keep first-seen order.
pub fn sender_engagement(cards: &[Card], limit: usize) -> Vec<SenderEngagement> {
    let mut order: Vec<SenderEngagement> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for card in cards {
        let Some(email) = card.original_sender_email.as_deref().filter(|e| !e.is_empty()) else {
            continue;
        };
        let idx = *index.entry(email).or_insert_with(|| {
            order.push(SenderEngagement {
                email: email.to_string(),
                display: card
                    .original_sender_display
                    .clone()
                    .unwrap_or_else(|| email.to_string()),
                signal_count: 0,
                response_count: 0,
                response_rate: Rate::NoData,
            });
            order.len() - 1
        });

        let sender = &mut order[idx];
        sender.signal_count += 1;
        if is_acted(card) {
            sender.response_count += 1;
        }
    }

    for sender in &mut order {
        sender.response_rate = Rate::of(sender.response_count, sender.signal_count);
    }

    order.sort_by(|a, b| b.signal_count.cmp(&a.signal_count));
    order.truncate(limit);
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use workdeck_core::TriggerType;

    fn card(id: &str, outcome: CardOutcome) -> Card {
        let mut card = Card::new(id);
        card.card_outcome = outcome;
        card
    }

    fn scored(id: &str, score: u8, outcome: CardOutcome) -> Card {
        let mut c = card(id, outcome);
        c.confidence_score = Some(score);
        c
    }

    fn tiered(id: &str, tier: TriageTier, outcome: CardOutcome) -> Card {
        let mut c = card(id, outcome);
        c.triage_tier = tier;
        c
    }

    fn from(id: &str, email: &str, outcome: CardOutcome) -> Card {
        let mut c = card(id, outcome);
        c.original_sender_email = Some(email.to_string());
        c
    }

    #[test]
    fn test_resolved_excludes_pending_and_briefings() {
        let mut briefing = card("b", CardOutcome::Dismissed);
        briefing.trigger_type = TriggerType::DailyBriefing;
        let cards = vec![
            card("p", CardOutcome::Pending),
            card("s", CardOutcome::SentAsIs),
            card("e", CardOutcome::Expired),
            briefing,
        ];
        let ids: Vec<&str> = resolved_cards(&cards).iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["s", "e"]);
    }

    #[test]
    fn test_top_bucket_half_acted() {
        let cards = vec![
            scored("a", 95, CardOutcome::SentAsIs),
            scored("b", 92, CardOutcome::Dismissed),
        ];
        let report = compute(&cards, 10);
        let top = &report.buckets[0];
        assert_eq!(top.label(), "90-100");
        assert_eq!(top.total, 2);
        assert_eq!(top.acted, 1);
        assert_eq!(top.dismissed, 1);
        assert_eq!(top.action_rate, Rate::Percent(50));
        assert_eq!(report.buckets[1].action_rate, Rate::NoData);
    }

    #[test]
    fn test_bucket_boundaries() {
        let cards = vec![
            scored("a", 100, CardOutcome::SentAsIs),
            scored("b", 90, CardOutcome::SentAsIs),
            scored("c", 89, CardOutcome::SentAsIs),
            scored("d", 70, CardOutcome::SentAsIs),
            scored("e", 69, CardOutcome::SentAsIs),
            scored("f", 40, CardOutcome::SentAsIs),
            scored("g", 39, CardOutcome::SentAsIs),
            scored("h", 0, CardOutcome::SentAsIs),
        ];
        let buckets = confidence_buckets(&resolved_cards(&cards));
        let totals: Vec<usize> = buckets.iter().map(|b| b.total).collect();
        assert_eq!(totals, vec![2, 2, 2, 2]);
    }

    #[test]
    fn test_unscored_and_pending_cards_not_bucketed() {
        let cards = vec![
            card("unscored", CardOutcome::SentAsIs),
            scored("pending", 95, CardOutcome::Pending),
        ];
        let buckets = confidence_buckets(&resolved_cards(&cards));
        assert!(buckets.iter().all(|b| b.total == 0));
    }

    #[test]
    fn test_expired_counts_toward_total_only() {
        let cards = vec![
            scored("a", 50, CardOutcome::Expired),
            scored("b", 50, CardOutcome::SentEdited),
        ];
        let bucket = &confidence_buckets(&resolved_cards(&cards))[2];
        assert_eq!(bucket.total, 2);
        assert_eq!(bucket.acted, 1);
        assert_eq!(bucket.dismissed, 0);
        assert_eq!(bucket.action_rate, Rate::Percent(50));
    }

    #[test]
    fn test_triage_full_action_rate_rounds() {
        let cards = vec![
            tiered("a", TriageTier::Full, CardOutcome::SentAsIs),
            tiered("b", TriageTier::Full, CardOutcome::SentEdited),
            tiered("c", TriageTier::Full, CardOutcome::Dismissed),
            tiered("d", TriageTier::Light, CardOutcome::Dismissed),
            tiered("e", TriageTier::Light, CardOutcome::Expired),
            tiered("f", TriageTier::Skip, CardOutcome::Dismissed),
        ];
        let triage = triage_stats(&resolved_cards(&cards));
        assert_eq!(triage.full_total, 3);
        assert_eq!(triage.full_acted, 2);
        assert_eq!(triage.full_dismissed, 1);
        assert_eq!(triage.full_action_rate, Rate::Percent(67));
        assert_eq!(triage.light_total, 2);
        assert_eq!(triage.light_dismissed, 1);
        assert_eq!(triage.light_dismiss_rate, Rate::Percent(50));
    }

    #[test]
    fn test_draft_stats() {
        let cards = vec![
            card("a", CardOutcome::SentAsIs),
            card("b", CardOutcome::SentAsIs),
            card("c", CardOutcome::SentEdited),
            card("d", CardOutcome::Dismissed),
        ];
        let drafts = draft_stats(&resolved_cards(&cards));
        assert_eq!(drafts.total_sent, 3);
        assert_eq!(drafts.sent_as_is, 2);
        assert_eq!(drafts.sent_edited, 1);
        assert_eq!(drafts.as_is_rate, Rate::Percent(67));
    }

    #[test]
    fn test_sender_engagement_ranks_all_cards() {
        let mut first = from("1", "sarah@contoso.com", CardOutcome::Pending);
        first.original_sender_display = Some("Sarah Chen".into());
        let cards = vec![
            from("0", "bob@fabrikam.com", CardOutcome::SentAsIs),
            first,
            from("2", "sarah@contoso.com", CardOutcome::SentEdited),
            from("3", "sarah@contoso.com", CardOutcome::Dismissed),
            from("4", "", CardOutcome::SentAsIs),
            card("5", CardOutcome::SentAsIs),
        ];

        let senders = sender_engagement(&cards, 10);
        assert_eq!(senders.len(), 2);
        assert_eq!(senders[0].email, "sarah@contoso.com");
        assert_eq!(senders[0].display, "Sarah Chen");
        assert_eq!(senders[0].signal_count, 3);
        assert_eq!(senders[0].response_count, 1);
        assert_eq!(senders[0].response_rate, Rate::Percent(33));
        assert_eq!(senders[1].display, "bob@fabrikam.com");
        assert_eq!(senders[1].response_rate, Rate::Percent(100));
    }

    #[test]
    fn test_sender_ties_keep_first_seen_order_and_cap() {
        let cards: Vec<Card> = (0..15)
            .map(|i| from(&i.to_string(), &format!("s{}@x.com", i), CardOutcome::Pending))
            .collect();
        let senders = sender_engagement(&cards, 10);
        assert_eq!(senders.len(), 10);
        assert_eq!(senders[0].email, "s0@x.com");
        assert_eq!(senders[9].email, "s9@x.com");
    }

    #[test]
    fn test_no_resolved_cards_is_all_no_data() {
        let cards = vec![scored("a", 95, CardOutcome::Pending)];
        let report = compute(&cards, 10);
        assert_eq!(report.resolved_count, 0);
        assert!(report.buckets.iter().all(|b| b.action_rate == Rate::NoData));
        assert_eq!(report.triage.full_action_rate, Rate::NoData);
        assert_eq!(report.triage.light_dismiss_rate, Rate::NoData);
        assert_eq!(report.drafts.as_is_rate, Rate::NoData);
    }

    #[test]
    fn test_empty_collection() {
        let report = compute(&[], 10);
        assert_eq!(report.buckets.len(), 4);
        assert!(report.top_senders.is_empty());
    }
}
