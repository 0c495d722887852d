//! Plain-text rendering of a [`CalibrationReport`].

use std::fmt;

use workdeck_core::config::AnalyticsConfig;

use crate::types::{CalibrationReport, Rate};

fn rate_cell(rate: Rate, config: &AnalyticsConfig) -> String {
    match rate.classify(config) {
        Some(class) => format!("{} ({})", rate, class),
        None => rate.to_string(),
    }
}

/// A [`CalibrationReport`] paired with the thresholds used to classify its
/// rates, printable as plain text.
pub struct ReportText<'a> {
    pub report: &'a CalibrationReport,
    pub config: &'a AnalyticsConfig,
}

impl fmt::Display for ReportText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;
        let config = self.config;

        writeln!(f, "Agent Performance")?;
        writeln!(f, "Based on {} resolved cards", report.resolved_count)?;

        writeln!(f, "\nConfidence Accuracy")?;
        writeln!(
            f,
            "{:<10} {:>6} {:>9} {:>10}  Action Rate",
            "Range", "Cards", "Acted On", "Dismissed"
        )?;
        for bucket in &report.buckets {
            writeln!(
                f,
                "{:<10} {:>6} {:>9} {:>10}  {}",
                bucket.label(),
                bucket.total,
                bucket.acted,
                bucket.dismissed,
                rate_cell(bucket.action_rate, config)
            )?;
        }

        let triage = &report.triage;
        writeln!(f, "\nTriage Quality")?;
        writeln!(
            f,
            "FULL card action rate: {} ({} acted / {} total)",
            rate_cell(triage.full_action_rate, config),
            triage.full_acted,
            triage.full_total
        )?;
        writeln!(f, "FULL cards dismissed: {}", triage.full_dismissed)?;
        writeln!(
            f,
            "LIGHT card dismiss rate: {} ({} / {})",
            triage.light_dismiss_rate, triage.light_dismissed, triage.light_total
        )?;

        let drafts = &report.drafts;
        writeln!(f, "\nDraft Quality")?;
        writeln!(
            f,
            "Sent as-is: {} of {} sent ({} as-is, {} edited)",
            rate_cell(drafts.as_is_rate, config),
            drafts.total_sent,
            drafts.sent_as_is,
            drafts.sent_edited
        )?;

        writeln!(f, "\nTop Senders")?;
        if report.top_senders.is_empty() {
            writeln!(f, "No sender data yet")?;
        }
        for sender in &report.top_senders {
            writeln!(
                f,
                "{} <{}>: {} signals, {} responses, {} response rate",
                sender.display,
                sender.email,
                sender.signal_count,
                sender.response_count,
                sender.response_rate
            )?;
        }
        Ok(())
    }
}

/// Render all four views as text. Rates with no data print as "no data".
pub fn render_report(report: &CalibrationReport, config: &AnalyticsConfig) -> String {
    ReportText { report, config }.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::compute;
    use workdeck_core::{Card, CardOutcome};

    fn scored(id: &str, score: u8, outcome: CardOutcome) -> Card {
        let mut card = Card::new(id);
        card.confidence_score = Some(score);
        card.card_outcome = outcome;
        card.original_sender_email = Some("sarah@contoso.com".into());
        card
    }

    #[test]
    fn test_empty_report_never_prints_nan_or_zero_rates() {
        let report = compute(&[], 10);
        let text = render_report(&report, &AnalyticsConfig::default());

        assert!(text.contains("Based on 0 resolved cards"));
        assert!(text.contains("no data"));
        assert!(text.contains("No sender data yet"));
        assert!(!text.contains("NaN"));
        assert!(!text.contains("Infinity"));
        assert!(!text.contains("inf"));
        assert!(!text.contains("0%"));
    }

    #[test]
    fn test_report_with_data() {
        let cards = vec![
            scored("a", 95, CardOutcome::SentAsIs),
            scored("b", 92, CardOutcome::Dismissed),
        ];
        let text = render_report(&compute(&cards, 10), &AnalyticsConfig::default());

        assert!(text.contains("Based on 2 resolved cards"));
        assert!(text.contains("90-100"));
        assert!(text.contains("50% (ok)"));
        assert!(text.contains("Sent as-is: 100% (good) of 1 sent"));
        assert!(text.contains("sarah@contoso.com <sarah@contoso.com>: 2 signals, 1 responses, 50% response rate"));
    }

    #[test]
    fn test_report_text_streams_into_formatter() {
        let cards = vec![scored("a", 75, CardOutcome::SentEdited)];
        let report = compute(&cards, 10);
        let config = AnalyticsConfig::default();

        let streamed = format!("{}", ReportText { report: &report, config: &config });
        assert_eq!(streamed, render_report(&report, &config));
        assert!(streamed.starts_with("Agent Performance\n"));
        assert!(streamed.contains("70-89"));
        assert!(streamed.ends_with("response rate\n"));
    }
}
