//! Workdeck Insight crate - behavioural analytics over the card history.
//!
//! Derives four independent views from resolved cards:
//! - Confidence accuracy (does a high score predict action?)
//! - Triage quality (FULL acted on, LIGHT dismissed)
//! - Draft quality (sent as-is vs sent edited)
//! - Sender engagement (who sends the most, and how often we reply)

pub mod analytics;
pub mod report;
pub mod types;

pub use analytics::{compute, resolved_cards};
pub use report::{render_report, ReportText};
pub use types::{
    AccuracyBucket, CalibrationReport, DraftStats, Rate, RateClass, SenderEngagement, TriageStats,
};
