use std::fmt;

use serde::{Deserialize, Serialize};

use workdeck_core::config::AnalyticsConfig;

// =============================================================================
// Rate
// =============================================================================

/// A whole-number percentage, or no data when the denominator is zero.
///
/// Percentages are rounded half-up in integer arithmetic, so no float (and
/// no NaN or infinity) is ever produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Rate {
    NoData,
    Percent(u32),
}

impl Rate {
    pub fn of(numerator: usize, denominator: usize) -> Self {
        if denominator == 0 {
            return Rate::NoData;
        }
        let num = numerator as u64 * 100;
        let den = denominator as u64;
        let rounded = (2 * num + den) / (2 * den);
        Rate::Percent(rounded as u32)
    }

    pub fn percent(&self) -> Option<u32> {
        match self {
            Rate::NoData => None,
            Rate::Percent(p) => Some(*p),
        }
    }

    /// Good/ok/poor banding used when rendering. `None` for no data.
    pub fn classify(&self, config: &AnalyticsConfig) -> Option<RateClass> {
        let p = self.percent()?;
        Some(if p >= config.good_threshold {
            RateClass::Good
        } else if p >= config.ok_threshold {
            RateClass::Ok
        } else {
            RateClass::Poor
        })
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rate::NoData => write!(f, "no data"),
            Rate::Percent(p) => write!(f, "{}%", p),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateClass {
    Good,
    Ok,
    Poor,
}

impl fmt::Display for RateClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateClass::Good => write!(f, "good"),
            RateClass::Ok => write!(f, "ok"),
            RateClass::Poor => write!(f, "poor"),
        }
    }
}

// =============================================================================
// Views
// =============================================================================

/// Resolved cards whose confidence score falls in `[low, high]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccuracyBucket {
    pub low: u8,
    pub high: u8,
    pub total: usize,
    pub acted: usize,
    pub dismissed: usize,
    pub action_rate: Rate,
}

impl AccuracyBucket {
    pub fn label(&self) -> String {
        format!("{}-{}", self.low, self.high)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageStats {
    pub full_total: usize,
    pub full_acted: usize,
    pub full_dismissed: usize,
    pub full_action_rate: Rate,
    pub light_total: usize,
    pub light_dismissed: usize,
    pub light_dismiss_rate: Rate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftStats {
    pub total_sent: usize,
    pub sent_as_is: usize,
    pub sent_edited: usize,
    pub as_is_rate: Rate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderEngagement {
    pub email: String,
    /// Display name from the first card seen, or the email if none.
    pub display: String,
    pub signal_count: usize,
    pub response_count: usize,
    pub response_rate: Rate,
}

/// All four analytics views for one card collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationReport {
    pub resolved_count: usize,
    pub buckets: Vec<AccuracyBucket>,
    pub triage: TriageStats,
    pub drafts: DraftStats,
    pub top_senders: Vec<SenderEngagement>,
}
