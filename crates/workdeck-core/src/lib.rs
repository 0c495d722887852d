pub mod briefing;
pub mod config;
pub mod error;
pub mod safety;
pub mod similarity;
pub mod types;

pub use briefing::DailyBriefing;
pub use config::WorkdeckConfig;
pub use error::{Result, WorkdeckError};
pub use safety::is_safe_url;
pub use similarity::levenshtein_ratio;
pub use types::*;
