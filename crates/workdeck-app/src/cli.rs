//! CLI argument definitions for the workdeck preview binary.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use workdeck_ui::CardFilters;

/// Workdeck: preview the card dashboard against a JSON record export.
#[derive(Parser, Debug)]
#[command(name = "workdeck", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// JSON array of records, as the host would push them.
    #[arg(short = 'r', long = "records")]
    pub records: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Trigger type filter.
    #[arg(long = "trigger", default_value = "")]
    pub trigger: String,

    /// Priority filter.
    #[arg(long = "priority", default_value = "")]
    pub priority: String,

    /// Card status filter.
    #[arg(long = "status", default_value = "")]
    pub status: String,

    /// Temporal horizon filter.
    #[arg(long = "horizon", default_value = "")]
    pub horizon: String,

    /// Allocated width; 0 uses the configured fallback.
    #[arg(long = "width", default_value_t = 0)]
    pub width: u32,

    /// Allocated height; 0 uses the configured fallback.
    #[arg(long = "height", default_value_t = 0)]
    pub height: u32,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Show the card gallery.
    Gallery,
    /// Open one card.
    Detail { card_id: String },
    /// Show the calibration report.
    Analytics,
    /// Open a card, optionally edit its draft, and confirm the send.
    Send {
        card_id: String,
        /// Replacement draft text.
        #[arg(long = "edit")]
        edit: Option<String>,
    },
    /// Ask the host to copy a card's draft.
    Copy { card_id: String },
    /// Ask the host to dismiss a card.
    Dismiss { card_id: String },
    /// Submit a command bar request, scoped to a card when given.
    Ask {
        text: String,
        #[arg(long = "card")]
        card_id: Option<String>,
    },
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > WORKDECK_CONFIG env var > ~/.workdeck/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("WORKDECK_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > WORKDECK_LOG env var > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        if let Some(ref level) = self.log_level {
            return level.clone();
        }
        if let Ok(level) = std::env::var("WORKDECK_LOG") {
            if !level.trim().is_empty() {
                return level;
            }
        }
        if !config_level.trim().is_empty() {
            return config_level.to_string();
        }
        "info".to_string()
    }

    pub fn filters(&self) -> CardFilters {
        CardFilters {
            trigger_type: self.trigger.clone(),
            priority: self.priority.clone(),
            card_status: self.status.clone(),
            temporal_horizon: self.horizon.clone(),
        }
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".workdeck").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".workdeck").join("config.toml");
    }
    PathBuf::from("config.toml")
}
