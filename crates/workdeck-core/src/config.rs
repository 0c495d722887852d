use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, WorkdeckError};

/// Top-level configuration for the Workdeck dashboard.
///
/// Loaded from `~/.workdeck/config.toml` by default. Every section is
/// optional; missing sections and keys take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkdeckConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub host: HostConfig,
    #[serde(default)]
    pub send: SendConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub command_bar: CommandBarConfig,
}

impl WorkdeckConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: WorkdeckConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| WorkdeckError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Host surface settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Width used when the host allocates zero width.
    pub fallback_width: u32,
    /// Height used when the host allocates zero height.
    pub fallback_height: u32,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            fallback_width: 800,
            fallback_height: 600,
        }
    }
}

/// Send lifecycle settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SendConfig {
    /// Seconds a card may stay in `Sending` before reverting to `Idle`.
    pub timeout_secs: i64,
}

impl Default for SendConfig {
    fn default() -> Self {
        Self { timeout_secs: 60 }
    }
}

/// Analytics view settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Number of senders kept in the engagement ranking.
    pub top_senders: usize,
    /// Rates at or above this are classified as good.
    pub good_threshold: u32,
    /// Rates at or above this (and below `good_threshold`) are classified as ok.
    pub ok_threshold: u32,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            top_senders: 10,
            good_threshold: 70,
            ok_threshold: 40,
        }
    }
}

/// A canned command offered as a chip in the command bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickAction {
    pub label: String,
    pub command: String,
}

impl QuickAction {
    fn new(label: &str, command: &str) -> Self {
        Self {
            label: label.to_string(),
            command: command.to_string(),
        }
    }
}

/// Command bar settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandBarConfig {
    pub quick_actions: Vec<QuickAction>,
}

impl Default for CommandBarConfig {
    fn default() -> Self {
        Self {
            quick_actions: vec![
                QuickAction::new("What's urgent?", "What needs my attention right now?"),
                QuickAction::new("Draft status", "Show me all cards with drafts ready to send"),
                QuickAction::new("My day", "What should I focus on today?"),
            ],
        }
    }
}
