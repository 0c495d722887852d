//! Inputs the host pushes on every refresh.

use workdeck_core::config::HostConfig;
use workdeck_core::Timestamp;
use workdeck_ingest::RecordSource;
use workdeck_ui::CardFilters;

/// Size allocated to the widget by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Apply the configured fallback to any zero dimension.
    pub fn resolve(width: u32, height: u32, config: &HostConfig) -> Self {
        Self {
            width: if width == 0 { config.fallback_width } else { width },
            height: if height == 0 { config.fallback_height } else { height },
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::resolve(0, 0, &HostConfig::default())
    }
}

/// One refresh from the host.
pub struct UpdateContext<'a> {
    pub records: &'a dyn RecordSource,
    pub filters: CardFilters,
    pub width: u32,
    pub height: u32,
    /// Serialized orchestrator response, when the host has one.
    pub orchestrator_response: Option<&'a str>,
    pub processing: bool,
    pub now: Timestamp,
}

impl<'a> UpdateContext<'a> {
    /// A refresh with no filters, no orchestrator traffic and a zero-size
    /// allocation.
    pub fn new(records: &'a dyn RecordSource, now: Timestamp) -> Self {
        Self {
            records,
            filters: CardFilters::default(),
            width: 0,
            height: 0,
            orchestrator_response: None,
            processing: false,
            now,
        }
    }

    pub fn with_filters(mut self, filters: CardFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_orchestrator(mut self, response: Option<&'a str>, processing: bool) -> Self {
        self.orchestrator_response = response;
        self.processing = processing;
        self
    }
}
