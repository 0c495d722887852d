//! Workdeck UI crate - view state and view models for the dashboard.
//!
//! Nothing here draws pixels. Each module produces plain data that a host
//! surface (or the CLI) renders:
//!
//! - [`filter`]: the four host-supplied filters, applied conjunctively
//! - [`navigation`]: gallery / detail / analytics state machine
//! - [`gallery`], [`detail`], [`briefing`]: view models per screen
//! - [`command_bar`]: session transcript with the orchestrator
//! - [`boundary`]: catches render failures and offers a retry

pub mod boundary;
pub mod briefing;
pub mod command_bar;
pub mod detail;
pub mod error;
pub mod filter;
pub mod gallery;
pub mod navigation;

pub use boundary::{ErrorBoundary, Fallback, Rendered, RetryHandle};
pub use briefing::{briefing_view, BriefingView};
pub use command_bar::{CommandBar, ConversationEntry, OrchestratorResponse, Role};
pub use detail::{detail_view, DetailView};
pub use error::NavigationError;
pub use filter::CardFilters;
pub use gallery::{gallery_view, EmptyState, GalleryView};
pub use navigation::{Navigator, View};
