//! Workdeck host bridge.
//!
//! Wires the ingest, action, insight and UI crates behind the
//! [`DashboardControl`] the embedding host drives: push records, render,
//! pull output actions.

pub mod context;
pub mod control;
pub mod error;
pub mod screen;

pub use context::{UpdateContext, Viewport};
pub use control::DashboardControl;
pub use error::HostError;
pub use screen::{AnalyticsScreen, Frame, Screen};
