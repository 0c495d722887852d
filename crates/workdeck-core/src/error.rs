use thiserror::Error;

/// Top-level error type for the Workdeck dashboard.
///
/// Subsystem crates define their own error enums and implement
/// `From<SubsystemError> for WorkdeckError` so that `?` works across crate
/// boundaries. None of these ever reach the host as an unhandled fault: the
/// host bridge converts them into degraded-but-functional behaviour.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WorkdeckError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Ingest error: {0}")]
    Ingest(String),

    #[error("Lifecycle error: {0}")]
    Lifecycle(String),

    #[error("Navigation error: {0}")]
    Navigation(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Host error: {0}")]
    Host(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for WorkdeckError {
    fn from(err: toml::de::Error) -> Self {
        WorkdeckError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for WorkdeckError {
    fn from(err: toml::ser::Error) -> Self {
        WorkdeckError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for WorkdeckError {
    fn from(err: serde_json::Error) -> Self {
        WorkdeckError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Workdeck operations.
pub type Result<T> = std::result::Result<T, WorkdeckError>;
