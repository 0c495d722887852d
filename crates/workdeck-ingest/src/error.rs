//! Error types for record ingestion.

use workdeck_core::error::WorkdeckError;

/// Why a raw record could not become a card.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IngestError {
    #[error("Record {0} has no payload")]
    MissingPayload(String),
    #[error("Record {record_id} has a malformed payload: {reason}")]
    MalformedPayload { record_id: String, reason: String },
    #[error("Record {0} payload is not a JSON object")]
    NotAnObject(String),
}

impl IngestError {
    pub fn record_id(&self) -> &str {
        match self {
            IngestError::MissingPayload(id) | IngestError::NotAnObject(id) => id,
            IngestError::MalformedPayload { record_id, .. } => record_id,
        }
    }
}

impl From<IngestError> for WorkdeckError {
    fn from(err: IngestError) -> Self {
        WorkdeckError::Ingest(err.to_string())
    }
}
