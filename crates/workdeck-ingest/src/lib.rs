//! Ingestion for Workdeck.
//!
//! Turns the host's ordered collection of raw key/value records into
//! validated [`Card`](workdeck_core::Card)s. Malformed rows are skipped with a
//! diagnostic; one bad record never aborts a batch.

pub mod cache;
pub mod error;
pub mod normalizer;
pub mod record;

pub use cache::CardCache;
pub use error::IngestError;
pub use normalizer::{normalize_record, normalize_records, NormalizedBatch, SkippedRecord};
pub use record::{MemoryRecord, RawRecord, RecordSet, RecordSource};
