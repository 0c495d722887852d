//! Generation-keyed memo of the normalized card collection.
//!
//! The host mutates its record collection in place, so the collection
//! reference tells us nothing. The host bumps a generation counter every
//! refresh instead, and the cache recomputes only when that changes.

use tracing::trace;

use crate::normalizer::{normalize_records, NormalizedBatch};
use crate::record::RecordSource;

#[derive(Debug, Default)]
pub struct CardCache {
    batch: Option<NormalizedBatch>,
}

impl CardCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cards for `generation`, normalizing `source` if this generation has
    /// not been seen yet.
    pub fn get_or_normalize(&mut self, source: &dyn RecordSource, generation: u64) -> &NormalizedBatch {
        let stale = !matches!(&self.batch, Some(batch) if batch.generation == generation);

        if stale {
            self.batch = Some(normalize_records(source, generation));
        } else {
            trace!(generation, "Card cache hit");
        }

        self.batch.get_or_insert_with(NormalizedBatch::default)
    }

    /// The most recently computed batch, if any refresh has happened.
    pub fn current(&self) -> Option<&NormalizedBatch> {
        self.batch.as_ref()
    }

    pub fn generation(&self) -> Option<u64> {
        self.batch.as_ref().map(|b| b.generation)
    }

    pub fn invalidate(&mut self) {
        self.batch = None;
    }
}
