//! Card normalizer.
//!
//! Converts each raw record into a [`Card`]. The record's `cr_fulljson`
//! column carries the upstream agent's JSON output; a handful of discrete
//! columns (humanized draft, outcome, sender identity) are maintained by the
//! host independently and take precedence over anything in the payload.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use workdeck_core::{
    Card, CardOutcome, CardStatus, DraftObject, DraftPayload, DraftType, InferredTone, Priority,
    RecipientRelationship, TemporalHorizon, TriageTier, TriggerType, VerifiedSource,
};

use crate::error::IngestError;
use crate::record::{RawRecord, RecordSource};

// =============================================================================
// Column names
// =============================================================================

pub const COL_FULL_JSON: &str = "cr_fulljson";
pub const COL_HUMANIZED_DRAFT: &str = "cr_humanizeddraft";
pub const COL_SENDER_EMAIL: &str = "cr_originalsenderemail";
pub const COL_SENDER_DISPLAY: &str = "cr_originalsenderdisplay";
pub const COL_SUBJECT: &str = "cr_originalsubject";
pub const COL_CLUSTER_ID: &str = "cr_conversationclusterid";
pub const COL_SOURCE_SIGNAL_ID: &str = "cr_sourcesignalid";
pub const COL_CREATED_ON: &str = "createdon";
pub const COL_OUTCOME: &str = "cr_cardoutcome";

/// Upstream placeholder for "no value" in priority and horizon fields.
const NOT_APPLICABLE: &str = "N/A";

// =============================================================================
// Batch output
// =============================================================================

/// A record that could not be normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    pub record_id: String,
    pub error: IngestError,
}

/// Result of normalizing one host refresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedBatch {
    /// Generation the batch was computed for.
    pub generation: u64,
    /// Cards in the source's display order.
    pub cards: Vec<Card>,
    pub skipped: Vec<SkippedRecord>,
}

impl NormalizedBatch {
    pub fn card(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }
}

// =============================================================================
// Normalization
// =============================================================================

/// Normalize every record of `source`, in order.
///
/// Never fails as a whole: each record that cannot be normalized is logged
/// with its id and reported in [`NormalizedBatch::skipped`].
pub fn normalize_records(source: &dyn RecordSource, generation: u64) -> NormalizedBatch {
    let mut batch = NormalizedBatch {
        generation,
        ..NormalizedBatch::default()
    };

    for id in source.sorted_record_ids() {
        let Some(record) = source.record(id) else {
            debug!(record_id = %id, "Record id listed but not present, skipping");
            continue;
        };

        match normalize_record(record) {
            Ok(card) => batch.cards.push(card),
            Err(e) => {
                match &e {
                    IngestError::MissingPayload(_) => {
                        debug!(record_id = %id, "Record has no payload, skipping")
                    }
                    _ => warn!(record_id = %id, error = %e, "Failed to parse record, skipping"),
                }
                batch.skipped.push(SkippedRecord {
                    record_id: id.clone(),
                    error: e,
                });
            }
        }
    }

    debug!(
        generation,
        cards = batch.cards.len(),
        skipped = batch.skipped.len(),
        "Normalized record batch"
    );
    batch
}

/// Normalize a single record.
pub fn normalize_record(record: &dyn RawRecord) -> Result<Card, IngestError> {
    let id = record.record_id();

    let raw = record
        .text_value(COL_FULL_JSON)
        .ok_or_else(|| IngestError::MissingPayload(id.to_string()))?;

    let parsed: Value =
        serde_json::from_str(&raw).map_err(|e| IngestError::MalformedPayload {
            record_id: id.to_string(),
            reason: e.to_string(),
        })?;

    let Value::Object(payload) = parsed else {
        return Err(IngestError::NotAnObject(id.to_string()));
    };

    let mut card = Card::new(id);

    card.trigger_type = enum_field(&payload, "trigger_type", id, TriggerType::parse)
        .unwrap_or_default();
    card.triage_tier =
        enum_field(&payload, "triage_tier", id, TriageTier::parse).unwrap_or_default();
    card.card_status =
        enum_field(&payload, "card_status", id, CardStatus::parse).unwrap_or_default();
    card.priority = enum_field(&payload, "priority", id, Priority::parse);
    card.temporal_horizon = enum_field(&payload, "temporal_horizon", id, TemporalHorizon::parse);

    card.item_summary = string_field(&payload, "item_summary").unwrap_or_default();
    card.research_log = string_field(&payload, "research_log");
    card.key_findings = string_field(&payload, "key_findings");
    card.low_confidence_note = string_field(&payload, "low_confidence_note");
    card.verified_sources = verified_sources(&payload, id);
    card.confidence_score = confidence_score(payload.get("confidence_score"));
    card.draft_payload = draft_payload(payload.get("draft_payload"));

    // Discrete columns win over the payload copy.
    card.humanized_draft = record
        .text_value(COL_HUMANIZED_DRAFT)
        .or_else(|| string_field(&payload, "humanized_draft"));
    card.original_sender_email = record
        .text_value(COL_SENDER_EMAIL)
        .or_else(|| string_field(&payload, "original_sender_email"));
    card.original_sender_display = record
        .text_value(COL_SENDER_DISPLAY)
        .or_else(|| string_field(&payload, "original_sender_display"));
    card.original_subject = record
        .text_value(COL_SUBJECT)
        .or_else(|| string_field(&payload, "original_subject"));
    card.conversation_cluster_id = record
        .text_value(COL_CLUSTER_ID)
        .or_else(|| string_field(&payload, "conversation_cluster_id"));
    card.source_signal_id = record
        .text_value(COL_SOURCE_SIGNAL_ID)
        .or_else(|| string_field(&payload, "source_signal_id"));

    card.created_on = record
        .get_formatted_value(COL_CREATED_ON)
        .unwrap_or_default()
        .to_string();
    card.card_outcome = CardOutcome::parse_or_pending(record.get_formatted_value(COL_OUTCOME));

    Ok(card)
}

// -----------------------------------------------------------------
// Field helpers
// -----------------------------------------------------------------

fn string_field(payload: &Map<String, Value>, key: &str) -> Option<String> {
    match payload.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Parse an enumeration field. Absent, null and `"N/A"` are `None` silently;
/// any other unrecognized value is `None` with a warning.
fn enum_field<T>(
    payload: &Map<String, Value>,
    key: &str,
    record_id: &str,
    parse: fn(&str) -> Option<T>,
) -> Option<T> {
    let value = payload.get(key)?;
    let text = match value {
        Value::Null => return None,
        Value::String(s) if s.is_empty() || s == NOT_APPLICABLE => return None,
        Value::String(s) => s.as_str(),
        other => {
            warn!(record_id, field = key, value = %other, "Non-string enumeration value, using default");
            return None;
        }
    };
    let parsed = parse(text);
    if parsed.is_none() {
        warn!(record_id, field = key, value = text, "Unrecognized enumeration value, using default");
    }
    parsed
}

/// Accept only numeric scores within 0..=100.
fn confidence_score(value: Option<&Value>) -> Option<u8> {
    let score = value?.as_f64()?;
    if !(0.0..=100.0).contains(&score) {
        return None;
    }
    Some(score.round() as u8)
}

/// Keep well-formed sources; a non-array field means no sources at all.
fn verified_sources(payload: &Map<String, Value>, record_id: &str) -> Option<Vec<VerifiedSource>> {
    let Some(Value::Array(items)) = payload.get("verified_sources") else {
        return None;
    };
    let sources: Vec<VerifiedSource> = items
        .iter()
        .filter_map(|item| match serde_json::from_value(item.clone()) {
            Ok(source) => Some(source),
            Err(e) => {
                debug!(record_id, error = %e, "Dropping malformed verified source");
                None
            }
        })
        .collect();
    Some(sources)
}

fn draft_payload(value: Option<&Value>) -> Option<DraftPayload> {
    match value? {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(DraftPayload::Text(s.clone())),
        Value::Object(obj) => match draft_object(obj) {
            Some(draft) => Some(DraftPayload::Structured(draft)),
            None => Some(DraftPayload::Opaque(Value::Object(obj.clone()))),
        },
        _ => None,
    }
}

/// An object with a string `raw_draft` is a structured draft. Its other
/// fields are read leniently so one odd value doesn't demote the whole draft.
fn draft_object(obj: &Map<String, Value>) -> Option<DraftObject> {
    let raw_draft = match obj.get("raw_draft") {
        Some(Value::String(s)) => s.clone(),
        _ => return None,
    };
    let text = |key: &str| obj.get(key).and_then(Value::as_str);

    Some(DraftObject {
        draft_type: text("draft_type").and_then(DraftType::parse),
        raw_draft,
        research_summary: text("research_summary").map(str::to_string),
        recipient_relationship: text("recipient_relationship")
            .and_then(RecipientRelationship::parse),
        inferred_tone: text("inferred_tone").and_then(InferredTone::parse),
        confidence_score: obj.get("confidence_score").and_then(Value::as_f64),
        user_context: text("user_context").map(str::to_string),
    })
}
