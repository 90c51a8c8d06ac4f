use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use catalog_core::RecordId;

/// Envelope for a committed event, containing record metadata.
///
/// Returned to the caller of an operation so the client layer can render what
/// changed. Envelopes are not retained after the operation returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    record_id: RecordId,
    event_type: String,

    /// Record version after this event was applied.
    record_version: u64,

    committed_at: DateTime<Utc>,

    payload: E,
}

impl<E> EventEnvelope<E> {
    pub fn new(
        record_id: RecordId,
        event_type: impl Into<String>,
        record_version: u64,
        committed_at: DateTime<Utc>,
        payload: E,
    ) -> Self {
        Self {
            record_id,
            event_type: event_type.into(),
            record_version,
            committed_at,
            payload,
        }
    }

    pub fn record_id(&self) -> RecordId {
        self.record_id
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn record_version(&self) -> u64 {
        self.record_version
    }

    pub fn committed_at(&self) -> DateTime<Utc> {
        self.committed_at
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}
