use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

use catalog_core::{ExpectedVersion, RecordId, VersionConflict};
use std::sync::Arc;

/// One persisted catalog record.
///
/// `version` is authoritative for optimistic concurrency; `payload` is the
/// codec's encoding of the record state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub record_id: RecordId,
    pub version: u64,
    pub payload: JsonValue,
}

/// Record store operation error.
///
/// These are **infrastructure errors** (storage, concurrency) as opposed to
/// catalog rejections.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record {0} already exists")]
    AlreadyExists(RecordId),

    #[error("record {0} not found")]
    NotFound(RecordId),

    #[error(transparent)]
    Concurrency(#[from] VersionConflict),

    #[error("record {record_id} is stored under a mismatched id {found}")]
    Misplaced { record_id: RecordId, found: RecordId },

    #[error("storage io failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored record is not valid json: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("lock poisoned")]
    LockPoisoned,
}

/// Versioned, handle-addressed storage for catalog records.
///
/// ## Semantics
///
/// - `create` claims a fresh slot. A taken slot fails with `AlreadyExists`.
/// - `load` returns `None` for a slot that was never created.
/// - `commit` replaces the record wholesale if the stored version matches
///   `expected_version`, else fails with `Concurrency`. A commit either lands
///   completely or not at all.
///
/// Implementations serialize commits per record; that is the only concurrency
/// control the catalog relies on.
pub trait RecordStore: Send + Sync {
    fn create(&self, record: StoredRecord) -> Result<(), StoreError>;

    fn load(&self, record_id: RecordId) -> Result<Option<StoredRecord>, StoreError>;

    fn commit(
        &self,
        record: StoredRecord,
        expected_version: ExpectedVersion,
    ) -> Result<(), StoreError>;
}

impl<S> RecordStore for Arc<S>
where
    S: RecordStore + ?Sized,
{
    fn create(&self, record: StoredRecord) -> Result<(), StoreError> {
        (**self).create(record)
    }

    fn load(&self, record_id: RecordId) -> Result<Option<StoredRecord>, StoreError> {
        (**self).load(record_id)
    }

    fn commit(
        &self,
        record: StoredRecord,
        expected_version: ExpectedVersion,
    ) -> Result<(), StoreError> {
        (**self).commit(record, expected_version)
    }
}
