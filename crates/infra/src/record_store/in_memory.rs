use std::collections::HashMap;
use std::sync::RwLock;

use catalog_core::{ExpectedVersion, RecordId};

use super::r#trait::{RecordStore, StoreError, StoredRecord};

/// In-memory record store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: RwLock<HashMap<RecordId, StoredRecord>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for InMemoryRecordStore {
    fn create(&self, record: StoredRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().map_err(|_| StoreError::LockPoisoned)?;
        if records.contains_key(&record.record_id) {
            return Err(StoreError::AlreadyExists(record.record_id));
        }
        records.insert(record.record_id, record);
        Ok(())
    }

    fn load(&self, record_id: RecordId) -> Result<Option<StoredRecord>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(records.get(&record_id).cloned())
    }

    fn commit(
        &self,
        record: StoredRecord,
        expected_version: ExpectedVersion,
    ) -> Result<(), StoreError> {
        // Check and replace under one write lock so commits to a record serialize.
        let mut records = self.records.write().map_err(|_| StoreError::LockPoisoned)?;
        let current = records
            .get_mut(&record.record_id)
            .ok_or(StoreError::NotFound(record.record_id))?;

        expected_version.check(current.version)?;
        *current = record;
        Ok(())
    }
}
