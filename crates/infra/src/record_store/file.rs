use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tempfile::NamedTempFile;

use catalog_core::{ExpectedVersion, RecordId};

use super::r#trait::{RecordStore, StoreError, StoredRecord};

/// Directory-backed record store: one JSON document per record.
///
/// Every write goes to a temp file in the same directory and is then renamed
/// into place, so a crash mid-write leaves the previous version intact.
/// Writers to one record are serialized by an advisory lock on a sibling
/// `<record>.lock` file, which holds across processes and across separate
/// handles opened on the same directory.
#[derive(Debug)]
pub struct FileRecordStore {
    dir: PathBuf,
}

impl FileRecordStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, record_id: RecordId) -> PathBuf {
        self.dir.join(format!("{record_id}.json"))
    }

    fn lock_path_for(&self, record_id: RecordId) -> PathBuf {
        self.dir.join(format!("{record_id}.lock"))
    }

    /// Block until this handle holds the record's write lock.
    ///
    /// The lock is released when the returned file is dropped.
    fn lock(&self, record_id: RecordId) -> Result<File, StoreError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.lock_path_for(record_id))?;
        file.lock_exclusive()?;
        Ok(file)
    }

    fn stage(&self, record: &StoredRecord) -> Result<NamedTempFile, StoreError> {
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        serde_json::to_writer_pretty(tmp.as_file_mut(), record)?;
        tmp.as_file_mut().write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        Ok(tmp)
    }

    fn read(&self, record_id: RecordId) -> Result<Option<StoredRecord>, StoreError> {
        let bytes = match fs::read(self.path_for(record_id)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let record: StoredRecord = serde_json::from_slice(&bytes)?;
        if record.record_id != record_id {
            return Err(StoreError::Misplaced {
                record_id,
                found: record.record_id,
            });
        }
        Ok(Some(record))
    }
}

impl RecordStore for FileRecordStore {
    fn create(&self, record: StoredRecord) -> Result<(), StoreError> {
        let _lock = self.lock(record.record_id)?;
        let tmp = self.stage(&record)?;

        // No-clobber persist: fails if another writer claimed the slot first.
        tmp.persist_noclobber(self.path_for(record.record_id))
            .map_err(|e| match e.error.kind() {
                ErrorKind::AlreadyExists => StoreError::AlreadyExists(record.record_id),
                _ => StoreError::Io(e.error),
            })?;
        Ok(())
    }

    fn load(&self, record_id: RecordId) -> Result<Option<StoredRecord>, StoreError> {
        self.read(record_id)
    }

    fn commit(
        &self,
        record: StoredRecord,
        expected_version: ExpectedVersion,
    ) -> Result<(), StoreError> {
        // Held from the version read through the rename.
        let _lock = self.lock(record.record_id)?;
        let current = self
            .read(record.record_id)?
            .ok_or(StoreError::NotFound(record.record_id))?;
        expected_version.check(current.version)?;

        let tmp = self.stage(&record)?;
        tmp.persist(self.path_for(record.record_id))
            .map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }
}
