//! Record store boundary.
//!
//! Infrastructure-facing abstraction for locating, loading, and committing
//! versioned catalog records by handle, without making storage assumptions.

pub mod file;
pub mod in_memory;
pub mod r#trait;

pub use file::FileRecordStore;
pub use in_memory::InMemoryRecordStore;
pub use r#trait::{RecordStore, StoreError, StoredRecord};
