//! Host layer: record storage, codec, and the command dispatcher that
//! runs catalog operations transactionally against stored records.

pub mod codec;
pub mod command_dispatcher;
pub mod record_store;

pub use codec::CodecError;
pub use command_dispatcher::{CatalogDispatcher, DispatchError, Dispatched};
pub use record_store::{FileRecordStore, InMemoryRecordStore, RecordStore, StoreError, StoredRecord};
