//! Catalog record codec.
//!
//! Maps a `Database` to and from the JSON payload stored in a `StoredRecord`.
//! Field order is fixed and prices travel as integer micro-units, so a
//! save/load cycle reproduces the record exactly.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

use catalog_core::{AccountId, AggregateRoot, Price, RecordId};
use catalog_products::{Database, Product};

use crate::record_store::StoredRecord;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("record payload is malformed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("record payload is corrupt: {0}")]
    Corrupt(String),
}

/// Persisted layout of a catalog record.
#[derive(Debug, Serialize, Deserialize)]
struct DatabaseLayout {
    admin: Option<AccountId>,
    products: Vec<Product>,
    pending_products: Vec<Product>,
    average_price: Price,
    version: u64,
}

pub fn encode(db: &Database) -> Result<StoredRecord, CodecError> {
    let layout = DatabaseLayout {
        admin: db.admin(),
        products: db.products().to_vec(),
        pending_products: db.pending_products().to_vec(),
        average_price: db.average_price(),
        version: db.version(),
    };

    Ok(StoredRecord {
        record_id: db.id_typed(),
        version: db.version(),
        payload: serde_json::to_value(layout)?,
    })
}

/// Decode a stored record, re-validating what the codec can check.
///
/// Rejects payloads whose product names collide, whose stored average
/// disagrees with the products, or whose inner version differs from the
/// store's.
pub fn decode(record: StoredRecord) -> Result<Database, CodecError> {
    decode_payload(record.record_id, record.version, record.payload)
}

fn decode_payload(
    record_id: RecordId,
    version: u64,
    payload: JsonValue,
) -> Result<Database, CodecError> {
    let layout: DatabaseLayout = serde_json::from_value(payload)?;

    if layout.version != version {
        return Err(CodecError::Corrupt(format!(
            "payload version {} does not match stored version {version}",
            layout.version
        )));
    }

    let db = Database::restore(
        record_id,
        layout.admin,
        layout.products,
        layout.pending_products,
        layout.version,
    )
    .map_err(|e| CodecError::Corrupt(e.to_string()))?;

    if db.average_price() != layout.average_price {
        return Err(CodecError::Corrupt(format!(
            "stored average {} does not match product prices (expected {})",
            layout.average_price,
            db.average_price()
        )));
    }

    Ok(db)
}
