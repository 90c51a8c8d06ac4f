//! `catalog-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no storage concerns).

pub mod aggregate;
pub mod error;
pub mod id;
pub mod price;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot, ExpectedVersion, VersionConflict};
pub use error::{CatalogError, CatalogResult};
pub use id::{AccountId, InvalidId, RecordId};
pub use price::{PRICE_SCALE_DIGITS, Price, PriceError};
pub use value_object::ValueObject;
