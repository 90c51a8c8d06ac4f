//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one. `Price` is the catalog's main example: two prices with the
/// same micro-unit count are the same price.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
