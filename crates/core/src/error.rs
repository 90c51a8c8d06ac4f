//! Catalog error model.

use thiserror::Error;

/// Result type used across the catalog domain layer.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog operation rejection.
///
/// Every variant is a deterministic, definitional rejection. Retrying the same
/// operation against the same state yields the same error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Caller is not the admin fixed at setup.
    #[error("Only the catalog admin may perform this operation")]
    Unauthorized,

    /// An active product already uses this name.
    #[error("A product with the same name already exists")]
    DuplicateProduct { name: String },

    /// No active product has this name.
    #[error("No such product found to remove")]
    ProductNotFound { name: String },

    /// Index is not a valid position in the pending list.
    #[error("Pending product index out of range (index: {index}, pending: {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// `Setup` ran against a record that was already set up.
    #[error("The catalog has already been set up")]
    AlreadyInitialized,

    /// Any other operation ran against a record that was never set up.
    #[error("The catalog has not been set up")]
    NotInitialized,
}

impl CatalogError {
    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::DuplicateProduct { name: name.into() }
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        Self::ProductNotFound { name: name.into() }
    }

    /// Stable machine-readable kind, for transports that surface error codes.
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogError::Unauthorized => "Unauthorized",
            CatalogError::DuplicateProduct { .. } => "DuplicateProduct",
            CatalogError::ProductNotFound { .. } => "ProductNotFound",
            CatalogError::IndexOutOfRange { .. } => "IndexOutOfRange",
            CatalogError::AlreadyInitialized => "AlreadyInitialized",
            CatalogError::NotInitialized => "NotInitialized",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_client_facing_text() {
        assert_eq!(
            CatalogError::duplicate("P1").to_string(),
            "A product with the same name already exists"
        );
        assert_eq!(
            CatalogError::not_found("ghost").to_string(),
            "No such product found to remove"
        );
    }

    #[test]
    fn kind_is_stable() {
        assert_eq!(CatalogError::Unauthorized.kind(), "Unauthorized");
        assert_eq!(
            CatalogError::IndexOutOfRange { index: 2, len: 1 }.kind(),
            "IndexOutOfRange"
        );
    }
}
