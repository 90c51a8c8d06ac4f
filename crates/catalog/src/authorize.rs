//! Caller identity and the admin check.

use serde::{Deserialize, Serialize};

use catalog_core::{AccountId, CatalogError};

/// An already-authenticated caller.
///
/// The transport builds this after it has verified the operation's required
/// signature. Nothing in this crate checks signatures; holding a `Caller` is
/// the proof.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Caller(AccountId);

impl Caller {
    pub fn authenticated(account: AccountId) -> Self {
        Self(account)
    }

    pub fn account(&self) -> AccountId {
        self.0
    }
}

/// Authorize a privileged operation.
///
/// - No IO
/// - No panics
/// - Pure equality against the stored admin
pub fn require_admin(caller: Caller, admin: AccountId) -> Result<(), CatalogError> {
    if caller.0 == admin {
        Ok(())
    } else {
        Err(CatalogError::Unauthorized)
    }
}
