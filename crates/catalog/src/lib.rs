//! Product catalog domain module.
//!
//! Business rules for the shared catalog record, implemented purely as
//! deterministic domain logic (no IO, no storage, no signature checks).

pub mod authorize;
pub mod database;

pub use authorize::Caller;
pub use database::{
    AddProduct, ApproveProduct, CatalogCommand, CatalogEvent, Database, DatabaseInitialized,
    Product, ProductAdded, ProductRemoved, ProposalApproved, ProposalRejected, ProposalSubmitted,
    ProposeProduct, RejectProduct, RemoveProduct, Setup,
};
