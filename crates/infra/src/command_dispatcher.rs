//! Command execution pipeline for catalog records.
//!
//! ```text
//! Command
//!   ↓
//! 1. Load the record by handle
//!   ↓
//! 2. Decode into a `Database`
//!   ↓
//! 3. Handle command (pure decision logic, produces events or a rejection)
//!   ↓
//! 4. Apply events to the in-memory copy
//!   ↓
//! 5. Encode and commit with an exact version check
//! ```
//!
//! Nothing is written unless every step up to the commit succeeds, and the
//! commit itself is all-or-nothing, so a rejected or failed operation leaves
//! the stored record untouched.

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use catalog_core::{Aggregate, AggregateRoot, CatalogError, ExpectedVersion, RecordId};
use catalog_events::{Event, EventEnvelope};
use catalog_products::{Caller, CatalogCommand, CatalogEvent, Database, Setup};

use crate::codec::{self, CodecError};
use crate::record_store::{RecordStore, StoreError};

#[derive(Debug, Error)]
pub enum DispatchError {
    /// The catalog rejected the operation (deterministic).
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// No record exists at this handle.
    #[error("catalog record {0} does not exist")]
    RecordNotFound(RecordId),

    /// Someone else committed to the record between load and commit.
    #[error("catalog record changed concurrently: {0}")]
    Concurrency(String),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for DispatchError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Concurrency(conflict) => DispatchError::Concurrency(conflict.to_string()),
            StoreError::NotFound(id) => DispatchError::RecordNotFound(id),
            other => DispatchError::Store(other),
        }
    }
}

/// Outcome of a committed operation.
#[derive(Debug, Clone)]
pub struct Dispatched {
    pub state: Database,
    pub events: Vec<EventEnvelope<CatalogEvent>>,
}

/// Runs catalog commands against records held in a `RecordStore`.
#[derive(Debug)]
pub struct CatalogDispatcher<S> {
    store: S,
}

impl<S> CatalogDispatcher<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

impl<S> CatalogDispatcher<S>
where
    S: RecordStore,
{
    /// Allocate and set up a new record at `record_id`; `caller` becomes admin.
    ///
    /// A taken slot is reported as `CatalogError::AlreadyInitialized`.
    #[instrument(skip_all, fields(record_id = %record_id, caller = %caller.account()), err)]
    pub fn setup(&self, record_id: RecordId, caller: Caller) -> Result<Dispatched, DispatchError> {
        let mut db = Database::empty(record_id);
        let decided = db.execute(&CatalogCommand::Setup(Setup { caller }))?;

        match self.store.create(codec::encode(&db)?) {
            Ok(()) => {}
            Err(StoreError::AlreadyExists(_)) => {
                warn!("setup rejected: record already initialized");
                return Err(CatalogError::AlreadyInitialized.into());
            }
            Err(e) => return Err(e.into()),
        }

        info!(version = db.version(), "catalog record set up");
        Ok(Dispatched {
            events: envelopes(record_id, 0, decided),
            state: db,
        })
    }

    /// Load the current state of a record.
    #[instrument(skip_all, fields(record_id = %record_id), err)]
    pub fn fetch(&self, record_id: RecordId) -> Result<Database, DispatchError> {
        let stored = self
            .store
            .load(record_id)?
            .ok_or(DispatchError::RecordNotFound(record_id))?;
        debug!(version = stored.version, "catalog record loaded");
        Ok(codec::decode(stored)?)
    }

    /// Run one command against the record at `record_id`.
    ///
    /// `Setup` commands are routed to [`CatalogDispatcher::setup`].
    #[instrument(
        skip_all,
        fields(
            record_id = %record_id,
            command = command.name(),
            caller = %command.caller().account(),
        ),
        err
    )]
    pub fn dispatch(
        &self,
        record_id: RecordId,
        command: CatalogCommand,
    ) -> Result<Dispatched, DispatchError> {
        if let CatalogCommand::Setup(Setup { caller }) = command {
            return self.setup(record_id, caller);
        }

        // 1-2) Load + decode
        let mut db = self.fetch(record_id)?;
        let loaded_version = db.version();

        // 3) Decide (no mutation)
        let decided = match db.handle(&command) {
            Ok(events) => events,
            Err(rejection) => {
                warn!(kind = rejection.kind(), "catalog operation rejected");
                return Err(rejection.into());
            }
        };

        // 4) Apply to the in-memory copy
        for event in &decided {
            db.apply(event);
        }

        // 5) Commit against the version we decided on
        self.store
            .commit(codec::encode(&db)?, ExpectedVersion::Exact(loaded_version))?;

        info!(
            version = db.version(),
            products = db.products().len(),
            pending = db.pending_products().len(),
            average_price = %db.average_price(),
            "catalog operation committed"
        );

        Ok(Dispatched {
            events: envelopes(record_id, loaded_version, decided),
            state: db,
        })
    }
}

fn envelopes(
    record_id: RecordId,
    base_version: u64,
    events: Vec<CatalogEvent>,
) -> Vec<EventEnvelope<CatalogEvent>> {
    let committed_at = Utc::now();
    events
        .into_iter()
        .enumerate()
        .map(|(offset, event)| {
            EventEnvelope::new(
                record_id,
                event.event_type(),
                base_version + offset as u64 + 1,
                committed_at,
                event,
            )
        })
        .collect()
}
