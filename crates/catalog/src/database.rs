use serde::{Deserialize, Serialize};

use catalog_core::{AccountId, Aggregate, AggregateRoot, CatalogError, Price, RecordId, ValueObject};
use catalog_events::Event;

use crate::authorize::{Caller, require_admin};

/// A catalog entry. Replaced wholesale, never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub description: String,
    pub price: Price,
}

impl ValueObject for Product {}

impl Product {
    pub fn new(name: impl Into<String>, description: impl Into<String>, price: Price) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            price,
        }
    }
}

/// Aggregate root: the catalog record.
///
/// Invariants held after every applied event:
/// - no two entries of `products` share a name
/// - `average_price` is the mean of `products[*].price`, or zero when empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Database {
    id: RecordId,
    admin: Option<AccountId>,
    products: Vec<Product>,
    pending_products: Vec<Product>,
    average_price: Price,
    version: u64,
}

impl Database {
    /// A freshly allocated, not-yet-set-up record.
    pub fn empty(id: RecordId) -> Self {
        Self {
            id,
            admin: None,
            products: Vec::new(),
            pending_products: Vec::new(),
            average_price: Price::ZERO,
            version: 0,
        }
    }

    /// Rebuild a record from persisted parts.
    ///
    /// The average is recomputed rather than trusted. Fails if the stored
    /// products violate name uniqueness.
    pub fn restore(
        id: RecordId,
        admin: Option<AccountId>,
        products: Vec<Product>,
        pending_products: Vec<Product>,
        version: u64,
    ) -> Result<Self, CatalogError> {
        for (pos, product) in products.iter().enumerate() {
            if products[..pos].iter().any(|p| p.name == product.name) {
                return Err(CatalogError::duplicate(product.name.clone()));
            }
        }

        let average_price = Price::mean(products.iter().map(|p| p.price));
        Ok(Self {
            id,
            admin,
            products,
            pending_products,
            average_price,
            version,
        })
    }

    pub fn id_typed(&self) -> RecordId {
        self.id
    }

    pub fn admin(&self) -> Option<AccountId> {
        self.admin
    }

    pub fn is_initialized(&self) -> bool {
        self.admin.is_some()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn pending_products(&self) -> &[Product] {
        &self.pending_products
    }

    pub fn average_price(&self) -> Price {
        self.average_price
    }

    pub fn find_product(&self, name: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.name == name)
    }

    fn recompute_average(&mut self) {
        self.average_price = Price::mean(self.products.iter().map(|p| p.price));
    }
}

impl AggregateRoot for Database {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: Setup. The caller becomes the admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setup {
    pub caller: Caller,
}

/// Command: AddProduct (admin only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddProduct {
    pub caller: Caller,
    pub name: String,
    pub description: String,
    pub price: Price,
}

/// Command: RemoveProduct (admin only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveProduct {
    pub caller: Caller,
    pub name: String,
}

/// Command: ProposeProduct (open to any caller).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposeProduct {
    pub caller: Caller,
    pub name: String,
    pub description: String,
    pub price: Price,
}

/// Command: ApproveProduct (admin only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproveProduct {
    pub caller: Caller,
    pub index: usize,
}

/// Command: RejectProduct (admin only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectProduct {
    pub caller: Caller,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogCommand {
    Setup(Setup),
    AddProduct(AddProduct),
    RemoveProduct(RemoveProduct),
    ProposeProduct(ProposeProduct),
    ApproveProduct(ApproveProduct),
    RejectProduct(RejectProduct),
}

impl CatalogCommand {
    /// The identity that issued this command.
    pub fn caller(&self) -> Caller {
        match self {
            CatalogCommand::Setup(c) => c.caller,
            CatalogCommand::AddProduct(c) => c.caller,
            CatalogCommand::RemoveProduct(c) => c.caller,
            CatalogCommand::ProposeProduct(c) => c.caller,
            CatalogCommand::ApproveProduct(c) => c.caller,
            CatalogCommand::RejectProduct(c) => c.caller,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CatalogCommand::Setup(_) => "setup",
            CatalogCommand::AddProduct(_) => "add_product",
            CatalogCommand::RemoveProduct(_) => "remove_product",
            CatalogCommand::ProposeProduct(_) => "propose_product",
            CatalogCommand::ApproveProduct(_) => "approve_product",
            CatalogCommand::RejectProduct(_) => "reject_product",
        }
    }
}

/// Event: DatabaseInitialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseInitialized {
    pub admin: AccountId,
}

/// Event: ProductAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAdded {
    pub product: Product,
}

/// Event: ProductRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRemoved {
    pub position: usize,
    pub product: Product,
}

/// Event: ProposalSubmitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalSubmitted {
    pub proposer: AccountId,
    pub product: Product,
}

/// Event: ProposalApproved. Moves the proposal at `index` into the active list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalApproved {
    pub index: usize,
    pub product: Product,
}

/// Event: ProposalRejected. Discards the proposal at `index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalRejected {
    pub index: usize,
    pub product: Product,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogEvent {
    DatabaseInitialized(DatabaseInitialized),
    ProductAdded(ProductAdded),
    ProductRemoved(ProductRemoved),
    ProposalSubmitted(ProposalSubmitted),
    ProposalApproved(ProposalApproved),
    ProposalRejected(ProposalRejected),
}

impl Event for CatalogEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CatalogEvent::DatabaseInitialized(_) => "catalog.database.initialized",
            CatalogEvent::ProductAdded(_) => "catalog.product.added",
            CatalogEvent::ProductRemoved(_) => "catalog.product.removed",
            CatalogEvent::ProposalSubmitted(_) => "catalog.proposal.submitted",
            CatalogEvent::ProposalApproved(_) => "catalog.proposal.approved",
            CatalogEvent::ProposalRejected(_) => "catalog.proposal.rejected",
        }
    }

    fn version(&self) -> u32 {
        1
    }
}

impl Aggregate for Database {
    type Command = CatalogCommand;
    type Event = CatalogEvent;
    type Error = CatalogError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            CatalogEvent::DatabaseInitialized(e) => {
                self.admin = Some(e.admin);
                self.products.clear();
                self.pending_products.clear();
                self.average_price = Price::ZERO;
            }
            CatalogEvent::ProductAdded(e) => {
                self.products.push(e.product.clone());
                self.recompute_average();
            }
            CatalogEvent::ProductRemoved(e) => {
                self.products.remove(e.position);
                self.recompute_average();
            }
            CatalogEvent::ProposalSubmitted(e) => {
                self.pending_products.push(e.product.clone());
            }
            CatalogEvent::ProposalApproved(e) => {
                // Shift-remove: later proposals move down one slot.
                let product = self.pending_products.remove(e.index);
                self.products.push(product);
                self.recompute_average();
            }
            CatalogEvent::ProposalRejected(e) => {
                self.pending_products.remove(e.index);
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            CatalogCommand::Setup(cmd) => self.handle_setup(cmd),
            CatalogCommand::AddProduct(cmd) => self.handle_add(cmd),
            CatalogCommand::RemoveProduct(cmd) => self.handle_remove(cmd),
            CatalogCommand::ProposeProduct(cmd) => self.handle_propose(cmd),
            CatalogCommand::ApproveProduct(cmd) => self.handle_approve(cmd),
            CatalogCommand::RejectProduct(cmd) => self.handle_reject(cmd),
        }
    }
}

impl Database {
    fn ensure_initialized(&self) -> Result<AccountId, CatalogError> {
        self.admin.ok_or(CatalogError::NotInitialized)
    }

    /// Initialization first, then the admin check, so an outsider learns
    /// nothing about which names or indices exist.
    fn ensure_admin(&self, caller: Caller) -> Result<(), CatalogError> {
        let admin = self.ensure_initialized()?;
        require_admin(caller, admin)
    }

    fn ensure_unique(&self, name: &str) -> Result<(), CatalogError> {
        if self.find_product(name).is_some() {
            return Err(CatalogError::duplicate(name));
        }
        Ok(())
    }

    fn pending_at(&self, index: usize) -> Result<&Product, CatalogError> {
        self.pending_products
            .get(index)
            .ok_or(CatalogError::IndexOutOfRange {
                index,
                len: self.pending_products.len(),
            })
    }

    fn handle_setup(&self, cmd: &Setup) -> Result<Vec<CatalogEvent>, CatalogError> {
        if self.is_initialized() {
            return Err(CatalogError::AlreadyInitialized);
        }

        Ok(vec![CatalogEvent::DatabaseInitialized(DatabaseInitialized {
            admin: cmd.caller.account(),
        })])
    }

    fn handle_add(&self, cmd: &AddProduct) -> Result<Vec<CatalogEvent>, CatalogError> {
        self.ensure_admin(cmd.caller)?;
        // Pending proposals do not reserve names.
        self.ensure_unique(&cmd.name)?;

        Ok(vec![CatalogEvent::ProductAdded(ProductAdded {
            product: Product::new(cmd.name.clone(), cmd.description.clone(), cmd.price),
        })])
    }

    fn handle_remove(&self, cmd: &RemoveProduct) -> Result<Vec<CatalogEvent>, CatalogError> {
        self.ensure_admin(cmd.caller)?;

        let position = self
            .products
            .iter()
            .position(|p| p.name == cmd.name)
            .ok_or_else(|| CatalogError::not_found(cmd.name.clone()))?;

        Ok(vec![CatalogEvent::ProductRemoved(ProductRemoved {
            position,
            product: self.products[position].clone(),
        })])
    }

    fn handle_propose(&self, cmd: &ProposeProduct) -> Result<Vec<CatalogEvent>, CatalogError> {
        self.ensure_initialized()?;

        Ok(vec![CatalogEvent::ProposalSubmitted(ProposalSubmitted {
            proposer: cmd.caller.account(),
            product: Product::new(cmd.name.clone(), cmd.description.clone(), cmd.price),
        })])
    }

    fn handle_approve(&self, cmd: &ApproveProduct) -> Result<Vec<CatalogEvent>, CatalogError> {
        self.ensure_admin(cmd.caller)?;
        let proposal = self.pending_at(cmd.index)?;
        // A clash rejects the whole approval; the proposal stays pending.
        self.ensure_unique(&proposal.name)?;

        Ok(vec![CatalogEvent::ProposalApproved(ProposalApproved {
            index: cmd.index,
            product: proposal.clone(),
        })])
    }

    fn handle_reject(&self, cmd: &RejectProduct) -> Result<Vec<CatalogEvent>, CatalogError> {
        self.ensure_admin(cmd.caller)?;
        let proposal = self.pending_at(cmd.index)?;

        Ok(vec![CatalogEvent::ProposalRejected(ProposalRejected {
            index: cmd.index,
            product: proposal.clone(),
        })])
    }
}
