//! Command-line client for a shared product catalog.
//!
//! Treats `--caller` as an already-authenticated identity: signature
//! verification happens in front of this tool, not inside it.

pub mod config;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::{Value as JsonValue, json};

use catalog_core::{AccountId, AggregateRoot, Price, RecordId};
use catalog_infra::{CatalogDispatcher, FileRecordStore};
use catalog_observability::LogFormat;
use catalog_products::{
    AddProduct, ApproveProduct, Caller, CatalogCommand, Database, Product, ProposeProduct,
    RejectProduct, RemoveProduct,
};

pub use config::{Config, ConfigError};

#[derive(Parser, Debug)]
#[command(author, version, about = "Shared product catalog client", long_about = None)]
pub struct Cli {
    /// Directory holding catalog records
    #[arg(long, global = true, env = "CATALOG_DATA_DIR", value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Authenticated identity issuing the operation
    #[arg(long, global = true, env = "CATALOG_CALLER", value_name = "ACCOUNT")]
    caller: Option<AccountId>,

    /// Handle of the catalog record to operate on
    #[arg(long, global = true, env = "CATALOG_RECORD", value_name = "RECORD")]
    record: Option<RecordId>,

    /// Log output format (json, pretty, compact)
    #[arg(
        long,
        global = true,
        env = "CATALOG_LOG_FORMAT",
        value_name = "FORMAT",
        default_value = "json"
    )]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create a catalog record; the caller becomes its admin
    Setup,
    /// Print the current record
    Show,
    #[command(flatten)]
    Operation(Operation),
}

/// Subcommands that mutate an existing record.
#[derive(Subcommand, Debug, Clone)]
pub enum Operation {
    /// Add a product directly (admin only)
    Add {
        name: String,
        description: String,
        price: Price,
    },
    /// Remove an active product by name (admin only)
    Remove { name: String },
    /// Propose a product for admin review (anyone)
    Propose {
        name: String,
        description: String,
        price: Price,
    },
    /// Approve the pending proposal at INDEX (admin only)
    Approve { index: usize },
    /// Reject the pending proposal at INDEX (admin only)
    Reject { index: usize },
}

/// Execute one CLI invocation and return the rendered record.
pub fn run(cli: Cli) -> anyhow::Result<String> {
    let config = Config::new(cli.data_dir, cli.caller, cli.record);
    let store = FileRecordStore::open(&config.data_dir)
        .with_context(|| format!("opening data directory {}", config.data_dir.display()))?;
    let dispatcher = CatalogDispatcher::new(store);
    tracing::debug!(data_dir = %config.data_dir.display(), "record store opened");

    let state = match cli.command {
        Command::Setup => {
            // A fresh handle and identity are minted when none are supplied.
            let record = config.record.unwrap_or_default();
            let caller = Caller::authenticated(config.caller.unwrap_or_default());
            dispatcher.setup(record, caller)?.state
        }
        Command::Show => dispatcher.fetch(config.require_record()?)?,
        Command::Operation(op) => {
            let record = config.require_record()?;
            let caller = Caller::authenticated(config.require_caller()?);
            dispatcher.dispatch(record, to_command(op, caller))?.state
        }
    };

    Ok(serde_json::to_string_pretty(&render(&state))?)
}

fn to_command(op: Operation, caller: Caller) -> CatalogCommand {
    match op {
        Operation::Add {
            name,
            description,
            price,
        } => CatalogCommand::AddProduct(AddProduct {
            caller,
            name,
            description,
            price,
        }),
        Operation::Remove { name } => CatalogCommand::RemoveProduct(RemoveProduct { caller, name }),
        Operation::Propose {
            name,
            description,
            price,
        } => CatalogCommand::ProposeProduct(ProposeProduct {
            caller,
            name,
            description,
            price,
        }),
        Operation::Approve { index } => {
            CatalogCommand::ApproveProduct(ApproveProduct { caller, index })
        }
        Operation::Reject { index } => {
            CatalogCommand::RejectProduct(RejectProduct { caller, index })
        }
    }
}

fn render_product(product: &Product) -> JsonValue {
    json!({
        "name": product.name,
        "description": product.description,
        "price": product.price.to_string(),
    })
}

/// Client-facing view: prices as decimal strings.
pub fn render(db: &Database) -> JsonValue {
    json!({
        "record": db.id_typed().to_string(),
        "admin": db.admin().map(|a| a.to_string()),
        "products": db.products().iter().map(render_product).collect::<Vec<_>>(),
        "pending_products": db.pending_products().iter().map(render_product).collect::<Vec<_>>(),
        "average_price": db.average_price().to_string(),
        "version": db.version(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_subcommands_and_globals() {
        let record = RecordId::new();
        let cli = Cli::try_parse_from([
            "catalog",
            "add",
            "P1",
            "D1",
            "2.32",
            "--record",
            &record.to_string(),
            "--log-format",
            "compact",
        ])
        .unwrap();

        assert_eq!(cli.record, Some(record));
        assert_eq!(cli.log_format(), LogFormat::Compact);
        match cli.command {
            Command::Operation(Operation::Add { name, price, .. }) => {
                assert_eq!(name, "P1");
                assert_eq!(price, "2.32".parse().unwrap());
            }
            other => panic!("Expected Add, got {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_price() {
        let err = Cli::try_parse_from(["catalog", "add", "P1", "D1", "abc"]).unwrap_err();
        assert!(err.to_string().contains("price is not a decimal number"));
    }

    #[test]
    fn render_uses_decimal_prices() {
        let mut db = Database::empty(RecordId::new());
        let admin = Caller::authenticated(AccountId::new());
        use catalog_core::Aggregate;
        db.execute(&CatalogCommand::Setup(catalog_products::Setup { caller: admin }))
            .unwrap();
        db.execute(&to_command(
            Operation::Add {
                name: "P1".into(),
                description: "D1".into(),
                price: "2.32".parse().unwrap(),
            },
            admin,
        ))
        .unwrap();

        let view = render(&db);
        assert_eq!(view["products"][0]["price"], "2.32");
        assert_eq!(view["average_price"], "2.32");
        assert_eq!(view["version"], 2);
    }
}
