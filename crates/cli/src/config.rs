//! Runtime configuration, resolved from flags and environment.

use std::path::PathBuf;

use thiserror::Error;

use catalog_core::{AccountId, RecordId};

pub const DEFAULT_DATA_DIR: &str = ".catalog";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no caller identity given (use --caller or CATALOG_CALLER)")]
    MissingCaller,

    #[error("no catalog record given (use --record or CATALOG_RECORD)")]
    MissingRecord,
}

/// Settings shared by every subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub caller: Option<AccountId>,
    pub record: Option<RecordId>,
}

impl Config {
    pub fn new(
        data_dir: Option<PathBuf>,
        caller: Option<AccountId>,
        record: Option<RecordId>,
    ) -> Self {
        Self {
            data_dir: data_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            caller,
            record,
        }
    }

    pub fn require_caller(&self) -> Result<AccountId, ConfigError> {
        self.caller.ok_or(ConfigError::MissingCaller)
    }

    pub fn require_record(&self) -> Result<RecordId, ConfigError> {
        self.record.ok_or(ConfigError::MissingRecord)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_defaults_when_unset() {
        let config = Config::new(None, None, None);
        assert_eq!(config.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(config.require_caller(), Err(ConfigError::MissingCaller));
        assert_eq!(config.require_record(), Err(ConfigError::MissingRecord));
    }

    #[test]
    fn explicit_values_win() {
        let caller = AccountId::new();
        let record = RecordId::new();
        let config = Config::new(Some("/tmp/x".into()), Some(caller), Some(record));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/x"));
        assert_eq!(config.require_caller(), Ok(caller));
        assert_eq!(config.require_record(), Ok(record));
    }
}
