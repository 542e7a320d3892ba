use std::io;
use std::result::Result as StdResult;

use thiserror::Error;
use uuid::Uuid;

/// Unified error type for domain, service, and storage layers.
#[derive(Error, Debug)]
pub enum FinanceError {
    #[error("Transaction not found: {0}")]
    TransactionNotFound(Uuid),
    #[error("Investment not found: {0}")]
    InvestmentNotFound(Uuid),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Import failed: {0}")]
    Import(String),
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = StdResult<T, FinanceError>;

impl From<io::Error> for FinanceError {
    fn from(err: io::Error) -> Self {
        FinanceError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for FinanceError {
    fn from(err: serde_json::Error) -> Self {
        FinanceError::Storage(err.to_string())
    }
}
