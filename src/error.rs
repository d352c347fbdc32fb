use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::branch::{AccountNumber, BranchId};

/// Every way a ledger operation can fail.
///
/// All variants are terminal for the current operation. Callers are expected to surface the
/// message as is; there is no mapping onto transport specific status codes.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Account/branch not found: branch {branch}, account {account_number}")]
    NotFound {
        branch: BranchId,
        account_number: AccountNumber,
    },

    #[error("Invalid value: {0}")]
    InvalidAmount(String),

    #[error(
        "No available balance for this withdraw: requested {requested} (fee included), available {available}"
    )]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },

    #[error("Destination account not found: {0}")]
    DestinationNotFound(AccountNumber),

    #[error("Source account not found: {0}")]
    SourceNotFound(AccountNumber),

    #[error("Account store failure: {0:#}")]
    Store(#[from] anyhow::Error),
}
