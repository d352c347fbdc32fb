//! Configuration of the ledger's business rules

use std::env;
use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::warn;

use crate::models::branch::BranchId;

/// Fees and reserved identifiers applied by the [crate::ledger::AccountLedger]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Flat charge added to every withdrawal
    pub withdrawal_fee: Decimal,
    /// Flat charge debited from the source of a transfer between two branches
    pub inter_branch_fee: Decimal,
    /// Branch that upgraded customers are moved into
    pub private_branch: BranchId,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            withdrawal_fee: Decimal::ONE,
            inter_branch_fee: Decimal::from(8),
            private_branch: BranchId::PRIVATE,
        }
    }
}

impl LedgerConfig {
    /// Create a configuration from `LEDGER_*` environment variables, keeping the default for
    /// every variable that is missing or cannot be parsed
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            withdrawal_fee: var_or(&lookup, "LEDGER_WITHDRAWAL_FEE", defaults.withdrawal_fee),
            inter_branch_fee: var_or(
                &lookup,
                "LEDGER_INTER_BRANCH_FEE",
                defaults.inter_branch_fee,
            ),
            private_branch: BranchId::new(var_or(
                &lookup,
                "LEDGER_PRIVATE_BRANCH",
                defaults.private_branch.into_inner(),
            )),
        }
    }
}

fn var_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring unparsable value {raw:?} for {key}");
            default
        }),
        None => default,
    }
}
