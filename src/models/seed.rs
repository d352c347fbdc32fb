use rust_decimal::Decimal;
use serde::Deserialize;

use super::account::Account;
use super::branch::{AccountId, AccountNumber, BranchId};

/// One record of the seed dataset consumed by the reset operation.
///
/// The field names follow the seed files (`agencia`, `conta`), which predate the ledger's naming.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeedAccount {
    pub name: String,

    #[serde(rename = "agencia")]
    pub branch: BranchId,

    #[serde(rename = "conta")]
    pub account_number: AccountNumber,

    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

impl SeedAccount {
    pub fn into_account(self, id: AccountId) -> Account {
        Account::new(id, self.name, self.branch, self.account_number, self.balance)
    }
}
