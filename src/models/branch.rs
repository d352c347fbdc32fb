use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Numeric grouping of accounts (the "agencia" of the seed files).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct BranchId(u32);

impl BranchId {
    /// The reserved "private" branch that upgraded customers are migrated into.
    pub const PRIVATE: BranchId = BranchId(99);

    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn into_inner(self) -> u32 {
        self.0
    }
}

impl Display for BranchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// Customer facing account number (the "conta" of the seed files).
///
/// Deposits and withdrawals address an account by branch and number, transfers by the number only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct AccountNumber(u64);

impl AccountNumber {
    pub fn new(number: u64) -> Self {
        Self(number)
    }
}

impl Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// Store identity of an account record. Stays stable when the account changes its branch.
#[derive(Debug, Clone, Copy, Serialize, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct AccountId(u32);

impl AccountId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}
