use rust_decimal::Decimal;
use serde::Serialize;

use super::PositiveDecimal;
use super::branch::{AccountId, AccountNumber, BranchId};
use crate::error::LedgerError;

/// This type represents a customer account held in a branch.
///
/// The balance mutations live here and are covered by the unit tests in the [tests] submodule.
/// None of them enforce `balance >= 0`: that invariant belongs to the store and is checked when
/// the account gets persisted. Results outside the [Decimal] range are rejected, never clamped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub branch: BranchId,
    pub old_branch: Option<BranchId>,
    pub account_number: AccountNumber,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

impl Account {
    pub fn new(
        id: AccountId,
        name: impl Into<String>,
        branch: BranchId,
        account_number: AccountNumber,
        balance: Decimal,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            branch,
            old_branch: None,
            account_number,
            balance,
        }
    }

    pub fn deposit(&mut self, amount: PositiveDecimal) -> Result<Decimal, LedgerError> {
        self.credit(amount.into_inner())
    }

    /// Debits `amount + fee`, refusing to go below zero.
    pub fn try_withdrawal(
        &mut self,
        amount: PositiveDecimal,
        fee: Decimal,
    ) -> Result<Decimal, LedgerError> {
        let requested = amount
            .into_inner()
            .checked_add(fee)
            .ok_or_else(|| out_of_range(amount.into_inner(), fee))?;

        if requested > self.balance {
            return Err(LedgerError::InsufficientFunds {
                requested,
                available: self.balance,
            });
        }

        self.debit(requested)
    }

    /// Debit without a funds check, the result may be negative.
    pub fn debit(&mut self, amount: Decimal) -> Result<Decimal, LedgerError> {
        self.balance = self
            .balance
            .checked_sub(amount)
            .ok_or_else(|| out_of_range(self.balance, amount))?;

        Ok(self.balance)
    }

    pub fn credit(&mut self, amount: Decimal) -> Result<Decimal, LedgerError> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| out_of_range(self.balance, amount))?;

        Ok(self.balance)
    }

    pub fn migrate_to(&mut self, branch: BranchId) {
        self.old_branch = Some(self.branch);
        self.branch = branch;
    }
}

fn out_of_range(balance: Decimal, amount: Decimal) -> LedgerError {
    LedgerError::InvalidAmount(format!(
        "amount out of range: {amount} cannot be applied to a balance of {balance}"
    ))
}
