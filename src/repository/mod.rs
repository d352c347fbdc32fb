use std::cmp::Ordering;

use crate::models::account::Account;
use crate::models::branch::{AccountNumber, BranchId};

pub mod account;

/// Equality filter over the addressable fields of an [Account]. Unset fields match anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccountFilter {
    pub branch: Option<BranchId>,
    pub account_number: Option<AccountNumber>,
}

impl AccountFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn branch(branch: BranchId) -> Self {
        Self {
            branch: Some(branch),
            ..Self::default()
        }
    }

    pub fn account_number(account_number: AccountNumber) -> Self {
        Self {
            account_number: Some(account_number),
            ..Self::default()
        }
    }

    pub fn account(branch: BranchId, account_number: AccountNumber) -> Self {
        Self {
            branch: Some(branch),
            account_number: Some(account_number),
        }
    }

    pub fn matches(&self, account: &Account) -> bool {
        self.branch.is_none_or(|branch| branch == account.branch)
            && self
                .account_number
                .is_none_or(|number| number == account.account_number)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Balance,
    Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Sort keys (applied in order) and an optional limit for [account::AccountRepository::find].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindOptions {
    pub sort: Vec<(SortField, SortOrder)>,
    pub limit: Option<usize>,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sort(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort.push((field, order));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn compare(&self, a: &Account, b: &Account) -> Ordering {
        self.sort
            .iter()
            .map(|(field, order)| {
                let ordering = match field {
                    SortField::Balance => a.balance.cmp(&b.balance),
                    SortField::Name => a.name.cmp(&b.name),
                };

                match order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}
