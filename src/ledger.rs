use std::sync::Arc;

use anyhow::Context;
use futures::stream::{FusedStream, StreamExt};
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::pin;
use tracing::{debug, info, warn};

use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::models::PositiveDecimal;
use crate::models::account::Account;
use crate::models::branch::{AccountId, AccountNumber, BranchId};
use crate::models::seed::SeedAccount;
use crate::repository::account::AccountRepository;
use crate::repository::{AccountFilter, FindOptions, SortField, SortOrder};

/// Average balance of a branch, `avg` is zero for a branch without accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BranchAverage {
    pub branch: BranchId,
    #[serde(with = "rust_decimal::serde::float")]
    pub avg: Decimal,
}

/// The account operations: balance mutations, transfers, rankings and the private branch upgrade.
///
/// Static dispatch over the repository, same as the rest of the crate. The store handle is passed
/// in explicitly, which keeps tests on the in-memory implementation.
pub struct AccountLedger<AR> {
    accounts: Arc<AR>,
    config: LedgerConfig,
}

impl<AR> AccountLedger<AR>
where
    AR: AccountRepository,
{
    pub fn new(accounts: Arc<AR>) -> Self {
        Self::with_config(accounts, LedgerConfig::default())
    }

    pub fn with_config(accounts: Arc<AR>, config: LedgerConfig) -> Self {
        Self { accounts, config }
    }

    pub async fn deposit(
        &self,
        branch: BranchId,
        account_number: AccountNumber,
        amount: PositiveDecimal,
    ) -> Result<Decimal, LedgerError> {
        let mut acc = self.get_account(branch, account_number).await?;

        let balance = acc.deposit(amount)?;

        self.accounts.save(acc).await.with_context(|| {
            format!("Failed to persist deposit of {amount} for branch {branch}, account {account_number}")
        })?;

        info!(%branch, %account_number, %amount, %balance, "deposit");

        Ok(balance)
    }

    pub async fn withdraw(
        &self,
        branch: BranchId,
        account_number: AccountNumber,
        amount: PositiveDecimal,
    ) -> Result<Decimal, LedgerError> {
        let mut acc = self.get_account(branch, account_number).await?;

        let balance = acc
            .try_withdrawal(amount, self.config.withdrawal_fee)
            .inspect_err(|err| warn!(%branch, %account_number, "Rejected withdrawal: {err}"))?;

        self.accounts.save(acc).await.with_context(|| {
            format!("Failed to persist withdrawal of {amount} for branch {branch}, account {account_number}")
        })?;

        info!(%branch, %account_number, %amount, %balance, "withdrawal");

        Ok(balance)
    }

    pub async fn balance(
        &self,
        branch: BranchId,
        account_number: AccountNumber,
    ) -> Result<Decimal, LedgerError> {
        let acc = self.get_account(branch, account_number).await?;

        Ok(acc.balance)
    }

    /// Deletes the account and returns how many accounts remain in its branch
    pub async fn delete_account(
        &self,
        branch: BranchId,
        account_number: AccountNumber,
    ) -> Result<usize, LedgerError> {
        self.get_account(branch, account_number).await?;

        let filter = AccountFilter::account(branch, account_number);
        self.accounts.delete_one(filter).await.with_context(|| {
            format!("Failed to delete branch {branch}, account {account_number}")
        })?;

        let remaining = self
            .accounts
            .count(AccountFilter::branch(branch))
            .await
            .with_context(|| format!("Failed to count the accounts of branch {branch}"))?;

        info!(%branch, %account_number, remaining, "account deleted");

        Ok(remaining)
    }

    /// Moves `amount` between two accounts addressed by their account number only.
    ///
    /// A transfer between different branches additionally charges the inter-branch fee to the
    /// source. There is no funds check here: an overdrawn source is rejected by the store when
    /// both accounts are persisted together, which leaves both balances untouched.
    ///
    /// Returns the source balance after all debits. When source and destination are the same
    /// account nothing is moved or charged and its current balance is returned.
    pub async fn transfer(
        &self,
        source: AccountNumber,
        destination: AccountNumber,
        amount: PositiveDecimal,
    ) -> Result<Decimal, LedgerError> {
        let mut dest = self
            .accounts
            .find_one(AccountFilter::account_number(destination))
            .await
            .with_context(|| format!("Failed to look up destination account {destination}"))?
            .ok_or(LedgerError::DestinationNotFound(destination))?;

        let mut src = self
            .accounts
            .find_one(AccountFilter::account_number(source))
            .await
            .with_context(|| format!("Failed to look up source account {source}"))?
            .ok_or(LedgerError::SourceNotFound(source))?;

        if src.id == dest.id {
            debug!(%source, "Transfer onto the same account, nothing to move");
            return Ok(src.balance);
        }

        if src.branch != dest.branch {
            src.debit(self.config.inter_branch_fee)?;
        }
        let balance = src.debit(amount.into_inner())?;
        dest.credit(amount.into_inner())?;

        self.accounts
            .save_all(vec![src, dest])
            .await
            .with_context(|| {
                format!("Failed to persist transfer of {amount} from account {source} to account {destination}")
            })?;

        info!(%source, %destination, %amount, %balance, "transfer");

        Ok(balance)
    }

    pub async fn balance_average(&self, branch: BranchId) -> Result<BranchAverage, LedgerError> {
        let accounts = self
            .accounts
            .find(AccountFilter::branch(branch), FindOptions::new())
            .await
            .with_context(|| format!("Failed to load the accounts of branch {branch}"))?;

        let avg = if accounts.is_empty() {
            Decimal::ZERO
        } else {
            let total = accounts
                .iter()
                .try_fold(Decimal::ZERO, |sum, acc| sum.checked_add(acc.balance))
                .ok_or_else(|| {
                    LedgerError::InvalidAmount(format!(
                        "amount out of range: the balances of branch {branch} exceed the decimal range"
                    ))
                })?;

            total / Decimal::from(accounts.len())
        };

        Ok(BranchAverage { branch, avg })
    }

    /// Up to `count` accounts, ascending by balance, ties ascending by name
    pub async fn lowest_balance_customers(&self, count: usize) -> Result<Vec<Account>, LedgerError> {
        self.ranked(SortOrder::Ascending, count).await
    }

    /// Up to `count` accounts, descending by balance, ties ascending by name
    pub async fn highest_balance_customers(
        &self,
        count: usize,
    ) -> Result<Vec<Account>, LedgerError> {
        self.ranked(SortOrder::Descending, count).await
    }

    /// Moves the richest customer of every other branch into the private branch and returns
    /// everybody in the private branch afterwards.
    ///
    /// Every branch contributes at most one account per call. Each migration is a single record
    /// write, so a failure leaves the already migrated accounts in place.
    pub async fn upgrade_customers(&self) -> Result<Vec<Account>, LedgerError> {
        let private = self.config.private_branch;

        let branches = self
            .accounts
            .distinct_branches()
            .await
            .context("Failed to list the distinct branches")?;

        for branch in branches.into_iter().filter(|branch| *branch != private) {
            let options = FindOptions::new()
                .sort(SortField::Balance, SortOrder::Descending)
                .sort(SortField::Name, SortOrder::Ascending)
                .limit(1);

            let richest = self
                .accounts
                .find(AccountFilter::branch(branch), options)
                .await
                .with_context(|| format!("Failed to find the richest customer of branch {branch}"))?
                .into_iter()
                .next();

            // The branch may have been emptied since it was listed
            let Some(mut acc) = richest else {
                warn!(%branch, "No account left to upgrade");
                continue;
            };

            acc.migrate_to(private);
            let account_number = acc.account_number;

            self.accounts.save(acc).await.with_context(|| {
                format!("Failed to migrate account {account_number} from branch {branch} to {private}")
            })?;

            info!(%branch, %account_number, "upgraded to the private branch");
        }

        let upgraded = self
            .accounts
            .find(AccountFilter::branch(private), FindOptions::new())
            .await
            .with_context(|| format!("Failed to load the accounts of branch {private}"))?;

        Ok(upgraded)
    }

    /// Deletes every account, then stores the seed records in the order they arrive.
    pub async fn reset<S>(&self, seed: S) -> Result<(), LedgerError>
    where
        S: FusedStream<Item = SeedAccount>,
    {
        self.accounts
            .delete_many(AccountFilter::all())
            .await
            .context("Failed to purge the accounts")?;

        pin!(seed);

        let mut next_id = 1;
        while let Some(record) = seed.next().await {
            let acc = record.into_account(AccountId::new(next_id));
            let account_number = acc.account_number;

            self.accounts
                .save(acc)
                .await
                .with_context(|| format!("Failed to store seed account {account_number}"))?;

            next_id += 1;
        }

        info!(accounts = next_id - 1, "ledger reset");

        Ok(())
    }

    async fn get_account(
        &self,
        branch: BranchId,
        account_number: AccountNumber,
    ) -> Result<Account, LedgerError> {
        debug!(%branch, %account_number, "looking up account");

        self.accounts
            .find_one(AccountFilter::account(branch, account_number))
            .await
            .with_context(|| {
                format!("Failed to look up branch {branch}, account {account_number}")
            })?
            .ok_or(LedgerError::NotFound {
                branch,
                account_number,
            })
    }

    async fn ranked(&self, order: SortOrder, count: usize) -> Result<Vec<Account>, LedgerError> {
        let options = FindOptions::new()
            .sort(SortField::Balance, order)
            .sort(SortField::Name, SortOrder::Ascending)
            .limit(count);

        let accounts = self
            .accounts
            .find(AccountFilter::all(), options)
            .await
            .context("Failed to rank the accounts by balance")?;

        Ok(accounts)
    }
}
