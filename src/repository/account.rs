use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use anyhow::{Result, bail};
use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use super::{AccountFilter, FindOptions};
use crate::models::account::Account;
use crate::models::branch::{AccountId, BranchId};

/// The persistence collaborator of the ledger, shaped after a document store collection.
///
/// Result types are part of every signature to indicate potential IO, even though the in-memory
/// implementation below never blocks on anything but its lock.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// First match in natural order
    async fn find_one(&self, filter: AccountFilter) -> Result<Option<Account>>;
    async fn find(&self, filter: AccountFilter, options: FindOptions) -> Result<Vec<Account>>;
    async fn distinct_branches(&self) -> Result<BTreeSet<BranchId>>;

    /// Upsert by [AccountId]
    async fn save(&self, account: Account) -> Result<()>;
    /// Upserts all accounts or none of them
    async fn save_all(&self, accounts: Vec<Account>) -> Result<()>;

    async fn delete_one(&self, filter: AccountFilter) -> Result<()>;
    async fn delete_many(&self, filter: AccountFilter) -> Result<()>;
    async fn count(&self, filter: AccountFilter) -> Result<usize>;
}

/// The RwLock makes the repository Send + Sync and lets concurrent readers through.
/// Records live in a [BTreeMap], so the natural order is ascending [AccountId].
#[derive(Default, Clone)]
pub struct InMemoryAccountRepository {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_one(&self, filter: AccountFilter) -> Result<Option<Account>> {
        let guard = self.inner.read().await;

        Ok(guard.find_one(filter))
    }

    async fn find(&self, filter: AccountFilter, options: FindOptions) -> Result<Vec<Account>> {
        let guard = self.inner.read().await;

        Ok(guard.find(filter, &options))
    }

    async fn distinct_branches(&self) -> Result<BTreeSet<BranchId>> {
        let guard = self.inner.read().await;

        Ok(guard.distinct_branches())
    }

    async fn save(&self, account: Account) -> Result<()> {
        let mut guard = self.inner.write().await;

        guard.save_all(vec![account])
    }

    async fn save_all(&self, accounts: Vec<Account>) -> Result<()> {
        let mut guard = self.inner.write().await;

        guard.save_all(accounts)
    }

    async fn delete_one(&self, filter: AccountFilter) -> Result<()> {
        let mut guard = self.inner.write().await;

        guard.delete_one(filter);

        Ok(())
    }

    async fn delete_many(&self, filter: AccountFilter) -> Result<()> {
        let mut guard = self.inner.write().await;

        guard.delete_many(filter);

        Ok(())
    }

    async fn count(&self, filter: AccountFilter) -> Result<usize> {
        let guard = self.inner.read().await;

        Ok(guard.count(filter))
    }
}

#[derive(Default)]
struct Inner {
    accounts: BTreeMap<AccountId, Account>,
}

impl Inner {
    fn matching(&self, filter: AccountFilter) -> impl Iterator<Item = &Account> {
        self.accounts
            .values()
            .filter(move |account| filter.matches(account))
    }

    fn find_one(&self, filter: AccountFilter) -> Option<Account> {
        self.matching(filter).next().cloned()
    }

    fn find(&self, filter: AccountFilter, options: &FindOptions) -> Vec<Account> {
        let mut found: Vec<Account> = self.matching(filter).cloned().collect();

        // stable sort, ties keep the natural order
        found.sort_by(|a, b| options.compare(a, b));

        if let Some(limit) = options.limit {
            found.truncate(limit);
        }

        found
    }

    fn distinct_branches(&self) -> BTreeSet<BranchId> {
        self.accounts.values().map(|account| account.branch).collect()
    }

    fn save_all(&mut self, accounts: Vec<Account>) -> Result<()> {
        // validate everything before the first write
        for account in &accounts {
            if account.balance < Decimal::ZERO {
                bail!(
                    "Failed to save account {:?} (branch {}, account {}): Balance should be positive, got {}",
                    account.id,
                    account.branch,
                    account.account_number,
                    account.balance
                );
            }
        }

        for account in accounts {
            self.accounts.insert(account.id, account);
        }

        Ok(())
    }

    fn delete_one(&mut self, filter: AccountFilter) {
        let id = self.matching(filter).next().map(|account| account.id);

        if let Some(id) = id {
            self.accounts.remove(&id);
        }
    }

    fn delete_many(&mut self, filter: AccountFilter) {
        self.accounts.retain(|_, account| !filter.matches(account));
    }

    fn count(&self, filter: AccountFilter) -> usize {
        self.matching(filter).count()
    }
}

#[cfg(test)]
mod tests {
    use claims::{assert_err, assert_none, assert_ok, assert_ok_eq, assert_some_eq};
    use rust_decimal::dec;

    use super::*;
    use crate::models::branch::AccountNumber;
    use crate::repository::{SortField, SortOrder};

    fn account(id: u32, name: &str, branch: u32, number: u64, balance: Decimal) -> Account {
        Account::new(
            AccountId::new(id),
            name,
            BranchId::new(branch),
            AccountNumber::new(number),
            balance,
        )
    }

    async fn seeded() -> InMemoryAccountRepository {
        let repo = InMemoryAccountRepository::new();
        let accounts = vec![
            account(1, "Carla", 10, 1, dec!(50)),
            account(2, "Bruno", 10, 2, dec!(10)),
            account(3, "Ana", 20, 3, dec!(10)),
            account(4, "Duda", 20, 1, dec!(70)),
        ];
        assert_ok!(repo.save_all(accounts).await);

        repo
    }

    #[tokio::test]
    async fn find_one_returns_the_first_match_in_natural_order() {
        let repo = seeded().await;

        let res = repo
            .find_one(AccountFilter::account_number(AccountNumber::new(1)))
            .await;

        let found = assert_ok!(res);
        assert_some_eq!(found.map(|acc| acc.name), "Carla".to_string());
    }

    #[tokio::test]
    async fn find_one_misses_on_branch_mismatch() {
        let repo = seeded().await;

        let res = repo
            .find_one(AccountFilter::account(BranchId::new(20), AccountNumber::new(2)))
            .await;

        assert_none!(assert_ok!(res));
    }

    #[tokio::test]
    async fn find_sorts_by_all_keys_and_limits() {
        let repo = seeded().await;
        let options = FindOptions::new()
            .sort(SortField::Balance, SortOrder::Ascending)
            .sort(SortField::Name, SortOrder::Ascending)
            .limit(3);

        let found = assert_ok!(repo.find(AccountFilter::all(), options).await);

        let names: Vec<_> = found.iter().map(|acc| acc.name.as_str()).collect();
        assert_eq!(names, ["Ana", "Bruno", "Carla"]);
    }

    #[tokio::test]
    async fn distinct_branches_are_deduplicated() {
        let repo = seeded().await;

        let branches = assert_ok!(repo.distinct_branches().await);

        assert_eq!(
            branches.into_iter().collect::<Vec<_>>(),
            [BranchId::new(10), BranchId::new(20)]
        );
    }

    #[tokio::test]
    async fn save_rejects_negative_balance() {
        let repo = seeded().await;

        let res = repo.save(account(1, "Carla", 10, 1, dec!(-0.5))).await;

        assert_err!(res);
        let stored = assert_ok!(repo.find_one(AccountFilter::branch(BranchId::new(10))).await);
        assert_some_eq!(stored.map(|acc| acc.balance), dec!(50));
    }

    #[tokio::test]
    async fn save_all_writes_nothing_if_one_account_is_invalid() {
        let repo = seeded().await;

        let res = repo
            .save_all(vec![
                account(1, "Carla", 10, 1, dec!(1000)),
                account(2, "Bruno", 10, 2, dec!(-1)),
            ])
            .await;

        assert_err!(res);
        let carla = assert_ok!(
            repo.find_one(AccountFilter::account(BranchId::new(10), AccountNumber::new(1)))
                .await
        );
        assert_some_eq!(carla.map(|acc| acc.balance), dec!(50));
    }

    #[tokio::test]
    async fn delete_one_removes_a_single_record() {
        let repo = seeded().await;

        assert_ok!(
            repo.delete_one(AccountFilter::account_number(AccountNumber::new(1)))
                .await
        );

        assert_ok_eq!(repo.count(AccountFilter::all()).await, 3);
        assert_ok_eq!(repo.count(AccountFilter::branch(BranchId::new(20))).await, 2);
    }

    #[tokio::test]
    async fn delete_many_with_empty_filter_purges_everything() {
        let repo = seeded().await;

        assert_ok!(repo.delete_many(AccountFilter::all()).await);

        assert_ok_eq!(repo.count(AccountFilter::all()).await, 0);
    }
}
