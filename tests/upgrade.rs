use claims::assert_ok;
use rust_decimal::dec;

use branch_ledger::prelude::{AccountFilter, AccountRepository, BranchId, FindOptions};

use setup::Components;


#[tokio::test]
async fn moves_the_richest_customer_of_every_branch() {
    let Components { ledger, accounts } = Components::seeded(&[
        ("Ana", 1, 1, dec!(100)),
        ("Bia", 1, 2, dec!(300)),
        ("Caio", 2, 3, dec!(50)),
        ("Duda", 2, 4, dec!(50)),
        ("Enzo", 99, 5, dec!(10)),
    ])
    .await;

    // act
    let private = assert_ok!(ledger.upgrade_customers().await);

    // assert
    let mut summary: Vec<_> = private
        .iter()
        .map(|acc| (acc.name.as_str(), acc.old_branch))
        .collect();
    summary.sort();
    assert_eq!(
        summary,
        [
            ("Bia", Some(BranchId::new(1))),
            // tie on balance, name decides
            ("Caio", Some(BranchId::new(2))),
            ("Enzo", None),
        ]
    );
    assert!(private.iter().all(|acc| acc.branch == BranchId::PRIVATE));

    let left = assert_ok!(
        accounts
            .find(AccountFilter::all(), FindOptions::new())
            .await
    );
    let untouched: Vec<_> = left
        .iter()
        .filter(|acc| acc.branch != BranchId::PRIVATE)
        .map(|acc| acc.name.as_str())
        .collect();
    assert_eq!(untouched, ["Ana", "Duda"]);
}

#[tokio::test]
async fn every_branch_contributes_one_account_per_call() {
    let Components { ledger, .. } = Components::seeded(&[
        ("Ana", 1, 1, dec!(100)),
        ("Bia", 1, 2, dec!(300)),
        ("Caio", 2, 3, dec!(50)),
    ])
    .await;

    let first = assert_ok!(ledger.upgrade_customers().await);
    assert_eq!(first.len(), 2);

    // branch 2 is drained, branch 1 still has Ana
    let second = assert_ok!(ledger.upgrade_customers().await);
    assert_eq!(second.len(), 3);

    // only the private branch is left, nothing to migrate
    let third = assert_ok!(ledger.upgrade_customers().await);
    assert_eq!(third, second);
}

#[tokio::test]
async fn upgrade_without_accounts_returns_nothing() {
    let Components { ledger, .. } = Components::setup();

    let private = assert_ok!(ledger.upgrade_customers().await);

    assert!(private.is_empty());
}
