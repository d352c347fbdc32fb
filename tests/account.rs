use claims::{assert_matches, assert_ok_eq};
use rust_decimal::dec;

use branch_ledger::prelude::{AccountNumber, BranchId, LedgerError};

use setup::Components;


#[tokio::test]
async fn can_query_the_balance() {
    let Components { ledger, .. } = Components::seeded(&[
        ("Maria", 10, 1001, dec!(587)),
        ("Gustavo", 47, 1002, dec!(132.55)),
    ])
    .await;

    let res = ledger
        .balance(BranchId::new(47), AccountNumber::new(1002))
        .await;

    assert_ok_eq!(res, dec!(132.55));
}

#[tokio::test]
async fn balance_of_unknown_account_is_not_found() {
    let Components { ledger, .. } = Components::seeded(&[("Maria", 10, 1001, dec!(587))]).await;

    let res = ledger
        .balance(BranchId::new(10), AccountNumber::new(1002))
        .await;

    assert_matches!(
        res,
        Err(LedgerError::NotFound { branch, account_number })
            if branch == BranchId::new(10) && account_number == AccountNumber::new(1002)
    );
}

#[tokio::test]
async fn delete_returns_the_remaining_accounts_of_the_branch() {
    let Components { ledger, .. } = Components::seeded(&[
        ("Ana", 10, 1, dec!(1)),
        ("Bia", 10, 2, dec!(2)),
        ("Caio", 10, 3, dec!(3)),
        ("Davi", 20, 4, dec!(4)),
    ])
    .await;

    let res = ledger
        .delete_account(BranchId::new(10), AccountNumber::new(2))
        .await;

    assert_ok_eq!(res, 2);
    assert_matches!(
        ledger.balance(BranchId::new(10), AccountNumber::new(2)).await,
        Err(LedgerError::NotFound { .. })
    );
}

#[tokio::test]
async fn deleting_the_last_account_of_a_branch_leaves_zero() {
    let Components { ledger, .. } = Components::seeded(&[
        ("Ana", 10, 1, dec!(1)),
        ("Davi", 20, 4, dec!(4)),
    ])
    .await;

    let res = ledger
        .delete_account(BranchId::new(20), AccountNumber::new(4))
        .await;

    assert_ok_eq!(res, 0);
}

#[tokio::test]
async fn cant_delete_unknown_account() {
    let Components { ledger, .. } = Components::seeded(&[("Ana", 10, 1, dec!(1))]).await;

    let res = ledger
        .delete_account(BranchId::new(20), AccountNumber::new(1))
        .await;

    assert_matches!(res, Err(LedgerError::NotFound { .. }));
    assert_ok_eq!(
        ledger.balance(BranchId::new(10), AccountNumber::new(1)).await,
        dec!(1)
    );
}
