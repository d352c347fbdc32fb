use std::fs::File;
use std::io;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::json;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use branch_ledger::prelude::*;

const USAGE: &str = "Usage: branch-ledger <seed.json> <command> [args]

Commands:
  deposit <branch> <account> <amount>
  withdraw <branch> <account> <amount>
  balance <branch> <account>
  delete <branch> <account>
  transfer <source account> <destination account> <amount>
  average <branch>
  lowest <count>
  highest <count>
  upgrade
  list";

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the results, logs go to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    let args: Vec<_> = std::env::args().skip(1).collect();

    let (seed_path, command) = args
        .split_first()
        .with_context(|| format!("Expected the seed file path as first argument.\n\n{USAGE}"))?;
    let file = File::open(seed_path)
        .with_context(|| format!("Failed to open seed file with path: {seed_path}. Exiting"))?;

    let accounts = Arc::new(InMemoryAccountRepository::new());
    let ledger = AccountLedger::with_config(Arc::clone(&accounts), LedgerConfig::from_env());

    let seed = SeedDecoder::new(file)
        .decode_accounts()
        .with_context(|| format!("Failed to decode seed file: {seed_path}"))?;
    ledger.reset(seed).await.context("Failed to load the seed")?;

    let command: Vec<&str> = command.iter().map(String::as_str).collect();

    match command.as_slice() {
        ["deposit", branch, account, amount] => {
            let balance = ledger
                .deposit(branch_id(branch)?, account_number(account)?, amount.parse()?)
                .await?;
            print_json(json!({ "currentBalance": float(balance) }))
        }

        ["withdraw", branch, account, amount] => {
            let balance = ledger
                .withdraw(branch_id(branch)?, account_number(account)?, amount.parse()?)
                .await?;
            print_json(json!({ "currentBalance": float(balance) }))
        }

        ["balance", branch, account] => {
            let balance = ledger
                .balance(branch_id(branch)?, account_number(account)?)
                .await?;
            print_json(json!({ "balance": float(balance) }))
        }

        ["delete", branch, account] => {
            let branch = branch_id(branch)?;
            let remaining = ledger
                .delete_account(branch, account_number(account)?)
                .await?;
            print_json(json!({ "branch": branch, "activeAccounts": remaining }))
        }

        ["transfer", source, destination, amount] => {
            let source = account_number(source)?;
            let balance = ledger
                .transfer(source, account_number(destination)?, amount.parse()?)
                .await?;
            print_json(json!({ "sourceAccount": source, "sourceBalance": float(balance) }))
        }

        ["average", branch] => {
            let average = ledger.balance_average(branch_id(branch)?).await?;
            print_json(json!({ "balanceAvg": average }))
        }

        ["lowest", count] => {
            let customers = ledger.lowest_balance_customers(parse_count(count)?).await?;
            CsvEncoder::encode_accounts(io::stdout(), &customers)
        }

        ["highest", count] => {
            let customers = ledger.highest_balance_customers(parse_count(count)?).await?;
            CsvEncoder::encode_accounts(io::stdout(), &customers)
        }

        ["upgrade"] => {
            let private_accounts = ledger.upgrade_customers().await?;
            CsvEncoder::encode_accounts(io::stdout(), &private_accounts)
        }

        ["list"] => {
            let all = accounts
                .find(AccountFilter::all(), FindOptions::new())
                .await
                .context("Failed to list the accounts")?;
            CsvEncoder::encode_accounts(io::stdout(), &all)
        }

        _ => bail!("Unknown command: {command:?}\n\n{USAGE}"),
    }
}

fn branch_id(raw: &str) -> Result<BranchId> {
    raw.trim()
        .parse()
        .map(BranchId::new)
        .with_context(|| format!("Invalid branch: {raw:?}"))
}

fn account_number(raw: &str) -> Result<AccountNumber> {
    raw.trim()
        .parse()
        .map(AccountNumber::new)
        .with_context(|| format!("Invalid account number: {raw:?}"))
}

fn parse_count(raw: &str) -> Result<usize> {
    raw.trim()
        .parse()
        .with_context(|| format!("Invalid count: {raw:?}"))
}

fn float(value: Decimal) -> Option<f64> {
    value.to_f64()
}

fn print_json(value: serde_json::Value) -> Result<()> {
    let rendered = serde_json::to_string_pretty(&value).context("Failed to render the result")?;
    println!("{rendered}");

    Ok(())
}
