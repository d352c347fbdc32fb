pub use crate::config::LedgerConfig;
pub use crate::csv::CsvEncoder;
pub use crate::error::LedgerError;
pub use crate::ledger::{AccountLedger, BranchAverage};
pub use crate::models::PositiveDecimal;
pub use crate::models::account::Account;
pub use crate::models::branch::{AccountId, AccountNumber, BranchId};
pub use crate::models::seed::SeedAccount;
pub use crate::repository::account::{AccountRepository, InMemoryAccountRepository};
pub use crate::repository::{AccountFilter, FindOptions, SortField, SortOrder};
pub use crate::seed::SeedDecoder;
