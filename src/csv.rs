use std::io::Write;

use anyhow::{Context, Result};

use crate::models::account::Account;

/// Writes account listings (rankings, the private branch) as CSV with a header row.
pub struct CsvEncoder;

impl CsvEncoder {
    pub fn encode_accounts<W: Write>(sink: W, accounts: &[Account]) -> Result<()> {
        let mut writer = csv::Writer::from_writer(sink);
        for acc in accounts {
            writer
                .serialize(acc)
                .with_context(|| format!("Failed to serialize account {:?}", acc.id))?;
        }
        writer.flush().context("Failed to flush the writer")?;

        Ok(())
    }
}
