use std::io::Read;

use anyhow::{Context, Result};
use futures::stream::{self, FusedStream, StreamExt};
use serde_json::Value;
use tracing::error;

use crate::models::seed::SeedAccount;

/// Reads the seed dataset used by [crate::ledger::AccountLedger::reset].
///
/// The seed is a JSON array of `{name, agencia, conta, balance}` objects. The array itself has to
/// be well formed, otherwise decoding fails as a whole. Individual records that don't match the
/// expected shape are logged and skipped, keeping the order of the remaining ones.
///
/// The records are handed out as a fused stream, so consumers can keep polling after the end.
pub struct SeedDecoder<R> {
    reader: R,
}

impl<R: Read> SeedDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn decode_accounts(self) -> Result<impl FusedStream<Item = SeedAccount>> {
        let values: Vec<Value> = serde_json::from_reader(self.reader)
            .context("Failed to parse the seed file as a JSON array")?;

        let records = values.into_iter().enumerate().filter_map(|(index, value)| {
            serde_json::from_value::<SeedAccount>(value)
                .inspect_err(|err| {
                    error!("Failed to deserialize seed record #{index} into SeedAccount: {err:?}");
                })
                .ok()
        });

        Ok(stream::iter(records).fuse())
    }
}
