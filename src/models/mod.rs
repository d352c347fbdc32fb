use std::error::Error as StdError;
use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::LedgerError;

pub mod account;
pub mod branch;
pub mod seed;

/// A strictly positive decimal, used for every monetary input entering the ledger.
///
/// Raw request values (strings, floats) are converted into this type at the boundary, so the
/// ledger operations never see zero, negative or non-numeric amounts.
///
/// Like its counterpart for balances, it intentionally does not implement [std::ops::Deref];
/// [PositiveDecimal::into_inner] is the only way back to the underlying [Decimal].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PositiveDecimal(Decimal);

impl PositiveDecimal {
    pub fn try_from<N>(num: N) -> Result<Self, LedgerError>
    where
        N: TryInto<Decimal> + Debug + Send + Sync + Clone + Copy,
        <N as TryInto<Decimal>>::Error: StdError + Send + Sync + 'static,
    {
        let decimal = num
            .try_into()
            .map_err(|err| LedgerError::InvalidAmount(format!("{num:?} ({err})")))?;

        Self::from_decimal(decimal)
    }

    pub fn from_decimal(decimal: Decimal) -> Result<Self, LedgerError> {
        if decimal <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(format!(
                "{decimal} is not greater than 0"
            )));
        }

        Ok(PositiveDecimal(decimal))
    }

    pub fn into_inner(self) -> Decimal {
        self.0
    }
}

impl FromStr for PositiveDecimal {
    type Err = LedgerError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();

        // NaN and the infinities have no Decimal representation and fail both parsers
        let decimal = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| match trimmed.parse::<f64>() {
                Ok(float) if float.is_finite() => LedgerError::InvalidAmount(format!(
                    "amount out of range: {raw:?} exceeds the decimal range (max {})",
                    Decimal::MAX
                )),
                _ => LedgerError::InvalidAmount(format!("{raw:?} is not a number")),
            })?;

        Self::from_decimal(decimal)
    }
}

impl Display for PositiveDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}
