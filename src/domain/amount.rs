//! Native currency amounts and their validation against the HBAR descriptor.

use super::error::ValidationError;
use super::rosetta;

/// Fixed description of the ledger's native currency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeCurrency {
    pub symbol: &'static str,
    pub decimals: i32,
}

/// The one currency this server accepts and emits.
///
/// Values are expressed in tinybars, the smallest indivisible unit.
pub const HBAR: NativeCurrency = NativeCurrency {
    symbol: "HBAR",
    decimals: 0,
};

impl NativeCurrency {
    pub fn to_rosetta(&self) -> rosetta::Currency {
        rosetta::Currency {
            symbol: self.symbol.to_string(),
            decimals: self.decimals,
            metadata: None,
        }
    }

    /// Check an untrusted wire currency against this descriptor.
    ///
    /// The symbol is checked first, so a foreign symbol is reported as such
    /// even when its decimals or metadata are also wrong.
    pub fn validate(&self, currency: &rosetta::Currency) -> Result<(), ValidationError> {
        if currency.symbol != self.symbol {
            return Err(ValidationError::InvalidCurrency(format!(
                "unsupported currency symbol '{}'",
                currency.symbol
            )));
        }

        if currency.decimals < 0 {
            return Err(ValidationError::InvalidCurrency(format!(
                "decimals must be non-negative, got {}",
                currency.decimals
            )));
        }

        if currency.decimals != self.decimals {
            return Err(ValidationError::InvalidCurrency(format!(
                "{} requires {} decimals, got {}",
                self.symbol, self.decimals, currency.decimals
            )));
        }

        if currency.metadata.as_ref().is_some_and(|m| !m.is_empty()) {
            return Err(ValidationError::InvalidCurrency(format!(
                "{} does not accept currency metadata",
                self.symbol
            )));
        }

        Ok(())
    }
}

/// Amount of HBAR in tinybars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HbarAmount {
    value: i64,
}

impl HbarAmount {
    /// Trusted constructor for values read from the ledger
    pub const fn new(value: i64) -> Self {
        Self { value }
    }

    /// Validate and parse an untrusted wire amount
    pub fn from_rosetta(amount: &rosetta::Amount) -> Result<Self, ValidationError> {
        let value = amount.value.parse::<i64>().map_err(|e| {
            ValidationError::InvalidAmount(format!("'{}' is not a 64-bit integer: {}", amount.value, e))
        })?;

        HBAR.validate(&amount.currency)?;

        Ok(Self { value })
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn to_rosetta(&self) -> rosetta::Amount {
        rosetta::Amount {
            value: self.value.to_string(),
            currency: HBAR.to_rosetta(),
            metadata: None,
        }
    }
}

impl From<i64> for HbarAmount {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

/// Ordered list of amounts, e.g. the balances of an account
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmountSlice(Vec<HbarAmount>);

impl AmountSlice {
    pub fn new(amounts: Vec<HbarAmount>) -> Self {
        Self(amounts)
    }

    pub fn to_rosetta(&self) -> Vec<rosetta::Amount> {
        self.0.iter().map(HbarAmount::to_rosetta).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HbarAmount> {
        self.0.iter()
    }
}

impl From<Vec<HbarAmount>> for AmountSlice {
    fn from(amounts: Vec<HbarAmount>) -> Self {
        Self(amounts)
    }
}

impl FromIterator<HbarAmount> for AmountSlice {
    fn from_iter<I: IntoIterator<Item = HbarAmount>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
