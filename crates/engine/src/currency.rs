use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// ISO-like three letter currency code (`USD`, `EUR`, ...).
///
/// Codes are stored upper-case. Whether a code is *known* depends on the
/// [`RateTable`] the engine was built with.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(value: &str) -> ResultEngine<Self> {
        let code = value.trim().to_ascii_uppercase();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(EngineError::InvalidCurrency(value.trim().to_string()));
        }
        Ok(Self(code))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for CurrencyCode {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(value: CurrencyCode) -> Self {
        value.0
    }
}

/// Static conversion table: currency code -> multiplier into the reference
/// currency.
///
/// Amounts are integer minor units. A conversion multiplies the minor units by
/// the rate and rounds to the nearest minor unit of the reference currency.
#[derive(Clone, Debug, PartialEq)]
pub struct RateTable {
    reference: CurrencyCode,
    rates: BTreeMap<CurrencyCode, f64>,
}

impl RateTable {
    /// Empty table that only knows its reference currency (rate 1).
    #[must_use]
    pub fn new(reference: CurrencyCode) -> Self {
        let mut rates = BTreeMap::new();
        rates.insert(reference.clone(), 1.0);
        Self { reference, rates }
    }

    /// Add or replace the rate of `code`.
    pub fn with_rate(mut self, code: &str, rate: f64) -> ResultEngine<Self> {
        let code = CurrencyCode::new(code)?;
        if !rate.is_finite() || rate <= 0.0 {
            return Err(EngineError::InvalidAmount(format!(
                "rate for {code} must be a positive number"
            )));
        }
        if code == self.reference && rate != 1.0 {
            return Err(EngineError::InvalidAmount(format!(
                "reference currency {code} must have rate 1"
            )));
        }
        self.rates.insert(code, rate);
        Ok(self)
    }

    #[must_use]
    pub fn reference(&self) -> &CurrencyCode {
        &self.reference
    }

    #[must_use]
    pub fn contains(&self, code: &CurrencyCode) -> bool {
        self.rates.contains_key(code)
    }

    /// Known codes, sorted.
    pub fn codes(&self) -> impl Iterator<Item = &CurrencyCode> {
        self.rates.keys()
    }

    /// Parse `value` and require it to be part of the table.
    pub fn known(&self, value: &str) -> ResultEngine<CurrencyCode> {
        let code = CurrencyCode::new(value)?;
        if !self.contains(&code) {
            return Err(EngineError::InvalidCurrency(code.to_string()));
        }
        Ok(code)
    }

    /// Multiplier for `code`. Unknown codes count at par.
    #[must_use]
    pub fn rate(&self, code: &CurrencyCode) -> f64 {
        match self.rates.get(code) {
            Some(rate) => *rate,
            None => {
                tracing::warn!(currency = %code, "no rate for currency, counting it at par");
                1.0
            }
        }
    }

    /// Convert `amount_minor` of `code` into minor units of the reference
    /// currency.
    #[must_use]
    pub fn to_reference_minor(&self, amount_minor: i64, code: &CurrencyCode) -> i64 {
        (amount_minor as f64 * self.rate(code)).round() as i64
    }
}

impl Default for RateTable {
    fn default() -> Self {
        let usd = CurrencyCode("USD".to_string());
        let mut rates = BTreeMap::new();
        rates.insert(usd.clone(), 1.0);
        rates.insert(CurrencyCode("EUR".to_string()), 1.08);
        rates.insert(CurrencyCode("ARS".to_string()), 0.0011);
        Self {
            reference: usd,
            rates,
        }
    }
}
