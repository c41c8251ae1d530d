use crate::domain::currency::CurrencyCode;
use anyhow::Context;
use chrono::NaiveDate;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One completed conversion, as written to the results log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionLogEntry {
    pub base_currency: CurrencyCode,
    pub target_currency: CurrencyCode,
    pub amount: String,
    pub converted_amount: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub base: CurrencyCode,
    pub target: CurrencyCode,
    pub amount: Decimal,
    pub rate: f64,
    pub converted: Decimal,
    pub date: NaiveDate,
}

impl Conversion {
    /// Multiplies `amount` by `rate`, rounding half-to-even to two places.
    pub fn compute(
        base: CurrencyCode,
        target: CurrencyCode,
        amount: Decimal,
        rate: f64,
        date: NaiveDate,
    ) -> anyhow::Result<Self> {
        let rate_dec = Decimal::from_f64(rate)
            .with_context(|| format!("rate {rate} is not representable as a decimal"))?;
        let converted = amount
            .checked_mul(rate_dec)
            .with_context(|| format!("{amount} * {rate} overflows"))?
            .round_dp(2);

        Ok(Self {
            base,
            target,
            amount,
            rate,
            converted,
            date,
        })
    }

    pub fn converted_text(&self) -> String {
        format!("{:.2}", self.converted)
    }

    /// `"10.00 USD is 9.10 EUR"`
    pub fn summary(&self) -> String {
        format!(
            "{} {} is {} {}",
            self.amount,
            self.base,
            self.converted_text(),
            self.target
        )
    }

    pub fn to_log_entry(&self) -> ConversionLogEntry {
        ConversionLogEntry {
            base_currency: self.base.clone(),
            target_currency: self.target.clone(),
            amount: self.amount.to_string(),
            converted_amount: self.converted_text(),
            date: self.date,
        }
    }
}
