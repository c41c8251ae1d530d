use crate::domain::currency::CurrencyCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Date string (`YYYY-MM-DD`) to rate.
pub type DatedRates = BTreeMap<String, f64>;

/// `GET /currencies` body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrencyDirectory {
    #[serde(default)]
    pub currencies: BTreeMap<String, String>,
}

impl CurrencyDirectory {
    pub fn contains(&self, code: &CurrencyCode) -> bool {
        self.currencies.contains_key(code.as_str())
    }
}

/// `GET /time-series` body: target currency to its dated rates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    pub results: BTreeMap<String, DatedRates>,
}

impl TimeSeriesResult {
    pub fn has_target(&self, target: &CurrencyCode) -> bool {
        self.results.contains_key(target.as_str())
    }

    pub fn rates_for(&self, target: &str) -> Option<&DatedRates> {
        self.results.get(target)
    }
}
