use crate::domain::currency::CurrencyCode;
use crate::fx::types::{CurrencyDirectory, TimeSeriesResult};
use anyhow::Result;

pub mod cache;
pub mod client;
pub mod error;
pub mod lookup;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

/// Seam over the remote foreign-exchange API.
///
/// Non-success HTTP responses surface as [`error::UpstreamError`] inside the
/// returned `anyhow::Error`.
#[async_trait::async_trait]
pub trait FxApi: Send + Sync {
    async fn list_currencies(&self) -> Result<CurrencyDirectory>;

    async fn time_series(
        &self,
        base: &CurrencyCode,
        target: &CurrencyCode,
    ) -> Result<TimeSeriesResult>;
}
