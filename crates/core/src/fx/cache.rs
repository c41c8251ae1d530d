use crate::domain::currency::CurrencyCode;
use crate::fx::types::TimeSeriesResult;
use crate::fx::FxApi;
use anyhow::{Context, Result};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Per-process cache of time-series responses keyed by base currency.
///
/// Entries only grow: a fetch for a new target under a cached base is merged
/// into the existing entry, never replacing it. Nothing is evicted.
#[derive(Debug, Default)]
pub struct RateCache {
    entries: HashMap<CurrencyCode, TimeSeriesResult>,
}

impl RateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, base: &CurrencyCode) -> Option<&TimeSeriesResult> {
        self.entries.get(base)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the series for `base` covering `target`, fetching only when the
    /// cached entry lacks `target`. A failed fetch leaves the cache untouched.
    pub async fn convert<A: FxApi + ?Sized>(
        &mut self,
        api: &A,
        base: &CurrencyCode,
        target: &CurrencyCode,
    ) -> Result<&TimeSeriesResult> {
        let hit = self
            .entries
            .get(base)
            .is_some_and(|cached| cached.has_target(target));
        if hit {
            tracing::debug!(%base, %target, "rate cache hit");
        } else {
            let fresh = api.time_series(base, target).await?;
            self.store(base.clone(), fresh);
        }

        self.entries
            .get(base)
            .context("rate cache entry missing after store")
    }

    fn store(&mut self, base: CurrencyCode, fresh: TimeSeriesResult) {
        match self.entries.entry(base) {
            Entry::Occupied(mut slot) => {
                tracing::info!(base = %slot.key(), targets = fresh.results.len(), "merging into cached series");
                merge(slot.get_mut(), fresh);
            }
            Entry::Vacant(slot) => {
                tracing::info!(base = %slot.key(), targets = fresh.results.len(), "caching new series");
                slot.insert(fresh);
            }
        }
    }
}

/// Unions `fresh` into `existing`. Same-dated rates take the fresh value;
/// unseen target currencies are inserted whole.
pub fn merge(existing: &mut TimeSeriesResult, fresh: TimeSeriesResult) {
    for (target, dated) in fresh.results {
        existing.results.entry(target).or_default().extend(dated);
    }
}
