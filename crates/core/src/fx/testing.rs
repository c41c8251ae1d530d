use crate::domain::currency::CurrencyCode;
use crate::fx::error::UpstreamError;
use crate::fx::types::{CurrencyDirectory, TimeSeriesResult};
use crate::fx::FxApi;
use anyhow::Result;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory [`FxApi`] serving canned data and counting calls.
///
/// Unknown pairs answer like the real API does for a bad request: HTTP 400
/// with a JSON error body.
#[derive(Default)]
pub struct StubApi {
    currencies: BTreeMap<String, String>,
    series: BTreeMap<(String, String), TimeSeriesResult>,
    directory_down: bool,
    directory_calls: AtomicUsize,
    series_calls: AtomicUsize,
}

impl StubApi {
    pub fn with_currencies(mut self, codes: &[&str]) -> Self {
        for code in codes {
            self.currencies.insert(code.to_string(), format!("{code} name"));
        }
        self
    }

    pub fn with_series(self, base: &str, target: &str, rates: &[(&str, f64)]) -> Self {
        self.with_series_under(base, target, target, rates)
    }

    /// Answers a `base -> target` request with rates keyed under `returned`.
    pub fn with_series_under(
        mut self,
        base: &str,
        target: &str,
        returned: &str,
        rates: &[(&str, f64)],
    ) -> Self {
        let dated = rates.iter().map(|(d, r)| (d.to_string(), *r)).collect();
        let mut results = BTreeMap::new();
        results.insert(returned.to_string(), dated);
        self.series.insert(
            (base.to_string(), target.to_string()),
            TimeSeriesResult {
                base: Some(base.to_string()),
                results,
                ..Default::default()
            },
        );
        self
    }

    pub fn with_directory_down(mut self) -> Self {
        self.directory_down = true;
        self
    }

    pub fn directory_calls(&self) -> usize {
        self.directory_calls.load(Ordering::SeqCst)
    }

    pub fn series_calls(&self) -> usize {
        self.series_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl FxApi for StubApi {
    async fn list_currencies(&self) -> Result<CurrencyDirectory> {
        self.directory_calls.fetch_add(1, Ordering::SeqCst);
        if self.directory_down {
            return Err(UpstreamError {
                endpoint: "/currencies",
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                body: "maintenance".to_string(),
            }
            .into());
        }
        Ok(CurrencyDirectory {
            currencies: self.currencies.clone(),
        })
    }

    async fn time_series(
        &self,
        base: &CurrencyCode,
        target: &CurrencyCode,
    ) -> Result<TimeSeriesResult> {
        self.series_calls.fetch_add(1, Ordering::SeqCst);
        let key = (base.to_string(), target.to_string());
        match self.series.get(&key) {
            Some(series) => Ok(series.clone()),
            None => Err(UpstreamError {
                endpoint: "/time-series",
                status: reqwest::StatusCode::BAD_REQUEST,
                body: r#"{"error":"unknown pair"}"#.to_string(),
            }
            .into()),
        }
    }
}
