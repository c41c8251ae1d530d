use crate::config::Settings;
use crate::domain::currency::CurrencyCode;
use crate::fx::error::UpstreamError;
use crate::fx::types::{CurrencyDirectory, TimeSeriesResult};
use crate::fx::FxApi;
use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

const CURRENCIES_PATH: &str = "/currencies";
const TIME_SERIES_PATH: &str = "/time-series";

/// One-day spacing between points of the returned series.
pub const TIME_SERIES_INTERVAL: &str = "P1D";

#[derive(Debug, Clone)]
pub struct HttpFxClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpFxClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.require_api_key()?.to_string();

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("failed to build exchange-rate http client")?;

        Ok(Self {
            http,
            base_url: settings.base_url.clone(),
            api_key,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        // reqwest errors render the request URL, which carries the api key.
        let res = self
            .http
            .get(self.url(endpoint))
            .query(params)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("exchange-rate request to {endpoint} failed"))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("failed to read {endpoint} response"))?;

        decode(endpoint, status, text)
    }
}

/// Turns a response into `T`: non-success statuses become [`UpstreamError`]
/// with the raw body, success bodies must parse as `T`.
pub fn decode<T: DeserializeOwned>(
    endpoint: &'static str,
    status: StatusCode,
    text: String,
) -> Result<T> {
    if !status.is_success() {
        tracing::warn!(endpoint, http_status = %status, "exchange-rate API returned an error");
        return Err(UpstreamError {
            endpoint,
            status,
            body: text,
        }
        .into());
    }

    serde_json::from_str::<T>(&text)
        .with_context(|| format!("failed to parse {endpoint} response: {text}"))
}

pub fn time_series_params<'a>(
    base: &'a CurrencyCode,
    target: &'a CurrencyCode,
) -> [(&'static str, &'a str); 3] {
    [
        ("from", base.as_str()),
        ("to", target.as_str()),
        ("interval", TIME_SERIES_INTERVAL),
    ]
}

#[async_trait::async_trait]
impl FxApi for HttpFxClient {
    async fn list_currencies(&self) -> Result<CurrencyDirectory> {
        self.get_json(CURRENCIES_PATH, &[]).await
    }

    async fn time_series(
        &self,
        base: &CurrencyCode,
        target: &CurrencyCode,
    ) -> Result<TimeSeriesResult> {
        tracing::debug!(%base, %target, "fetching time series");
        self.get_json(TIME_SERIES_PATH, &time_series_params(base, target))
            .await
    }
}
