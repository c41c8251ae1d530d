use reqwest::StatusCode;
use std::fmt;

/// A non-success response from the exchange-rate API, with the raw body kept
/// for diagnostics.
#[derive(Debug, Clone)]
pub struct UpstreamError {
    pub endpoint: &'static str,
    pub status: StatusCode,
    pub body: String,
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "exchange-rate API error (endpoint={}, status={}): {}",
            self.endpoint,
            self.status,
            self.body.trim()
        )
    }
}

impl std::error::Error for UpstreamError {}
