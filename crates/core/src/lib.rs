pub mod domain;
pub mod fx;
pub mod session;
pub mod storage;

pub mod config {
    use anyhow::Context;
    use serde::Deserialize;
    use std::path::Path;

    pub const DEFAULT_BASE_URL: &str = "https://api.fastforex.io";
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub api_key: Option<String>,
        pub base_url: String,
        pub timeout_secs: u64,
        pub sentry_dsn: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    struct ConfigFile {
        #[serde(rename = "API_KEY")]
        api_key: Option<String>,
    }

    impl Settings {
        /// Reads the JSON config file and layers environment overrides on top.
        pub fn load(config_path: &Path) -> anyhow::Result<Self> {
            let text = std::fs::read_to_string(config_path).with_context(|| {
                format!("failed to read config file {}", config_path.display())
            })?;
            let settings = Self::from_json_str(&text)
                .with_context(|| format!("invalid config file {}", config_path.display()))?;
            settings.require_api_key()?;
            Ok(settings)
        }

        pub fn from_json_str(text: &str) -> anyhow::Result<Self> {
            let file = serde_json::from_str::<ConfigFile>(text)
                .context("config is not a valid JSON object")?;

            let base_url = std::env::var("FX_BASE_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

            let timeout_secs = std::env::var("FX_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS);

            Ok(Self {
                api_key: file.api_key.filter(|s| !s.trim().is_empty()),
                base_url,
                timeout_secs,
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }

        pub fn require_api_key(&self) -> anyhow::Result<&str> {
            self.api_key
                .as_deref()
                .context("API_KEY is required in the config file")
        }
    }

}
