use crate::domain::conversion::ConversionLogEntry;
use anyhow::Context;
use std::path::{Path, PathBuf};

pub const DEFAULT_RESULTS_PATH: &str = "results.json";

/// JSON-array log of completed conversions.
///
/// Every append reads the whole file, pushes the entry and rewrites the file.
/// The rewrite is not atomic: a crash mid-write can truncate the log.
#[derive(Debug, Clone)]
pub struct ResultsLog {
    path: PathBuf,
}

impl ResultsLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads all entries; a missing or empty file is an empty log.
    pub fn load(&self) -> anyhow::Result<Vec<ConversionLogEntry>> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read {}", self.path.display()))
            }
        };

        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&text)
            .with_context(|| format!("{} is not a JSON list of results", self.path.display()))
    }

    pub fn save_entry(&self, entry: &ConversionLogEntry) -> anyhow::Result<usize> {
        let mut entries = self.load()?;
        entries.push(entry.clone());

        let json = serde_json::to_string_pretty(&entries).context("serialize results failed")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("failed to write {}", self.path.display()))?;

        tracing::debug!(path = %self.path.display(), entries = entries.len(), "results log rewritten");
        Ok(entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::currency::CurrencyCode;
    use chrono::NaiveDate;

    fn entry(target: &str, converted: &str) -> ConversionLogEntry {
        ConversionLogEntry {
            base_currency: CurrencyCode::parse("USD").unwrap(),
            target_currency: CurrencyCode::parse(target).unwrap(),
            amount: "10.00".to_string(),
            converted_amount: converted.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = ResultsLog::new(dir.path().join("results.json"));
        assert!(log.load().unwrap().is_empty());
    }

    #[test]
    fn appends_preserve_prior_entries_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let log = ResultsLog::new(dir.path().join("results.json"));

        assert_eq!(log.save_entry(&entry("EUR", "9.10")).unwrap(), 1);
        assert_eq!(log.save_entry(&entry("GBP", "7.90")).unwrap(), 2);

        let entries = log.load().unwrap();
        assert_eq!(entries, vec![entry("EUR", "9.10"), entry("GBP", "7.90")]);
    }

    #[test]
    fn file_is_a_pretty_printed_json_list() {
        let dir = tempfile::tempdir().unwrap();
        let log = ResultsLog::new(dir.path().join("results.json"));
        log.save_entry(&entry("EUR", "9.10")).unwrap();

        let text = std::fs::read_to_string(log.path()).unwrap();
        assert!(text.starts_with("[\n"));
        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v[0]["converted_amount"], "9.10");
        assert_eq!(v[0]["date"], "2024-01-01");
    }

    #[test]
    fn empty_file_is_treated_as_empty_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");
        std::fs::write(&path, "").unwrap();

        let log = ResultsLog::new(path);
        assert_eq!(log.save_entry(&entry("EUR", "9.10")).unwrap(), 1);
    }

    #[test]
    fn corrupt_log_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");
        std::fs::write(&path, "{not json").unwrap();

        let log = ResultsLog::new(&path);
        assert!(log.save_entry(&entry("EUR", "9.10")).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{not json");
    }
}
