use crate::domain::validate::DATE_FORMAT;
use crate::fx::types::TimeSeriesResult;
use chrono::NaiveDate;

pub const DATE_NOT_FOUND: &str = "Date not found in the data.";

/// Finds the rate recorded for `date` under `target` in `data`.
///
/// Tries a direct key lookup first, then scans the series comparing each key
/// against the `YYYY-MM-DD` rendering of `date`. Returns `None` (with a
/// diagnostic) when neither matches or `target` is absent.
pub fn find_value_on_date(date: NaiveDate, target: &str, data: &TimeSeriesResult) -> Option<f64> {
    let target = target.to_ascii_uppercase();
    let Some(dates) = data.rates_for(&target) else {
        tracing::warn!(%date, %target, "target currency missing from time series");
        return None;
    };

    if let Some(rate) = dates.get(&date.to_string()) {
        return Some(*rate);
    }

    let formatted = date.format(DATE_FORMAT).to_string();
    if let Some((_, rate)) = dates.iter().find(|(key, _)| **key == formatted) {
        return Some(*rate);
    }

    tracing::warn!(%date, %target, points = dates.len(), "{}", DATE_NOT_FOUND);
    None
}
