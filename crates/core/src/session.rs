//! Interactive conversion loop.
//!
//! Each cycle walks amount -> base currency -> target currency -> fetch ->
//! lookup -> report. Typing `END` at any prompt (or closing stdin) ends the
//! whole session; the cancellation travels back as [`Prompted::End`] so the
//! caller shuts down in one place.

use crate::domain::conversion::Conversion;
use crate::domain::currency::CurrencyCode;
use crate::domain::validate::{is_valid_amount, parse_amount};
use crate::fx::cache::RateCache;
use crate::fx::error::UpstreamError;
use crate::fx::lookup::{find_value_on_date, DATE_NOT_FOUND};
use crate::fx::FxApi;
use crate::storage::results::ResultsLog;
use anyhow::Context;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::io::{BufRead, Write};

pub const END_SENTINEL: &str = "END";

const INVALID_AMOUNT: &str = "Please enter a valid amount";
const INVALID_CURRENCY: &str = "Please enter a valid currency code";

/// A prompt either produced a value or the user asked to stop.
#[derive(Debug, Clone, PartialEq)]
pub enum Prompted<T> {
    Value(T),
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    Converted(Conversion),
    /// Fetch failed or the rate was missing; nothing was logged.
    Abandoned(AbandonReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbandonReason {
    Upstream,
    Fetch,
    TargetMissing,
    DateNotFound,
    Compute,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub converted: usize,
    pub abandoned: usize,
}

pub struct Session<'a, A: FxApi + ?Sized, R, W> {
    api: &'a A,
    cache: RateCache,
    results: ResultsLog,
    date: NaiveDate,
    input: R,
    output: W,
}

impl<'a, A, R, W> Session<'a, A, R, W>
where
    A: FxApi + ?Sized,
    R: BufRead,
    W: Write,
{
    pub fn new(api: &'a A, results: ResultsLog, date: NaiveDate, input: R, output: W) -> Self {
        Self {
            api,
            cache: RateCache::new(),
            results,
            date,
            input,
            output,
        }
    }

    pub fn cache(&self) -> &RateCache {
        &self.cache
    }

    /// Runs cycles until the user ends the session. Errors returned here are
    /// fatal (console or results log I/O).
    pub async fn run(&mut self) -> anyhow::Result<RunSummary> {
        let mut summary = RunSummary::default();
        loop {
            match self.run_cycle().await? {
                Prompted::End => {
                    tracing::info!(
                        converted = summary.converted,
                        abandoned = summary.abandoned,
                        "session ended"
                    );
                    return Ok(summary);
                }
                Prompted::Value(CycleOutcome::Converted(_)) => summary.converted += 1,
                Prompted::Value(CycleOutcome::Abandoned(_)) => summary.abandoned += 1,
            }
        }
    }

    pub async fn run_cycle(&mut self) -> anyhow::Result<Prompted<CycleOutcome>> {
        let amount = match self.prompt_amount()? {
            Prompted::Value(amount) => amount,
            Prompted::End => return Ok(Prompted::End),
        };
        let base = match self.prompt_currency("Base currency: ").await? {
            Prompted::Value(code) => code,
            Prompted::End => return Ok(Prompted::End),
        };
        let target = match self.prompt_currency("Target currency: ").await? {
            Prompted::Value(code) => code,
            Prompted::End => return Ok(Prompted::End),
        };

        let date = self.date;
        let fetched = self
            .cache
            .convert(self.api, &base, &target)
            .await
            .map(|data| {
                (
                    data.has_target(&target),
                    find_value_on_date(date, target.as_str(), data),
                )
            });
        let (has_target, rate) = match fetched {
            Ok(found) => found,
            Err(err) => {
                let reason = self.report_fetch_error(&base, &target, &err)?;
                return Ok(Prompted::Value(CycleOutcome::Abandoned(reason)));
            }
        };

        if !has_target {
            writeln!(
                self.output,
                "The {base} time series has no rates for {target}."
            )?;
            return Ok(Prompted::Value(CycleOutcome::Abandoned(
                AbandonReason::TargetMissing,
            )));
        }

        let Some(rate) = rate else {
            writeln!(self.output, "{DATE_NOT_FOUND}")?;
            return Ok(Prompted::Value(CycleOutcome::Abandoned(
                AbandonReason::DateNotFound,
            )));
        };

        let conversion = match Conversion::compute(base, target, amount, rate, self.date) {
            Ok(conversion) => conversion,
            Err(err) => {
                tracing::warn!(error = %err, "conversion could not be computed");
                writeln!(self.output, "Could not compute the conversion: {err:#}")?;
                return Ok(Prompted::Value(CycleOutcome::Abandoned(
                    AbandonReason::Compute,
                )));
            }
        };

        writeln!(self.output, "{}", conversion.summary())?;
        writeln!(self.output)?;

        let entries = self
            .results
            .save_entry(&conversion.to_log_entry())
            .context("failed to persist conversion result")?;
        tracing::info!(
            base = %conversion.base,
            target = %conversion.target,
            date = %conversion.date,
            rate = conversion.rate,
            entries,
            "conversion logged"
        );

        Ok(Prompted::Value(CycleOutcome::Converted(conversion)))
    }

    fn report_fetch_error(
        &mut self,
        base: &CurrencyCode,
        target: &CurrencyCode,
        err: &anyhow::Error,
    ) -> anyhow::Result<AbandonReason> {
        if let Some(upstream) = err.downcast_ref::<UpstreamError>() {
            tracing::warn!(%base, %target, http_status = %upstream.status, "time series request rejected");
            writeln!(
                self.output,
                "Exchange-rate service returned {}: {}",
                upstream.status,
                upstream.body.trim()
            )?;
            return Ok(AbandonReason::Upstream);
        }

        tracing::error!(%base, %target, error = %err, "time series request failed");
        writeln!(self.output, "Could not fetch exchange rates: {err:#}")?;
        Ok(AbandonReason::Fetch)
    }

    fn prompt_amount(&mut self) -> anyhow::Result<Prompted<Decimal>> {
        loop {
            let line = match self.read_line("Amount: ")? {
                Prompted::Value(line) => line,
                Prompted::End => return Ok(Prompted::End),
            };

            if is_valid_amount(&line) {
                if let Some(amount) = parse_amount(&line) {
                    return Ok(Prompted::Value(amount));
                }
            }
            writeln!(self.output, "{INVALID_AMOUNT}")?;
        }
    }

    /// Re-queries the currency directory for every candidate code.
    async fn prompt_currency(&mut self, prompt: &str) -> anyhow::Result<Prompted<CurrencyCode>> {
        loop {
            let line = match self.read_line(prompt)? {
                Prompted::Value(line) => line,
                Prompted::End => return Ok(Prompted::End),
            };

            let Some(code) = CurrencyCode::parse(&line) else {
                writeln!(self.output, "{INVALID_CURRENCY}")?;
                continue;
            };

            match self.api.list_currencies().await {
                Ok(directory) if directory.contains(&code) => return Ok(Prompted::Value(code)),
                Ok(_) => {
                    tracing::debug!(%code, "currency not in directory");
                }
                Err(err) => {
                    tracing::warn!(%code, error = %err, "currency directory lookup failed");
                    if let Some(upstream) = err.downcast_ref::<UpstreamError>() {
                        writeln!(
                            self.output,
                            "Currency directory returned {}: {}",
                            upstream.status,
                            upstream.body.trim()
                        )?;
                    }
                }
            }
            writeln!(self.output, "{INVALID_CURRENCY}")?;
        }
    }

    /// Writes `prompt`, reads one line. End of input and `END` (any case) both
    /// come back as [`Prompted::End`].
    fn read_line(&mut self, prompt: &str) -> anyhow::Result<Prompted<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        let n = self
            .input
            .read_line(&mut line)
            .context("failed to read from console")?;
        if n == 0 {
            return Ok(Prompted::End);
        }

        let line = line.trim();
        if line.eq_ignore_ascii_case(END_SENTINEL) {
            return Ok(Prompted::End);
        }
        Ok(Prompted::Value(line.to_string()))
    }
}
