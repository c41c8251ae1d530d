use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use fxconv_core::config::Settings;
use fxconv_core::domain::validate::validate_date;
use fxconv_core::fx::client::HttpFxClient;
use fxconv_core::session::Session;
use fxconv_core::storage::results::{ResultsLog, DEFAULT_RESULTS_PATH};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "fxconv", about = "Convert amounts at historical exchange rates")]
struct Args {
    /// Rate date (YYYY-MM-DD) used for every conversion in this run.
    #[arg(value_parser = validate_date)]
    date: NaiveDate,

    /// JSON config file holding API_KEY.
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Results log, a JSON list rewritten after every conversion.
    #[arg(long, default_value = DEFAULT_RESULTS_PATH)]
    results: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let settings = Settings::load(&args.config)?;
    let _sentry_guard = init_sentry(&settings);

    // Logs go to stderr so they never interleave with prompts.
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let client = HttpFxClient::from_settings(&settings)?;
    let results = ResultsLog::new(&args.results);

    tracing::info!(
        date = %args.date,
        base_url = %settings.base_url,
        results = %results.path().display(),
        "starting conversion session"
    );

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut session = Session::new(&client, results, args.date, stdin.lock(), stdout.lock());

    match session.run().await.context("conversion session aborted") {
        Ok(summary) => {
            tracing::info!(
                converted = summary.converted,
                abandoned = summary.abandoned,
                "bye"
            );
            Ok(())
        }
        Err(err) => {
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(error = %format!("{err:#}"), "fatal error");
            Err(err)
        }
    }
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
