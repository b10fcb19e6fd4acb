use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

use heatwatch_core::{Config, monitor, notify, source};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "heatwatch",
    version,
    about = "Watches city daily-max temperatures and alerts on short-window rises"
)]
pub struct Cli {
    /// Seconds between polling cycles.
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
    interval: u64,

    /// Verbose logging.
    #[arg(long)]
    debug: bool,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        init_logging(self.debug)?;

        let mut config = Config::builtin();
        config.poll_interval = Duration::from_secs(self.interval);

        let client = source::http_client()?;
        let sources = source::all_sources(&client);
        let notifier = notify::detect();

        tracing::info!(
            cities = config.cities.len(),
            interval_secs = self.interval,
            "starting monitor"
        );
        monitor::run(&config, &sources, notifier.as_ref()).await
    }
}

fn init_logging(debug: bool) -> anyhow::Result<()> {
    let level = if debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env()?,
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
