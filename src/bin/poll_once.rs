use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use homework_watchbot::config;
use homework_watchbot::notifier::{Notifier, StdoutNotifier, TelegramNotifier};
use homework_watchbot::poller::{CycleOutcome, Poller};
use homework_watchbot::practicum::PracticumClient;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Run a single poll cycle against the review API and exit"
)]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Unix timestamp to poll from (0 means now)
    #[arg(long, default_value_t = 0)]
    from_date: i64,

    /// Print the notification to stdout instead of sending it
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let cfg = config::load(Some(&args.config))?;
    let creds = cfg.credentials()?;

    let notifier: Arc<dyn Notifier> = if args.dry_run {
        Arc::new(StdoutNotifier)
    } else {
        Arc::new(TelegramNotifier::new(&creds.bot_token, &creds.chat_id))
    };
    let api = PracticumClient::new(
        creds.practicum_token.clone(),
        cfg.endpoint()?,
        cfg.request_timeout(),
    )?;

    let mut poller =
        Poller::with_cursor(Arc::new(api), notifier, cfg.retry_time(), args.from_date);
    match poller.tick().await? {
        CycleOutcome::Notified(_) => {
            info!(next_cursor = poller.cursor(), "status change reported")
        }
        CycleOutcome::NoChanges => info!(next_cursor = poller.cursor(), "no status changes"),
    }
    Ok(())
}
