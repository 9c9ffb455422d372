use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use homework_watchbot::config;
use homework_watchbot::notifier::TelegramNotifier;
use homework_watchbot::poller::{report_fatal, Poller};
use homework_watchbot::practicum::PracticumClient;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,
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

    let creds = match cfg.credentials() {
        Ok(creds) => creds,
        Err(err) => {
            let notifier = TelegramNotifier::new(&cfg.telegram.bot_token, &cfg.telegram.chat_id);
            report_fatal(&cfg, &err, &notifier).await;
            return Ok(());
        }
    };

    let notifier = TelegramNotifier::new(&creds.bot_token, &creds.chat_id);
    if cfg.app.verify_bot_token {
        match notifier.verify().await {
            Ok(username) => info!(bot = %username, "bot token verified"),
            Err(err) => {
                report_fatal(&cfg, &format!("{err:#}"), &notifier).await;
                return Ok(());
            }
        }
    }

    let api = PracticumClient::new(
        creds.practicum_token.clone(),
        cfg.endpoint()?,
        cfg.request_timeout(),
    )?;
    Poller::new(Arc::new(api), Arc::new(notifier), cfg.retry_time())
        .run()
        .await;

    Ok(())
}
