//! The poll loop: owns the cursor, runs one cycle at a time and keeps going
//! no matter what a cycle returns.
use chrono::Utc;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

use crate::config::Config;
use crate::error::WatchError;
use crate::model::{PollResponse, Submission};
use crate::notifier::{send_message, Notifier};
use crate::practicum::ReviewApi;
use crate::status::parse_status;
use crate::validate::check_response;

pub const UNAVAILABLE_MESSAGE: &str = "Практикум-Домашка или Токен бота недоступен";

/// Report a startup failure that keeps the loop from ever starting: one
/// critical log line, plus a chat message when the bot side is configured.
/// Returns whether a delivery was attempted.
pub async fn report_fatal(
    cfg: &Config,
    err: &(dyn fmt::Display + Sync),
    notifier: &dyn Notifier,
) -> bool {
    error!(%err, "Ошибка: {}", UNAVAILABLE_MESSAGE);
    if !cfg.can_notify() {
        return false;
    }
    send_message(notifier, UNAVAILABLE_MESSAGE).await;
    true
}

/// What a successful cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    Notified(String),
    NoChanges,
}

pub struct Poller {
    api: Arc<dyn ReviewApi>,
    notifier: Arc<dyn Notifier>,
    retry_time: Duration,
    cursor: i64,
    last_notified: Option<Submission>,
}

impl Poller {
    /// Cursor starts at the current time.
    pub fn new(
        api: Arc<dyn ReviewApi>,
        notifier: Arc<dyn Notifier>,
        retry_time: Duration,
    ) -> Self {
        Self::with_cursor(api, notifier, retry_time, Utc::now().timestamp())
    }

    pub fn with_cursor(
        api: Arc<dyn ReviewApi>,
        notifier: Arc<dyn Notifier>,
        retry_time: Duration,
        cursor: i64,
    ) -> Self {
        Self {
            api,
            notifier,
            retry_time,
            cursor,
            last_notified: None,
        }
    }

    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    pub fn last_notified(&self) -> Option<&Submission> {
        self.last_notified.as_ref()
    }

    /// Cycle forever, sleeping `retry_time` after each one.
    pub async fn run(mut self) {
        info!(cursor = self.cursor, retry_time = ?self.retry_time, "starting poll loop");
        loop {
            let _ = self.tick().await;
            tokio::time::sleep(self.retry_time).await;
        }
    }

    /// Run one cycle. Errors are reported to the chat before being returned,
    /// and leave the cursor where it was so the same window is polled again.
    #[instrument(skip_all, fields(cursor = self.cursor))]
    pub async fn tick(&mut self) -> Result<CycleOutcome, WatchError> {
        match self.poll_cycle().await {
            Ok((outcome, server_time)) => {
                debug!(from = self.cursor, to = server_time, "advancing cursor");
                self.cursor = server_time;
                Ok(outcome)
            }
            Err(err) => {
                let message = format!("Сбой в работе программы: {err}");
                error!(?err, "{}", message);
                send_message(self.notifier.as_ref(), &message).await;
                Err(err)
            }
        }
    }

    async fn poll_cycle(&mut self) -> Result<(CycleOutcome, i64), WatchError> {
        let body = self.api.homework_statuses(self.cursor).await?;
        let response: PollResponse = check_response(&body)?;

        let Some(lead) = response.lead() else {
            debug!("Нет новых статусов");
            return Ok((CycleOutcome::NoChanges, response.server_time));
        };

        let message = parse_status(lead)?;
        if self.last_notified.as_ref() == Some(lead) {
            debug!(?lead, "status repeated since last notification");
        }
        send_message(self.notifier.as_ref(), &message).await;
        self.last_notified = Some(lead.clone());
        Ok((CycleOutcome::Notified(message), response.server_time))
    }
}
