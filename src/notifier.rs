//! Best-effort delivery of chat messages.
use anyhow::{Context, Result};
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::Recipient;
use tracing::{error, info};

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Attempt a single delivery of `text`.
    async fn deliver(&self, text: &str) -> Result<()>;
}

/// Send `text` and swallow any failure after logging it. Never retries.
pub async fn send_message(notifier: &dyn Notifier, text: &str) {
    match notifier.deliver(text).await {
        Ok(()) => info!(message = text, "notification sent"),
        Err(err) => error!(?err, "failed to deliver notification"),
    }
}

pub struct TelegramNotifier {
    bot: Bot,
    chat: Recipient,
}

impl TelegramNotifier {
    pub fn new(bot_token: &str, chat_id: &str) -> Self {
        Self {
            bot: Bot::new(bot_token),
            chat: recipient(chat_id),
        }
    }

    /// Ask Telegram who we are; fails when the bot token is rejected.
    pub async fn verify(&self) -> Result<String> {
        let me = self
            .bot
            .get_me()
            .await
            .context("telegram rejected the bot token")?;
        Ok(me.username().to_string())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn deliver(&self, text: &str) -> Result<()> {
        self.bot
            .send_message(self.chat.clone(), text)
            .await
            .context("telegram sendMessage failed")?;
        Ok(())
    }
}

/// Numeric ids address a chat directly; anything else is a channel username.
pub fn recipient(chat_id: &str) -> Recipient {
    let chat_id = chat_id.trim();
    match chat_id.parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) => Recipient::ChannelUsername(chat_id.to_string()),
    }
}

/// Prints messages instead of sending them. Used for dry runs.
#[derive(Debug, Default)]
pub struct StdoutNotifier;

#[async_trait]
impl Notifier for StdoutNotifier {
    async fn deliver(&self, text: &str) -> Result<()> {
        println!("{text}");
        Ok(())
    }
}
