//! Configuration loader and validator for the homework review watcher.
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

pub const ENV_PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
pub const ENV_TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const ENV_TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),
}

/// Root configuration struct mirroring the YAML schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub app: App,
    pub practicum: Practicum,
    pub telegram: Telegram,
}

/// Poll loop settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct App {
    pub retry_time_secs: u64,
    pub request_timeout_secs: u64,
    pub verify_bot_token: bool,
}

impl Default for App {
    fn default() -> Self {
        Self {
            retry_time_secs: 600,
            request_timeout_secs: 30,
            verify_bot_token: true,
        }
    }
}

/// Review API settings.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Practicum {
    pub endpoint: String,
    pub token: String,
}

impl Default for Practicum {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            token: String::new(),
        }
    }
}

impl fmt::Debug for Practicum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Practicum")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

/// Telegram bot settings.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Telegram {
    pub bot_token: String,
    pub chat_id: String,
}

impl fmt::Debug for Telegram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Telegram")
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

/// The three secrets the loop cannot start without. Immutable for the
/// process lifetime.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub practicum_token: String,
    pub bot_token: String,
    pub chat_id: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &"[REDACTED]")
            .field("bot_token", &"[REDACTED]")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl Config {
    pub fn retry_time(&self) -> Duration {
        Duration::from_secs(self.app.retry_time_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.app.request_timeout_secs)
    }

    pub fn endpoint(&self) -> Result<Url, ConfigError> {
        Url::parse(self.practicum.endpoint.trim())
            .map_err(|_| ConfigError::Invalid("practicum.endpoint must be a valid URL"))
    }

    /// Override credentials with whatever `lookup` yields for the well-known
    /// environment variable names. Blank values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        if let Some(token) = pick(ENV_PRACTICUM_TOKEN) {
            self.practicum.token = token;
        }
        if let Some(token) = pick(ENV_TELEGRAM_TOKEN) {
            self.telegram.bot_token = token;
        }
        if let Some(chat_id) = pick(ENV_TELEGRAM_CHAT_ID) {
            self.telegram.chat_id = chat_id;
        }
    }

    /// Extract the credentials, failing on the first empty one.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        let practicum_token = self.practicum.token.trim();
        let bot_token = self.telegram.bot_token.trim();
        let chat_id = self.telegram.chat_id.trim();
        if practicum_token.is_empty() {
            return Err(ConfigError::MissingCredential("practicum.token"));
        }
        if bot_token.is_empty() {
            return Err(ConfigError::MissingCredential("telegram.bot_token"));
        }
        if chat_id.is_empty() {
            return Err(ConfigError::MissingCredential("telegram.chat_id"));
        }
        Ok(Credentials {
            practicum_token: practicum_token.to_string(),
            bot_token: bot_token.to_string(),
            chat_id: chat_id.to_string(),
        })
    }

    /// True when a notification could still be delivered even though the
    /// review token is absent.
    pub fn can_notify(&self) -> bool {
        !self.telegram.bot_token.trim().is_empty() && !self.telegram.chat_id.trim().is_empty()
    }
}

/// Load configuration from a YAML file, overlay the process environment and
/// validate the settings. Credentials are checked separately by
/// [`Config::credentials`].
/// - If `path` is None, uses `config.yaml` in the current working directory.
/// - A missing file yields the defaults.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or_else(|| Path::new("config.yaml"));
    let mut cfg = if path.exists() {
        let content = fs::read_to_string(path)?;
        serde_yaml::from_str::<Config>(&content)?
    } else {
        Config::default()
    };
    cfg.apply_env(|name| std::env::var(name).ok());
    validate(&cfg)?;
    Ok(cfg)
}

/// Validate the non-secret settings.
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.app.retry_time_secs == 0 {
        return Err(ConfigError::Invalid("app.retry_time_secs must be > 0"));
    }
    if cfg.app.request_timeout_secs == 0 {
        return Err(ConfigError::Invalid("app.request_timeout_secs must be > 0"));
    }
    cfg.endpoint()?;
    Ok(())
}

/// Returns the example YAML shipped in the README.
pub fn example() -> &'static str {
    r#"app:
  retry_time_secs: 600
  request_timeout_secs: 30
  verify_bot_token: true

practicum:
  endpoint: "https://practicum.yandex.ru/api/user_api/homework_statuses/"
  token: "YOUR_PRACTICUM_OAUTH_TOKEN"

telegram:
  bot_token: "YOUR_TELEGRAM_BOT_TOKEN"
  chat_id: "123456789"
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn parse_example_ok() {
        let cfg: Config = serde_yaml::from_str(example()).unwrap();
        validate(&cfg).unwrap();
        let creds = cfg.credentials().unwrap();
        assert_eq!(creds.chat_id, "123456789");
        assert_eq!(cfg.retry_time(), Duration::from_secs(600));
    }

    #[test]
    fn empty_document_uses_defaults() {
        let cfg: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.practicum.endpoint, DEFAULT_ENDPOINT);
        assert!(cfg.app.verify_bot_token);
    }

    #[test]
    fn missing_credentials_are_reported_in_order() {
        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.practicum.token = "  ".into();
        match cfg.credentials().unwrap_err() {
            ConfigError::MissingCredential(name) => assert_eq!(name, "practicum.token"),
            other => panic!("wrong error: {other}"),
        }
        assert!(cfg.can_notify());

        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.telegram.bot_token = "".into();
        assert!(matches!(
            cfg.credentials(),
            Err(ConfigError::MissingCredential("telegram.bot_token"))
        ));
        assert!(!cfg.can_notify());

        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.telegram.chat_id = "".into();
        assert!(matches!(
            cfg.credentials(),
            Err(ConfigError::MissingCredential("telegram.chat_id"))
        ));
    }

    #[test]
    fn invalid_settings() {
        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.app.retry_time_secs = 0;
        match validate(&cfg).unwrap_err() {
            ConfigError::Invalid(msg) => assert!(msg.contains("retry_time_secs")),
            _ => panic!("wrong error"),
        }

        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.app.request_timeout_secs = 0;
        assert!(matches!(validate(&cfg), Err(ConfigError::Invalid(_))));

        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.practicum.endpoint = "not a url".into();
        match validate(&cfg).unwrap_err() {
            ConfigError::Invalid(msg) => assert!(msg.contains("endpoint")),
            _ => panic!("wrong error"),
        }
    }

    #[test]
    fn env_overrides_credentials() {
        let env: HashMap<&str, &str> = [
            (ENV_PRACTICUM_TOKEN, "pr-env"),
            (ENV_TELEGRAM_TOKEN, ""),
            (ENV_TELEGRAM_CHAT_ID, "@homework_channel"),
        ]
        .into_iter()
        .collect();
        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.apply_env(|name| env.get(name).map(|v| v.to_string()));
        assert_eq!(cfg.practicum.token, "pr-env");
        assert_eq!(cfg.telegram.bot_token, "YOUR_TELEGRAM_BOT_TOKEN");
        assert_eq!(cfg.telegram.chat_id, "@homework_channel");
    }

    #[test]
    fn debug_output_redacts_tokens() {
        let cfg: Config = serde_yaml::from_str(example()).unwrap();
        let rendered = format!("{:?} {:?}", cfg, cfg.credentials().unwrap());
        assert!(!rendered.contains("YOUR_PRACTICUM_OAUTH_TOKEN"));
        assert!(!rendered.contains("YOUR_TELEGRAM_BOT_TOKEN"));
        assert!(rendered.contains("123456789"));
    }

    #[test]
    fn load_from_file_ok() {
        let td = tempdir().unwrap();
        let p = td.path().join("config.yaml");
        fs::write(&p, "app:\n  retry_time_secs: 5\n").unwrap();
        let cfg = load(Some(&p)).unwrap();
        assert_eq!(cfg.app.retry_time_secs, 5);
        assert_eq!(cfg.app.request_timeout_secs, 30);
    }

    #[test]
    fn load_without_file_falls_back_to_defaults() {
        let td = tempdir().unwrap();
        let cfg = load(Some(&td.path().join("absent.yaml"))).unwrap();
        assert_eq!(cfg.app, App::default());
    }
}
