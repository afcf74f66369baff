use anyhow::{bail, Context, Result};
use std::env;

/// Which inbound transport the process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    /// Long-poll the platform for updates.
    Polling,
    /// Receive updates over an HTTP webhook.
    Webhook,
}

#[derive(Clone)]
pub struct Config {
    pub bot_token: String,
    /// Public base URL for webhook registration (e.g. `https://bot.example.com`).
    /// If unset, webhook mode still serves but skips registration with a warning.
    pub webhook_host: Option<String>,
    pub port: u16,
    /// Optional shared secret echoed back by the platform in the
    /// `X-Telegram-Bot-Api-Secret-Token` header on every webhook delivery.
    pub webhook_secret_token: Option<String>,
    pub mode: TransportMode,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let bot_token =
            env::var("BOT_TOKEN").context("BOT_TOKEN environment variable is required")?;

        let webhook_host = env::var("WEBHOOK_HOST")
            .ok()
            .map(|s| s.trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .context("PORT must be a valid number")?;

        let webhook_secret_token = parse_secret_token(env::var("WEBHOOK_SECRET_TOKEN").ok());

        let mode = parse_transport_mode(env::var("KASSA_MODE").ok().as_deref())?;

        Ok(Config {
            bot_token,
            webhook_host,
            port,
            webhook_secret_token,
            mode,
        })
    }
}

/// Parse WEBHOOK_SECRET_TOKEN from an optional string value.
///
/// Returns None if the value is missing, empty, or contains only whitespace.
/// An empty secret would otherwise let every request through the check.
pub fn parse_secret_token(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Parse KASSA_MODE. Missing value defaults to polling.
pub fn parse_transport_mode(value: Option<&str>) -> Result<TransportMode> {
    match value {
        None => Ok(TransportMode::Polling),
        Some(s) => match s.trim().to_lowercase().as_str() {
            "" | "polling" => Ok(TransportMode::Polling),
            "webhook" => Ok(TransportMode::Webhook),
            other => bail!("KASSA_MODE must be 'polling' or 'webhook', got '{other}'"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_secret_token_none() {
        assert_eq!(parse_secret_token(None), None);
    }

    #[test]
    fn test_parse_secret_token_empty_or_whitespace() {
        // Empty and whitespace-only values are treated as unset.
        assert_eq!(parse_secret_token(Some("".to_string())), None);
        assert_eq!(parse_secret_token(Some("   ".to_string())), None);
        assert_eq!(parse_secret_token(Some("\t\n".to_string())), None);
    }

    #[test]
    fn test_parse_secret_token_valid() {
        assert_eq!(
            parse_secret_token(Some("secret-token".to_string())),
            Some("secret-token".to_string())
        );
    }

    #[test]
    fn test_parse_transport_mode_default_is_polling() {
        assert_eq!(parse_transport_mode(None).unwrap(), TransportMode::Polling);
        assert_eq!(
            parse_transport_mode(Some("")).unwrap(),
            TransportMode::Polling
        );
    }

    #[test]
    fn test_parse_transport_mode_values() {
        assert_eq!(
            parse_transport_mode(Some("polling")).unwrap(),
            TransportMode::Polling
        );
        assert_eq!(
            parse_transport_mode(Some("webhook")).unwrap(),
            TransportMode::Webhook
        );
        assert_eq!(
            parse_transport_mode(Some("Webhook")).unwrap(),
            TransportMode::Webhook,
            "mode should be case-insensitive"
        );
    }

    #[test]
    fn test_parse_transport_mode_rejects_unknown() {
        assert!(parse_transport_mode(Some("carrier-pigeon")).is_err());
    }
}
