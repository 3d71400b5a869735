use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Deadline for each scoring / question oracle call.
    pub llm_timeout: Duration,
    pub job_fetch_timeout: Duration,
    /// Upper bound on sending the analysis email.
    pub notify_timeout: Duration,
    /// How long finished analyses stay retrievable.
    pub result_ttl: Duration,
    pub email: Option<EmailConfig>,
    pub default_recipient: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub resend_api_key: String,
    pub from: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let email = match (optional_env("RESEND_API_KEY"), optional_env("NOTIFY_FROM_EMAIL")) {
            (Some(resend_api_key), Some(from)) => Some(EmailConfig {
                resend_api_key,
                from,
            }),
            _ => None,
        };

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            llm_timeout: Duration::from_secs(parse_env("LLM_TIMEOUT_SECS", 60)?),
            job_fetch_timeout: Duration::from_secs(parse_env("JOB_FETCH_TIMEOUT_SECS", 10)?),
            notify_timeout: Duration::from_secs(parse_env("NOTIFY_TIMEOUT_SECS", 10)?),
            result_ttl: Duration::from_secs(parse_env("RESULT_TTL_SECS", 3600)?),
            email,
            default_recipient: optional_env("NOTIFY_DEFAULT_RECIPIENT"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse::<T>()
        .with_context(|| format!("{key} must be a valid number, got '{raw}'"))
}
