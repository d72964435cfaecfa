use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::interview::ClassifierConfig;
use crate::notifications::NotificationConfig;
use crate::scoring::ScoringConfig;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub worker_id: String,
    pub scoring: ScoringConfig,
    pub classifier: ClassifierConfig,
    pub notifications: NotificationConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let scoring = ScoringConfig {
            default_threshold: parse_env("QUALIFICATION_THRESHOLD", 40.0)?,
            timeout: Duration::from_secs(parse_env("SCORING_TIMEOUT_SECS", 90)?),
        };

        let classifier = ClassifierConfig {
            timeout: Duration::from_millis(parse_env("INTERVIEW_CLASSIFIER_TIMEOUT_MS", 8000)?),
            remote_enabled: parse_env("INTERVIEW_CLASSIFIER_REMOTE", true)?,
        };

        let notifications = NotificationConfig {
            delay: Duration::from_secs(parse_env("NOTIFY_DELAY_SECS", 300)?),
            poll_interval: Duration::from_secs(parse_env("NOTIFY_POLL_INTERVAL_SECS", 5)?),
            stale_claim_after: Duration::from_secs(parse_env("NOTIFY_STALE_CLAIM_SECS", 600)?),
            webhook_url: require_env("NOTIFY_WEBHOOK_URL")?,
            sender_name: optional_env("NOTIFY_SENDER_NAME"),
            sender_title: optional_env("NOTIFY_SENDER_TITLE"),
            sender_designation: optional_env("NOTIFY_SENDER_DESIGNATION"),
            meeting_link: optional_env("NOTIFY_MEETING_LINK"),
        };

        if !(0.0..=100.0).contains(&scoring.default_threshold) {
            anyhow::bail!("QUALIFICATION_THRESHOLD must be between 0 and 100");
        }

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            worker_id: std::env::var("WORKER_ID")
                .unwrap_or_else(|_| format!("worker-{}", uuid::Uuid::new_v4())),
            scoring,
            classifier,
            notifications,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parses an optional variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: '{raw}'")),
        Err(_) => Ok(default),
    }
}
