//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::time::Duration;

use taxbot_playback::domain::timing::PlaybackTiming;

use crate::error::AppError;

/// Runtime configuration for the API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Interface to bind (`HOST`, default `0.0.0.0`).
    pub host: String,
    /// Port to bind (`PORT`, default `3000`).
    pub port: u16,
    /// Playback timing, with any `TAXBOT_*_MS` overrides applied.
    pub timing: PlaybackTiming,
}

impl AppConfig {
    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which returns a variable's value
    /// if it is set.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?,
            None => 3000,
        };

        let defaults = PlaybackTiming::default();
        let timing = PlaybackTiming {
            reply_delay: millis(&lookup, "TAXBOT_REPLY_DELAY_MS", defaults.reply_delay)?,
            word_interval: millis(&lookup, "TAXBOT_WORD_INTERVAL_MS", defaults.word_interval)?,
            min_typing: millis(&lookup, "TAXBOT_MIN_TYPING_MS", defaults.min_typing)?,
            min_theme_transition: millis(
                &lookup,
                "TAXBOT_MIN_THEME_TRANSITION_MS",
                defaults.min_theme_transition,
            )?,
            ..defaults
        };
        if timing.word_interval.is_zero() {
            return Err(AppError::Config(
                "TAXBOT_WORD_INTERVAL_MS must be greater than zero".to_string(),
            ));
        }

        Ok(Self { host, port, timing })
    }

    /// The address to bind.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `host:port` is not a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}

fn millis(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> Result<Duration, AppError> {
    match lookup(key) {
        Some(raw) => raw
            .parse()
            .map(Duration::from_millis)
            .map_err(|e| {
                AppError::Config(format!("{key} must be a whole number of milliseconds: {e}"))
            }),
        None => Ok(default),
    }
}
