//! Configuration module for the team roster service.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

/// Default artificial latency of a submission.
pub const DEFAULT_SUBMIT_DELAY_MS: u64 = 1000;
/// Default time the success indicator stays visible.
pub const DEFAULT_SUCCESS_BANNER_MS: u64 = 3000;
/// Default upper bound for an uploaded profile image.
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Error)]
#[error("Invalid {key} value {value:?}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

/// Timings and limits of one form session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormSettings {
    /// Simulated remote-call latency between validation and commit
    pub submit_delay: Duration,
    /// How long the success indicator stays up after a commit
    pub success_banner: Duration,
    /// Largest accepted profile image
    pub max_image_bytes: usize,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            submit_delay: Duration::from_millis(DEFAULT_SUBMIT_DELAY_MS),
            success_banner: Duration::from_millis(DEFAULT_SUCCESS_BANNER_MS),
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit JSON log lines instead of the human-readable format
    pub log_json: bool,
    pub form: FormSettings,
}

impl Config {
    /// Load configuration from environment variables, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let bind_addr = parse_or(&lookup, "ROSTER_BIND_ADDR", "127.0.0.1:8080".parse().ok())?;

        let log_level = lookup("ROSTER_LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let log_json = parse_or(&lookup, "ROSTER_LOG_JSON", Some(false))?;

        let submit_delay_ms = parse_or(
            &lookup,
            "ROSTER_SUBMIT_DELAY_MS",
            Some(DEFAULT_SUBMIT_DELAY_MS),
        )?;

        let success_banner_ms = parse_or(
            &lookup,
            "ROSTER_SUCCESS_BANNER_MS",
            Some(DEFAULT_SUCCESS_BANNER_MS),
        )?;

        let max_image_bytes = parse_or(
            &lookup,
            "ROSTER_MAX_IMAGE_BYTES",
            Some(DEFAULT_MAX_IMAGE_BYTES),
        )?;

        Ok(Self {
            bind_addr,
            log_level,
            log_json,
            form: FormSettings {
                submit_delay: Duration::from_millis(submit_delay_ms),
                success_banner: Duration::from_millis(success_banner_ms),
                max_image_bytes,
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: Option<T>) -> Result<T, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError {
            key,
            reason: e.to_string(),
            value,
        }),
        None => default.ok_or_else(|| ConfigError {
            key,
            value: String::new(),
            reason: "no value and no default".to_string(),
        }),
    }
}
