use std::{net::SocketAddr, time::Duration};

use anyhow::{anyhow, Context};
use prospere_core::constants::{
    PIX_COUNTDOWN_INTERVAL_MS, PIX_POLL_INTERVAL_MS, PIX_QUERY_TIMEOUT_MS,
};
use prospere_core::pix::PixSessionConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub pix_gateway_url: Option<String>,
    pub pix_api_key: Option<String>,
    pub pix_poll_interval: Duration,
    pub pix_countdown_interval: Duration,
    pub pix_query_timeout: Duration,
    pub log_format: LogFormat,
}

impl Config {
    /// Reads `PROSPERE_*` variables, after loading `.env` if present.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup. Unset keys take their defaults;
    /// set but unparsable keys are errors.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let listen_addr: SocketAddr = var("PROSPERE_LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid PROSPERE_LISTEN_ADDR")?;
        let cors_allow = var("PROSPERE_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let request_timeout = millis(
            var("PROSPERE_REQUEST_TIMEOUT_MS"),
            30_000,
            "PROSPERE_REQUEST_TIMEOUT_MS",
        )?;
        let pix_poll_interval = millis(
            var("PROSPERE_PIX_POLL_INTERVAL_MS"),
            PIX_POLL_INTERVAL_MS,
            "PROSPERE_PIX_POLL_INTERVAL_MS",
        )?;
        let pix_countdown_interval = millis(
            var("PROSPERE_PIX_COUNTDOWN_INTERVAL_MS"),
            PIX_COUNTDOWN_INTERVAL_MS,
            "PROSPERE_PIX_COUNTDOWN_INTERVAL_MS",
        )?;
        let pix_query_timeout = millis(
            var("PROSPERE_PIX_QUERY_TIMEOUT_MS"),
            PIX_QUERY_TIMEOUT_MS,
            "PROSPERE_PIX_QUERY_TIMEOUT_MS",
        )?;
        let log_format = match var("PROSPERE_LOG_FORMAT") {
            None => LogFormat::Text,
            Some(v) if v.eq_ignore_ascii_case("text") => LogFormat::Text,
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            Some(v) => return Err(anyhow!("Invalid PROSPERE_LOG_FORMAT '{}'", v)),
        };

        Ok(Self {
            listen_addr,
            cors_allow,
            request_timeout,
            pix_gateway_url: var("PROSPERE_PIX_GATEWAY_URL"),
            pix_api_key: var("PROSPERE_PIX_API_KEY"),
            pix_poll_interval,
            pix_countdown_interval,
            pix_query_timeout,
            log_format,
        })
    }

    pub fn pix_session_config(&self) -> PixSessionConfig {
        PixSessionConfig {
            poll_interval: self.pix_poll_interval,
            countdown_interval: self.pix_countdown_interval,
            query_timeout: self.pix_query_timeout,
        }
    }
}

fn millis(value: Option<String>, default: u64, key: &str) -> anyhow::Result<Duration> {
    let ms = match value {
        Some(v) => v
            .trim()
            .parse::<u64>()
            .with_context(|| format!("Invalid {}", key))?,
        None => default,
    };
    if ms == 0 {
        return Err(anyhow!("{} must be greater than zero", key));
    }
    Ok(Duration::from_millis(ms))
}
