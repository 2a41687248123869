// File: macrofeed-core/src/config.rs

use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(5000);

pub const ENV_API_URL: &str = "MACROFEED_API_URL";
pub const ENV_REFRESH_MS: &str = "MACROFEED_REFRESH_MS";

/// Toast lifecycle: hidden for `enter_delay`, shown for `visible`, then
/// removed after `exit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastTiming {
    pub enter_delay: Duration,
    pub visible: Duration,
    pub exit: Duration,
}

impl Default for ToastTiming {
    fn default() -> Self {
        Self {
            enter_delay: Duration::from_millis(10),
            visible: Duration::from_millis(3000),
            exit: Duration::from_millis(300),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub api_url: String,
    pub refresh_interval: Duration,
    /// When set, the HTML dashboard is rewritten here after every render.
    pub html_out: Option<PathBuf>,
    pub toast: ToastTiming,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            html_out: None,
            toast: ToastTiming::default(),
        }
    }
}

impl DashboardConfig {
    /// Defaults, overridden by `.env` / process environment.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but with an arbitrary key lookup.
    /// Unparseable values are ignored with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
            cfg.api_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_REFRESH_MS) {
            match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => cfg.refresh_interval = Duration::from_millis(ms),
                _ => warn!("Ignoring {}='{}': expected a positive number of milliseconds", ENV_REFRESH_MS, raw),
            }
        }
        cfg
    }

    pub fn validate(&self) -> Result<(), Error> {
        let parsed = url::Url::parse(&self.api_url)?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(Error::Config(format!(
                "API URL must be http(s), got '{}'",
                self.api_url
            )));
        }
        if self.refresh_interval.is_zero() {
            return Err(Error::Config("refresh interval must be positive".into()));
        }
        Ok(())
    }
}
