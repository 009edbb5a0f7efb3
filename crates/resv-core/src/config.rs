use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::request::{EndDateType, MatchCriteria, ReservationRequest, Tenancy};
use crate::retry::RetryPolicy;

/// Retry tuning (optional `[retry]` section in config.toml). Field names
/// follow the provider convention: the overall budget is in minutes, the
/// per-wait bounds in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total wall-clock budget for all attempts, in minutes.
    pub max_duration_minutes: u64,
    /// Delay before the second attempt, in seconds.
    pub initial_interval_secs: u64,
    /// Upper bound on any backoff delay, in seconds.
    pub max_interval_secs: u64,
    /// Growth factor applied after each failed attempt.
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_duration_minutes: 60,
            initial_interval_secs: 30,
            max_interval_secs: 300,
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Convert to engine durations. Validation happens in `acquire`, not here.
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_duration: Duration::from_secs(self.max_duration_minutes * 60),
            initial_interval: Duration::from_secs(self.initial_interval_secs),
            max_interval: Duration::from_secs(self.max_interval_secs),
            backoff_multiplier: self.backoff_multiplier,
        }
    }
}

/// Default reservation parameters (optional `[request]` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestConfig {
    pub instance_type: String,
    pub platform: String,
    pub availability_zone: String,
    #[serde(default)]
    pub tenancy: Tenancy,
    pub instance_count: u32,
    #[serde(default)]
    pub match_criteria: MatchCriteria,
    #[serde(default)]
    pub end_date_type: EndDateType,
}

impl Default for RequestConfig {
    fn default() -> Self {
        let req = ReservationRequest::default();
        Self {
            instance_type: req.instance_type,
            platform: req.platform,
            availability_zone: req.availability_zone,
            tenancy: req.tenancy,
            instance_count: req.instance_count,
            match_criteria: req.match_criteria,
            end_date_type: req.end_date_type,
        }
    }
}

impl RequestConfig {
    pub fn to_request(&self) -> ReservationRequest {
        ReservationRequest {
            instance_type: self.instance_type.clone(),
            platform: self.platform.clone(),
            availability_zone: self.availability_zone.clone(),
            tenancy: self.tenancy,
            instance_count: self.instance_count,
            match_criteria: self.match_criteria,
            end_date_type: self.end_date_type,
        }
    }
}

/// Global configuration loaded from `~/.config/resv/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResvConfig {
    /// Retry tuning; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
    /// Default reservation parameters; CLI flags override these.
    #[serde(default)]
    pub request: Option<RequestConfig>,
}

impl ResvConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.clone().unwrap_or_default().to_policy()
    }

    pub fn default_request(&self) -> ReservationRequest {
        self.request
            .clone()
            .map(|r| r.to_request())
            .unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("resv")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ResvConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ResvConfig {
            retry: Some(RetryConfig::default()),
            request: Some(RequestConfig::default()),
        };
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: ResvConfig = toml::from_str(&data)?;
    Ok(cfg)
}
