//! `resv show-config` – print the effective configuration.

use anyhow::Result;
use resv_core::config::{self, ResvConfig};

pub fn run_show_config(cfg: &ResvConfig) -> Result<()> {
    let path = config::config_path()?;
    println!("config file: {}", path.display());

    let policy = cfg.retry_policy();
    println!(
        "retry: budget {}s, interval {}s..{}s, multiplier {}",
        policy.max_duration.as_secs(),
        policy.initial_interval.as_secs(),
        policy.max_interval.as_secs(),
        policy.backoff_multiplier
    );

    let req = cfg.default_request();
    println!(
        "request: {} x{} ({}) in {}, tenancy {}, {} match",
        req.instance_type,
        req.instance_count,
        req.platform,
        req.availability_zone,
        req.tenancy,
        req.match_criteria
    );
    Ok(())
}
