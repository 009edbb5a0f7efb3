//! `resv simulate` – run an acquisition against the simulated provider.

use std::time::Duration;

use anyhow::Result;
use clap::Args;
use tokio_util::sync::CancellationToken;

use resv_core::config::ResvConfig;
use resv_core::request::{ReservationRequest, Tenancy};
use resv_core::retry::{acquire, RetryPolicy};
use resv_core::sim::SimulatedProvider;

use crate::cli::render;

/// Flags override the config file; anything not given falls back to
/// `[request]`/`[retry]` in config.toml, then to built-in defaults.
#[derive(Debug, Args)]
pub struct SimulateArgs {
    /// Compute shape to reserve, e.g. "m5.xlarge".
    #[arg(long)]
    pub instance_type: Option<String>,

    /// OS platform, e.g. "Linux/UNIX".
    #[arg(long)]
    pub platform: Option<String>,

    /// Placement zone, e.g. "us-east-1a".
    #[arg(long)]
    pub availability_zone: Option<String>,

    /// Shared or dedicated hardware.
    #[arg(long, value_enum)]
    pub tenancy: Option<TenancyArg>,

    /// Number of instances to reserve capacity for.
    #[arg(long)]
    pub instance_count: Option<u32>,

    /// Total retry budget in minutes.
    #[arg(long, value_name = "MINUTES")]
    pub max_duration_minutes: Option<u64>,

    /// Delay before the second attempt, in seconds.
    #[arg(long, value_name = "SECONDS")]
    pub initial_interval_secs: Option<u64>,

    /// Upper bound on any backoff delay, in seconds.
    #[arg(long, value_name = "SECONDS")]
    pub max_interval_secs: Option<u64>,

    /// Backoff growth factor.
    #[arg(long)]
    pub backoff_multiplier: Option<f64>,

    /// How many attempts the simulated provider rejects before allocating.
    #[arg(long, default_value = "3")]
    pub failures: u32,

    /// Print the result as JSON instead of console lines.
    #[arg(long)]
    pub json: bool,
}

/// clap-facing tenancy values; mapped onto the core enum.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum TenancyArg {
    Default,
    Dedicated,
}

impl From<TenancyArg> for Tenancy {
    fn from(t: TenancyArg) -> Self {
        match t {
            TenancyArg::Default => Tenancy::Default,
            TenancyArg::Dedicated => Tenancy::Dedicated,
        }
    }
}

impl SimulateArgs {
    fn request(&self, cfg: &ResvConfig) -> ReservationRequest {
        let mut req = cfg.default_request();
        if let Some(t) = &self.instance_type {
            req.instance_type = t.clone();
        }
        if let Some(p) = &self.platform {
            req.platform = p.clone();
        }
        if let Some(z) = &self.availability_zone {
            req.availability_zone = z.clone();
        }
        if let Some(t) = self.tenancy {
            req.tenancy = t.into();
        }
        if let Some(n) = self.instance_count {
            req.instance_count = n;
        }
        req
    }

    fn policy(&self, cfg: &ResvConfig) -> RetryPolicy {
        let mut policy = cfg.retry_policy();
        if let Some(m) = self.max_duration_minutes {
            policy.max_duration = Duration::from_secs(m * 60);
        }
        if let Some(s) = self.initial_interval_secs {
            policy.initial_interval = Duration::from_secs(s);
        }
        if let Some(s) = self.max_interval_secs {
            policy.max_interval = Duration::from_secs(s);
        }
        if let Some(b) = self.backoff_multiplier {
            policy.backoff_multiplier = b;
        }
        policy
    }
}

pub async fn run_simulate(cfg: &ResvConfig, args: SimulateArgs) -> Result<()> {
    let request = args.request(cfg);
    let policy = args.policy(cfg);

    if !args.json {
        println!(
            "Starting capacity reservation simulation for {} in {}...",
            request.instance_type, request.availability_zone
        );
    }

    // Ctrl-C aborts the retry session cleanly; the result still reports
    // attempts and elapsed time.
    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_token.cancel();
        }
    });

    let mut provider = SimulatedProvider::contended(args.failures);
    let result = acquire(&request, &policy, &mut provider, Some(&cancel)).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&render::to_json(&result))?);
    } else {
        render::print_console(&result);
    }

    Ok(())
}
