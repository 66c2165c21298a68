//! powernap - wake a host, watch its jobs, power it down when idle.
//!
//! This is the entry point for the `powernap` binary. It parses
//! configuration, sets up logging, and runs one monitor to completion.
//!
//! # Exit codes
//!
//! - `0` - shutdown requested and acknowledged by the host
//! - `2` - shutdown requested but not acknowledged
//! - `3` - host never became reachable after the wake
//! - `130` - interrupted by the operator
//!
//! Malformed configuration (bad MAC, bad address, zero intervals) exits
//! non-zero before the loop starts.

mod logging;

use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use powernap_core::{HostIdentity, MacAddr};
use powernap_host::ApiHost;
use powernap_monitor::{Monitor, MonitorConfig, MonitorError};

/// Monitor a host's running jobs and shut it down when idle.
#[derive(Parser, Debug)]
#[command(name = "powernap")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Host IP address or hostname.
    #[arg(long)]
    address: String,

    /// Host MAC address, `xx:xx:xx:xx:xx:xx`.
    #[arg(long)]
    mac: String,

    /// Management API bearer token.
    #[arg(long, env = "POWERNAP_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Job poll interval in seconds.
    #[arg(long, default_value_t = 60)]
    interval: u64,

    /// Continuous idle seconds required before shutdown.
    #[arg(long, default_value_t = 3600)]
    threshold: u64,

    /// Seconds to wait after the wake packet before the first boot probe.
    #[arg(long, default_value_t = 30)]
    wake_grace: u64,

    /// Boot probe interval in seconds.
    #[arg(long, default_value_t = 10)]
    reachable_interval: u64,

    /// Longest wait in seconds for the host to come online before giving up.
    #[arg(long, default_value_t = 300)]
    reachable_limit: u64,

    /// Consecutive failed job queries before the host is assumed down.
    #[arg(long, default_value_t = 5)]
    max_query_failures: u32,

    /// Job method that never counts as active work. Repeatable.
    #[arg(long = "exclude-method", value_name = "METHOD")]
    exclude_method: Vec<String>,

    /// Broadcast address for the magic packet, when the default limited
    /// broadcast does not reach the host's segment.
    #[arg(long)]
    broadcast: Option<Ipv4Addr>,

    /// Log file path; logs go to stderr if unset.
    #[arg(long)]
    log: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(long, default_value = "false")]
    debug: bool,
}

impl Args {
    fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            poll_interval: Duration::from_secs(self.interval),
            idle_threshold: Duration::from_secs(self.threshold),
            reachable_poll_interval: Duration::from_secs(self.reachable_interval),
            wake_grace: Duration::from_secs(self.wake_grace),
            reachable_wait_limit: Duration::from_secs(self.reachable_limit),
            max_consecutive_query_failures: self.max_query_failures,
            excluded_methods: self.exclude_method.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            // The subscriber may not be up yet when startup config fails.
            eprintln!("powernap: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<ExitCode> {
    let _guard = logging::init(args.debug, args.log.as_deref())?;

    let mac: MacAddr = args.mac.parse().context("invalid --mac")?;
    let identity = HostIdentity::new(args.address.clone(), mac, args.api_key.clone())
        .context("invalid --address")?;

    tracing::info!(
        host = %identity.address(),
        mac = %identity.mac(),
        interval_secs = args.interval,
        threshold_secs = args.threshold,
        "Starting powernap monitor"
    );

    let mut host = ApiHost::new(identity);
    if let Some(broadcast) = args.broadcast {
        host = host.with_broadcast(broadcast);
    }

    let mut monitor = Monitor::new(host, args.monitor_config())?;

    tokio::select! {
        result = monitor.run() => match result {
            Ok(report) if report.shutdown_acknowledged => {
                tracing::info!(
                    idle_secs = report.idle_at_shutdown.as_secs(),
                    "Host shutdown requested, exiting"
                );
                Ok(ExitCode::SUCCESS)
            }
            Ok(_) => {
                tracing::error!("Host did not acknowledge the shutdown request");
                Ok(ExitCode::from(2))
            }
            Err(e @ MonitorError::WakeTimeout { .. }) => {
                tracing::error!(error = %e, "Giving up on this host");
                Ok(ExitCode::from(3))
            }
            Err(e) => Err(e.into()),
        },
        () = shutdown_signal() => {
            tracing::info!("Interrupted, leaving the host as it is");
            Ok(ExitCode::from(130))
        }
    }
}

/// Resolves when the operator asks the monitor to stop.
async fn shutdown_signal() {
    // An interrupted ctrl_c listener means signals cannot be observed at
    // all; treat that as a stop request rather than running uninterruptible.
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for interrupt signal");
    }
}
