//! Error types for the monitor crate.

use std::time::Duration;

use thiserror::Error;

/// Terminal failures of a monitor run.
///
/// Routine faults (an unreachable host mid-boot, a failed job query, a
/// rejected shutdown) are handled inside the loop; only conditions that end
/// the run early surface here.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The host never became reachable within the configured wait limit.
    #[error("host did not become reachable within {waited:?}")]
    WakeTimeout {
        /// How long the monitor waited before giving up.
        waited: Duration,
    },

    /// The configuration failed validation before the loop started.
    #[error("invalid monitor configuration: {0}")]
    Config(&'static str),
}
