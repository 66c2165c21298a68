//! Monitor configuration.

use std::time::Duration;

use crate::error::MonitorError;

/// Tunables for one monitor run.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// How often the job queue is polled while Monitoring.
    pub poll_interval: Duration,
    /// Continuous zero-work time required before shutdown is requested.
    pub idle_threshold: Duration,
    /// How often reachability is probed while waiting for boot.
    pub reachable_poll_interval: Duration,
    /// Pause after sending the magic packet before the first boot probe;
    /// firmware and POST take a while before the NIC answers anything.
    pub wake_grace: Duration,
    /// Longest the monitor will wait for the host to become reachable before
    /// giving up with [`MonitorError::WakeTimeout`].
    pub reachable_wait_limit: Duration,
    /// Consecutive failed job queries after which the host is assumed
    /// unreachable and the monitor returns to probing.
    pub max_consecutive_query_failures: u32,
    /// Job methods that never count as active work, e.g. housekeeping jobs
    /// that run right after boot and would otherwise pin the idle timer at
    /// zero forever.
    pub excluded_methods: Vec<String>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(60),
            idle_threshold: Duration::from_secs(3600),
            reachable_poll_interval: Duration::from_secs(10),
            wake_grace: Duration::from_secs(30),
            reachable_wait_limit: Duration::from_secs(300),
            max_consecutive_query_failures: 5,
            excluded_methods: Vec::new(),
        }
    }
}

impl MonitorConfig {
    /// Validate the configuration before a run starts.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Config`] for zero intervals or thresholds, a
    /// wait limit shorter than one probe interval, or a zero failure limit.
    pub fn validate(&self) -> Result<(), MonitorError> {
        if self.poll_interval.is_zero() {
            return Err(MonitorError::Config("poll interval must be non-zero"));
        }
        if self.idle_threshold.is_zero() {
            return Err(MonitorError::Config("idle threshold must be non-zero"));
        }
        if self.reachable_poll_interval.is_zero() {
            return Err(MonitorError::Config(
                "reachability probe interval must be non-zero",
            ));
        }
        if self.reachable_wait_limit < self.reachable_poll_interval {
            return Err(MonitorError::Config(
                "reachability wait limit is shorter than one probe interval",
            ));
        }
        if self.max_consecutive_query_failures == 0 {
            return Err(MonitorError::Config(
                "query failure limit must be at least 1",
            ));
        }
        Ok(())
    }
}
