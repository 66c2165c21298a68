//! The wake→wait→monitor→shutdown control loop.

use std::time::Duration;

use powernap_core::Job;
use powernap_host::HostControl;
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info, warn};

use crate::config::MonitorConfig;
use crate::error::MonitorError;
use crate::idle::{IdleState, Observation, TickOutcome};
use crate::phase::MonitorPhase;

/// Outcome of a completed monitor run.
#[derive(Debug, Clone, Copy)]
pub struct MonitorReport {
    /// Whether the host acknowledged the shutdown request.
    pub shutdown_acknowledged: bool,
    /// Idle time accumulated when shutdown was requested.
    pub idle_at_shutdown: Duration,
}

/// Drives one host from wake to shutdown.
///
/// The monitor owns all run state (phase, idle accumulator, failure streak)
/// and talks to the host exclusively through [`HostControl`]. It is
/// single-threaded: one operation is in flight at a time, and the only
/// suspension points are the sleeps between polls, so dropping the `run`
/// future at a cancellation boundary leaves nothing half-mutated.
pub struct Monitor<H: HostControl> {
    host: H,
    config: MonitorConfig,
    phase: MonitorPhase,
    idle: IdleState,
    consecutive_failures: u32,
    shutdown_acknowledged: bool,
}

impl<H: HostControl> Monitor<H> {
    /// Create a monitor for `host`.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Config`] if the configuration fails
    /// validation.
    pub fn new(host: H, config: MonitorConfig) -> Result<Self, MonitorError> {
        config.validate()?;
        Ok(Self {
            host,
            config,
            phase: MonitorPhase::AwaitingWake,
            idle: IdleState::new(),
            consecutive_failures: 0,
            shutdown_acknowledged: false,
        })
    }

    /// The current phase.
    #[must_use]
    pub const fn phase(&self) -> MonitorPhase {
        self.phase
    }

    /// The host controller this monitor drives.
    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Run the loop to completion.
    ///
    /// Returns a [`MonitorReport`] once the shutdown attempt has been made,
    /// whether or not the host acknowledged it.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::WakeTimeout`] if the host never becomes
    /// reachable within the configured wait limit.
    pub async fn run(&mut self) -> Result<MonitorReport, MonitorError> {
        loop {
            match self.phase {
                MonitorPhase::AwaitingWake => self.await_wake().await,
                MonitorPhase::AwaitingReachable => self.await_reachable().await?,
                MonitorPhase::Monitoring => self.monitor_tick().await,
                MonitorPhase::ShuttingDown => self.shut_down().await,
                MonitorPhase::Terminated => {
                    return Ok(MonitorReport {
                        shutdown_acknowledged: self.shutdown_acknowledged,
                        idle_at_shutdown: self.idle.accumulated(),
                    });
                }
            }
        }
    }

    /// Initial probe: skip the wake entirely if the host already answers.
    async fn await_wake(&mut self) {
        if self.host.probe_reachable().await {
            info!("Host is already up");
            self.enter_monitoring();
            return;
        }

        info!("Host is down, waking it up");
        if let Err(e) = self.host.wake().await {
            // The host may still be booting from an earlier trigger, so a
            // failed send is not fatal; the reachability wait decides.
            warn!(error = %e, "Failed to send magic packet");
        }
        self.transition(MonitorPhase::AwaitingReachable);
        sleep(self.config.wake_grace).await;
    }

    /// Probe until the management API answers or the wait limit expires.
    async fn await_reachable(&mut self) -> Result<(), MonitorError> {
        let deadline = Instant::now() + self.config.reachable_wait_limit;

        loop {
            if self.host.probe_reachable().await {
                self.enter_monitoring();
                return Ok(());
            }
            if Instant::now() >= deadline {
                error!(
                    waited_secs = self.config.reachable_wait_limit.as_secs(),
                    "Host never became reachable, giving up"
                );
                return Err(MonitorError::WakeTimeout {
                    waited: self.config.reachable_wait_limit,
                });
            }
            info!("Waiting for host to come online");
            sleep(self.config.reachable_poll_interval).await;
        }
    }

    /// One Monitoring tick: query the job queue and fold the result into the
    /// idle accumulator.
    async fn monitor_tick(&mut self) {
        let observation = match self.host.list_active_work().await {
            Ok(jobs) => {
                self.consecutive_failures = 0;
                self.observe_jobs(&jobs)
            }
            Err(e) => {
                self.consecutive_failures += 1;
                if e.is_auth() {
                    error!(
                        error = %e,
                        failures = self.consecutive_failures,
                        "Job query rejected, check the API credential"
                    );
                } else {
                    warn!(
                        error = %e,
                        failures = self.consecutive_failures,
                        "Job query failed, idle timer held"
                    );
                }
                if self.consecutive_failures >= self.config.max_consecutive_query_failures {
                    warn!(
                        limit = self.config.max_consecutive_query_failures,
                        "Too many consecutive query failures, treating host as unreachable"
                    );
                    self.consecutive_failures = 0;
                    self.transition(MonitorPhase::AwaitingReachable);
                    return;
                }
                Observation::Unknown
            }
        };

        match self.idle.apply(observation, self.config.poll_interval) {
            TickOutcome::Reset { active } => {
                info!(active, "Observing running jobs, resetting idle timer");
            }
            TickOutcome::Advanced { idle } => {
                info!(idle_secs = idle.as_secs(), "No jobs running");
                if idle >= self.config.idle_threshold {
                    info!(
                        threshold_secs = self.config.idle_threshold.as_secs(),
                        "Idle threshold reached, shutting down host"
                    );
                    self.transition(MonitorPhase::ShuttingDown);
                    return;
                }
            }
            TickOutcome::Held => {}
        }

        sleep(self.config.poll_interval).await;
    }

    /// Classify a job list, applying the method exclusion filter.
    fn observe_jobs(&self, jobs: &[Job]) -> Observation {
        let active = jobs
            .iter()
            .filter(|job| !self.config.excluded_methods.contains(&job.method))
            .count();
        let excluded = jobs.len() - active;
        if excluded > 0 {
            debug!(excluded, "Ignoring jobs with excluded methods");
        }
        if active == 0 {
            Observation::Empty
        } else {
            Observation::Active(active)
        }
    }

    /// One best-effort shutdown request; the run terminates either way.
    async fn shut_down(&mut self) {
        match self.host.request_shutdown().await {
            Ok(()) => {
                info!("Shutdown command sent successfully");
                self.shutdown_acknowledged = true;
            }
            Err(e) => {
                error!(error = %e, "Shutdown request failed, host left running");
            }
        }
        self.transition(MonitorPhase::Terminated);
    }

    /// Enter Monitoring with a fresh idle accumulator.
    fn enter_monitoring(&mut self) {
        self.idle.reset();
        self.consecutive_failures = 0;
        info!(
            interval_secs = self.config.poll_interval.as_secs(),
            threshold_secs = self.config.idle_threshold.as_secs(),
            "Host is online, monitoring jobs"
        );
        self.transition(MonitorPhase::Monitoring);
    }

    fn transition(&mut self, to: MonitorPhase) {
        debug_assert!(
            MonitorPhase::is_valid_transition(self.phase, to),
            "illegal phase transition {} -> {}",
            self.phase,
            to
        );
        debug!(from = %self.phase, to = %to, "Phase transition");
        self.phase = to;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use powernap_host::mock::{running_job, MockHost};
    use powernap_host::{QueryError, ShutdownError};

    /// Short intervals so scenario math stays readable; tokio time is paused
    /// in these tests, so wall-clock duration is irrelevant anyway.
    fn config(poll_secs: u64, threshold_secs: u64) -> MonitorConfig {
        MonitorConfig {
            poll_interval: Duration::from_secs(poll_secs),
            idle_threshold: Duration::from_secs(threshold_secs),
            reachable_poll_interval: Duration::from_secs(10),
            wake_grace: Duration::from_secs(30),
            reachable_wait_limit: Duration::from_secs(60),
            max_consecutive_query_failures: 5,
            excluded_methods: Vec::new(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn already_up_host_is_never_woken() {
        let host = MockHost::new();
        host.push_probes([true]);

        let mut monitor = Monitor::new(host, config(60, 120)).unwrap();
        let report = monitor.run().await.unwrap();

        assert!(report.shutdown_acknowledged);
        assert_eq!(monitor.host().wake_calls(), 0);
        assert_eq!(monitor.host().probe_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn two_empty_ticks_reach_threshold() {
        let host = MockHost::new();

        let mut monitor = Monitor::new(host, config(60, 120)).unwrap();
        let report = monitor.run().await.unwrap();

        assert!(report.shutdown_acknowledged);
        assert_eq!(report.idle_at_shutdown, Duration::from_secs(120));
        assert_eq!(monitor.host().query_calls(), 2);
        assert_eq!(monitor.host().shutdown_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn active_work_resets_the_timer() {
        let host = MockHost::new();
        // [empty, active, empty, empty] with interval 60 and threshold 120:
        // accumulated goes 60, 0, 60, 120 and shutdown fires on the 4th tick.
        host.push_work(Ok(Vec::new()));
        host.push_jobs(vec![running_job(7, "pool.scrub.scrub")]);
        host.push_work(Ok(Vec::new()));
        host.push_work(Ok(Vec::new()));

        let mut monitor = Monitor::new(host, config(60, 120)).unwrap();
        let report = monitor.run().await.unwrap();

        assert_eq!(report.idle_at_shutdown, Duration::from_secs(120));
        assert_eq!(monitor.host().query_calls(), 4);
        assert_eq!(monitor.host().shutdown_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_query_neither_advances_nor_resets() {
        let host = MockHost::new();
        host.push_work(Ok(Vec::new()));
        host.push_work(Err(QueryError::Api { status: 500 }));
        host.push_work(Ok(Vec::new()));

        let mut monitor = Monitor::new(host, config(60, 120)).unwrap();
        let report = monitor.run().await.unwrap();

        // 60 idle, held, 120 idle: shutdown on the third query.
        assert_eq!(report.idle_at_shutdown, Duration::from_secs(120));
        assert_eq!(monitor.host().query_calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn wake_path_probes_until_reachable() {
        let host = MockHost::new();
        // Down at the initial check, then two failed boot probes before the
        // host comes up.
        host.push_probes([false, false, false, true]);

        let mut monitor = Monitor::new(host, config(60, 60)).unwrap();
        let report = monitor.run().await.unwrap();

        assert!(report.shutdown_acknowledged);
        assert_eq!(monitor.host().wake_calls(), 1);
        assert_eq!(monitor.host().probe_calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn wake_timeout_when_host_never_appears() {
        let host = MockHost::new();
        host.push_probes(std::iter::repeat(false).take(32));

        let mut monitor = Monitor::new(host, config(60, 60)).unwrap();
        let err = monitor.run().await.unwrap_err();

        assert!(matches!(err, MonitorError::WakeTimeout { .. }));
        assert_eq!(monitor.host().shutdown_calls(), 0);
        assert_eq!(monitor.host().query_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_query_failures_return_to_probing() {
        let host = MockHost::new();
        host.push_probes([true]); // initial check: host up
        host.push_work(Err(QueryError::Api { status: 500 }));
        host.push_work(Err(QueryError::Api { status: 500 }));
        // After the reset: default probe (true) re-enters Monitoring and the
        // default empty work list runs the idle timer out.

        let mut config = config(60, 60);
        config.max_consecutive_query_failures = 2;

        let mut monitor = Monitor::new(host, config).unwrap();
        let report = monitor.run().await.unwrap();

        assert!(report.shutdown_acknowledged);
        // One probe up front, one after the failure escalation.
        assert_eq!(monitor.host().probe_calls(), 2);
        assert_eq!(monitor.host().query_calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_failure_still_terminates() {
        let host = MockHost::new();
        host.push_shutdown(Err(ShutdownError::Rejected { status: 503 }));

        let mut monitor = Monitor::new(host, config(60, 60)).unwrap();
        let report = monitor.run().await.unwrap();

        assert!(!report.shutdown_acknowledged);
        assert_eq!(monitor.host().shutdown_calls(), 1);
        assert!(monitor.phase().is_terminal());
    }

    #[tokio::test(start_paused = true)]
    async fn excluded_methods_do_not_count_as_work() {
        let host = MockHost::new();
        // Only an excluded housekeeping job is running; it must not pin the
        // idle timer at zero.
        host.push_jobs(vec![running_job(1, "catalog.sync")]);
        // A mixed tick still counts the non-excluded job as active.
        host.push_jobs(vec![
            running_job(1, "catalog.sync"),
            running_job(2, "replication.run"),
        ]);

        let mut config = config(60, 120);
        config.excluded_methods = vec!["catalog.sync".to_string()];

        let mut monitor = Monitor::new(host, config).unwrap();
        let report = monitor.run().await.unwrap();

        // Tick 1: excluded only -> 60. Tick 2: active -> 0. Then default
        // empty ticks 3 and 4 run it up to the 120 threshold.
        assert_eq!(report.idle_at_shutdown, Duration::from_secs(120));
        assert_eq!(monitor.host().query_calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_config_rejected_before_the_loop() {
        let mut bad = config(60, 60);
        bad.poll_interval = Duration::ZERO;
        assert!(Monitor::new(MockHost::new(), bad).is_err());
    }
}
