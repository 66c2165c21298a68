//! A scripted in-memory host for testing the monitor without a network.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use powernap_core::Job;

use crate::control::HostControl;
use crate::error::{QueryError, ShutdownError, WakeError};

/// A mock host whose responses are scripted per call.
///
/// Each operation pops the next scripted response from its queue; once a
/// queue runs dry the operation falls back to a steady state (reachable,
/// no work, shutdown acknowledged). Call counters let tests assert how often
/// the monitor drove each operation.
#[derive(Default)]
pub struct MockHost {
    probes: Mutex<VecDeque<bool>>,
    work: Mutex<VecDeque<Result<Vec<Job>, QueryError>>>,
    shutdowns: Mutex<VecDeque<Result<(), ShutdownError>>>,
    wake_calls: Mutex<u32>,
    probe_calls: Mutex<u32>,
    query_calls: Mutex<u32>,
    shutdown_calls: Mutex<u32>,
}

impl MockHost {
    /// Create a mock host with empty scripts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the results of upcoming reachability probes, in order.
    pub fn push_probes(&self, results: impl IntoIterator<Item = bool>) {
        self.probes.lock().extend(results);
    }

    /// Script the result of one upcoming work query.
    pub fn push_work(&self, result: Result<Vec<Job>, QueryError>) {
        self.work.lock().push_back(result);
    }

    /// Script one upcoming work query returning the given jobs.
    pub fn push_jobs(&self, jobs: Vec<Job>) {
        self.push_work(Ok(jobs));
    }

    /// Script the result of one upcoming shutdown request.
    pub fn push_shutdown(&self, result: Result<(), ShutdownError>) {
        self.shutdowns.lock().push_back(result);
    }

    /// Number of wake packets "sent".
    #[must_use]
    pub fn wake_calls(&self) -> u32 {
        *self.wake_calls.lock()
    }

    /// Number of reachability probes performed.
    #[must_use]
    pub fn probe_calls(&self) -> u32 {
        *self.probe_calls.lock()
    }

    /// Number of work queries performed.
    #[must_use]
    pub fn query_calls(&self) -> u32 {
        *self.query_calls.lock()
    }

    /// Number of shutdown requests performed.
    #[must_use]
    pub fn shutdown_calls(&self) -> u32 {
        *self.shutdown_calls.lock()
    }
}

/// Build a running job for test scripts.
#[must_use]
pub fn running_job(id: i64, method: &str) -> Job {
    Job {
        id,
        method: method.to_string(),
        state: "RUNNING".to_string(),
        progress: None,
    }
}

#[async_trait]
impl HostControl for MockHost {
    async fn wake(&self) -> Result<(), WakeError> {
        *self.wake_calls.lock() += 1;
        Ok(())
    }

    async fn probe_reachable(&self) -> bool {
        *self.probe_calls.lock() += 1;
        self.probes.lock().pop_front().unwrap_or(true)
    }

    async fn list_active_work(&self) -> Result<Vec<Job>, QueryError> {
        *self.query_calls.lock() += 1;
        self.work.lock().pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn request_shutdown(&self) -> Result<(), ShutdownError> {
        *self.shutdown_calls.lock() += 1;
        self.shutdowns.lock().pop_front().unwrap_or(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_probes_then_steady_state() {
        let host = MockHost::new();
        host.push_probes([false, false]);

        assert!(!host.probe_reachable().await);
        assert!(!host.probe_reachable().await);
        // Script exhausted: reachable from here on.
        assert!(host.probe_reachable().await);
        assert_eq!(host.probe_calls(), 3);
    }

    #[tokio::test]
    async fn scripted_work_then_idle() {
        let host = MockHost::new();
        host.push_jobs(vec![running_job(1, "pool.scrub.scrub")]);

        assert_eq!(host.list_active_work().await.unwrap().len(), 1);
        assert!(host.list_active_work().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn counters_track_calls() {
        let host = MockHost::new();
        host.wake().await.unwrap();
        host.request_shutdown().await.unwrap();
        host.request_shutdown().await.unwrap();

        assert_eq!(host.wake_calls(), 1);
        assert_eq!(host.shutdown_calls(), 2);
        assert_eq!(host.query_calls(), 0);
    }
}
