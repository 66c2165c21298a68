//! Jobs as reported by the host's management API.

use serde::{Deserialize, Serialize};

/// One unit of in-progress work on the remote host.
///
/// Mirrors the `/core/get_jobs` payload. The monitor only decides on the
/// count, but `method` drives the exclusion filter and `id` gives log lines
/// something stable to point at. Unlisted payload fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Server-assigned job id.
    pub id: i64,
    /// Dotted method name, e.g. `pool.scrub.scrub`.
    pub method: String,
    /// Job state as reported, e.g. `RUNNING`.
    #[serde(default)]
    pub state: String,
    /// Progress report, when the job publishes one.
    #[serde(default)]
    pub progress: Option<JobProgress>,
}

/// Progress of a running job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobProgress {
    /// Completion percentage, 0-100.
    #[serde(default)]
    pub percent: Option<f64>,
    /// Free-form progress description.
    #[serde(default)]
    pub description: Option<String>,
}
