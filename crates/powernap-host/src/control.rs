//! The host control seam between the monitor and the transports.

use async_trait::async_trait;
use powernap_core::Job;

use crate::error::{QueryError, ShutdownError, WakeError};

/// High-level, idempotent operations against one remote host.
///
/// The monitor drives a host exclusively through this trait, which keeps the
/// control loop testable against [`crate::mock::MockHost`] with scripted
/// responses.
///
/// All four operations are safe to repeat: a second wake packet is harmless,
/// and a shutdown request to a host that is already going down is expected to
/// be a no-op on the host side.
#[async_trait]
pub trait HostControl: Send + Sync {
    /// Broadcast a Wake-on-LAN magic packet to the host's MAC.
    ///
    /// Success means the packet was handed to the network layer, not that the
    /// host woke; WoL carries no acknowledgment.
    ///
    /// # Errors
    ///
    /// Returns [`WakeError`] only for local socket failures.
    async fn wake(&self) -> Result<(), WakeError>;

    /// Check whether the host's management API currently answers.
    ///
    /// Unreachability is a routine state while the host boots, so this never
    /// surfaces an error: any transport failure, timeout, or non-success
    /// status is `false`.
    async fn probe_reachable(&self) -> bool;

    /// List the jobs currently running on the host.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] on transport failure, auth rejection, a
    /// non-success status, or an unparseable body. The caller decides policy;
    /// a failed query must never be mistaken for "no work".
    async fn list_active_work(&self) -> Result<Vec<Job>, QueryError>;

    /// Ask the host to power off.
    ///
    /// Success means the host acknowledged the request; actually reaching
    /// power-off is not observed.
    ///
    /// # Errors
    ///
    /// Returns [`ShutdownError`] on transport failure or a non-success
    /// status.
    async fn request_shutdown(&self) -> Result<(), ShutdownError>;
}
