//! Error types for host control operations.
//!
//! Each of the four controller operations fails with its own error type so
//! the monitor can apply a distinct policy per operation instead of matching
//! on one catch-all enum.

use thiserror::Error;

/// Errors sending the Wake-on-LAN magic packet.
///
/// WoL gives no acknowledgment by design, so these only cover handing the
/// packet to the network layer.
#[derive(Debug, Error)]
pub enum WakeError {
    /// Could not bind the local UDP socket.
    #[error("failed to bind wake socket: {0}")]
    Bind(#[source] std::io::Error),

    /// Could not enable broadcast on the socket.
    #[error("failed to enable broadcast: {0}")]
    Broadcast(#[source] std::io::Error),

    /// The packet was not accepted by the network layer on any port.
    #[error("failed to send magic packet to {target}: {source}")]
    Send {
        /// Broadcast address the send was attempted against.
        target: std::net::Ipv4Addr,
        /// The last send error observed.
        source: std::io::Error,
    },
}

/// Errors listing the host's active work.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The request never completed (connect failure, DNS, timeout).
    #[error("job query transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API rejected the credential.
    #[error("job query rejected with auth status {status}")]
    Auth {
        /// The 401/403 status returned.
        status: u16,
    },

    /// The API answered with a non-success status other than an auth error.
    #[error("job query failed with status {status}")]
    Api {
        /// The HTTP status returned.
        status: u16,
    },

    /// The response body was not the expected job array.
    #[error("failed to parse job list: {0}")]
    Parse(String),
}

impl QueryError {
    /// Whether this failure indicates a bad credential rather than a
    /// transient fault. Auth failures point at persistent misconfiguration
    /// and deserve a louder log level.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }
}

/// Errors requesting a remote shutdown.
#[derive(Debug, Error)]
pub enum ShutdownError {
    /// The request never completed.
    #[error("shutdown request transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The host answered but did not accept the shutdown request.
    #[error("shutdown request rejected with status {status}")]
    Rejected {
        /// The HTTP status returned.
        status: u16,
    },
}
