//! Host controller for powernap.
//!
//! This crate wraps the two transports the orchestrator needs (a UDP
//! Wake-on-LAN broadcast and the host's authenticated HTTP management API)
//! behind the [`HostControl`] trait:
//!
//! - [`HostControl::wake`]: broadcast a magic packet (fire-and-forget)
//! - [`HostControl::probe_reachable`]: is the management API answering?
//! - [`HostControl::list_active_work`]: currently running jobs
//! - [`HostControl::request_shutdown`]: ask the host to power off
//!
//! [`ApiHost`] is the production implementation. For tests, the `test-utils`
//! feature exposes [`mock::MockHost`] with scripted responses.
//!
//! # Example
//!
//! ```no_run
//! use powernap_core::{HostIdentity, MacAddr};
//! use powernap_host::{ApiHost, HostControl};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mac: MacAddr = "aa:bb:cc:00:11:22".parse()?;
//! let identity = HostIdentity::new("192.168.1.40", mac, "1-abcdef")?;
//! let host = ApiHost::new(identity);
//!
//! if !host.probe_reachable().await {
//!     host.wake().await?;
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod api;
pub mod control;
pub mod error;
pub mod wol;

pub use api::ApiHost;
pub use control::HostControl;
pub use error::{QueryError, ShutdownError, WakeError};

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
