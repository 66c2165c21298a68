//! Core types for powernap.
//!
//! This crate provides the foundational types shared by the host controller
//! and the idle monitor:
//!
//! - **Identity**: the target host's address, MAC, and API credential
//! - **Jobs**: the management API's view of in-progress work
//!
//! # Example
//!
//! ```
//! use powernap_core::{HostIdentity, MacAddr};
//!
//! // Parse a MAC address
//! let mac: MacAddr = "aa:bb:cc:00:11:22".parse().unwrap();
//!
//! // Build a host identity
//! let identity = HostIdentity::new("192.168.1.40", mac, "1-abcdef").unwrap();
//! assert_eq!(identity.address(), "192.168.1.40");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod identity;
pub mod ids;
pub mod job;

pub use identity::HostIdentity;
pub use ids::{IdentityError, MacAddr};
pub use job::Job;
