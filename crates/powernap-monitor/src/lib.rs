//! Idle monitor for powernap.
//!
//! This crate owns the power-lifecycle control loop: ensure the host is up,
//! watch its job queue, and request a shutdown once it has been idle past a
//! configured threshold. One [`Monitor`] instance drives one host through one
//! run; there is no shared state beyond what the monitor owns.
//!
//! # State Machine
//!
//! ```text
//!            ┌──────────────┐
//!            │ AwaitingWake │
//!            └──────┬───────┘
//!       (reachable) │ (down: send magic packet)
//!           ┌───────┴──────────────┐
//!           │                      ▼
//!           │            ┌───────────────────┐
//!           │            │ AwaitingReachable │──(deadline)──▶ WakeTimeout
//!           │            └─────────┬─────────┘
//!           │             (probe ok)│      ▲
//!           ▼                      ▼      │ (repeated query failures)
//!        ┌─────────────────────────────┐  │
//!        │          Monitoring         │──┘
//!        └──────────────┬──────────────┘
//!          (idle ≥ threshold)
//!                       ▼
//!               ┌──────────────┐
//!               │ ShuttingDown │
//!               └──────┬───────┘
//!                      ▼
//!               ┌──────────────┐
//!               │  Terminated  │
//!               └──────────────┘
//! ```
//!
//! Per tick in Monitoring, exactly one of three things happens to the idle
//! accumulator: active work resets it, an empty job list advances it by the
//! poll interval, and a failed query leaves it untouched.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod idle;
pub mod monitor;
pub mod phase;

pub use config::MonitorConfig;
pub use error::MonitorError;
pub use idle::{IdleState, Observation, TickOutcome};
pub use monitor::{Monitor, MonitorReport};
pub use phase::MonitorPhase;
