//! Monitor phases and their legal transitions.

use std::fmt;

/// Phase of one monitor run. Exactly one live value per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonitorPhase {
    /// Initial probe: decide whether a wake is needed at all.
    AwaitingWake,
    /// Magic packet sent (or assumed in flight); waiting for the management
    /// API to start answering.
    AwaitingReachable,
    /// Host is up; polling the job queue and accumulating idle time.
    Monitoring,
    /// Idle threshold reached; issuing the one shutdown request.
    ShuttingDown,
    /// Run is over; the loop exits.
    Terminated,
}

impl MonitorPhase {
    /// Whether the run is over.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Terminated)
    }

    /// Whether job polling is allowed in this phase.
    ///
    /// The job queue is only ever consulted while Monitoring; every other
    /// phase talks to the host through wake or probe operations alone.
    #[must_use]
    pub const fn polls_work(self) -> bool {
        matches!(self, Self::Monitoring)
    }

    /// Check whether a phase transition is legal.
    #[must_use]
    pub const fn is_valid_transition(from: Self, to: Self) -> bool {
        use MonitorPhase::{
            AwaitingReachable, AwaitingWake, Monitoring, ShuttingDown, Terminated,
        };

        matches!(
            (from, to),
            // Initial probe: already up, or wake sent
            (AwaitingWake, Monitoring | AwaitingReachable)
                // First successful probe
                | (AwaitingReachable, Monitoring)
                // Idle threshold reached, or repeated query failures
                | (Monitoring, ShuttingDown | AwaitingReachable)
                // Shutdown is one best-effort attempt either way
                | (ShuttingDown, Terminated)
        )
    }
}

impl fmt::Display for MonitorPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AwaitingWake => "awaiting-wake",
            Self::AwaitingReachable => "awaiting-reachable",
            Self::Monitoring => "monitoring",
            Self::ShuttingDown => "shutting-down",
            Self::Terminated => "terminated",
        };
        f.write_str(name)
    }
}
