//! Reason codes for every session decision

use serde::{Deserialize, Serialize};

/// Why the displayed status is what it is after an update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum ReasonCode {
    // =========================================================================
    // R001: Candidates
    // =========================================================================
    /// Nothing classifiable in this frame
    R001_NO_CANDIDATE,
    /// Best candidate did not clear the confidence gate
    R001_BELOW_CONFIDENCE,

    // =========================================================================
    // R002: Vote
    // =========================================================================
    /// Fewer than three observations in history
    R002_INSUFFICIENT_HISTORY,
    /// No label won two of the last three votes
    R002_NO_MAJORITY,
    /// Majority found but its best confidence is too low
    R002_WEAK_MAJORITY,

    // =========================================================================
    // R003: Promotion
    // =========================================================================
    /// A new status replaced the displayed one
    R003_PROMOTED,
    /// The displayed status won the vote again
    R003_CONFIRMED,

    // =========================================================================
    // R004: Session
    // =========================================================================
    /// No landmarks for too long, back to MONITORING
    R004_IDLE_DECAY,
    /// Explicit reset
    R004_RESET,
    /// Nothing changed
    R004_STATUS_MAINTAINED,
}

impl ReasonCode {
    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::R001_NO_CANDIDATE => "R001_NO_CANDIDATE",
            Self::R001_BELOW_CONFIDENCE => "R001_BELOW_CONFIDENCE",
            Self::R002_INSUFFICIENT_HISTORY => "R002_INSUFFICIENT_HISTORY",
            Self::R002_NO_MAJORITY => "R002_NO_MAJORITY",
            Self::R002_WEAK_MAJORITY => "R002_WEAK_MAJORITY",
            Self::R003_PROMOTED => "R003_PROMOTED",
            Self::R003_CONFIRMED => "R003_CONFIRMED",
            Self::R004_IDLE_DECAY => "R004_IDLE_DECAY",
            Self::R004_RESET => "R004_RESET",
            Self::R004_STATUS_MAINTAINED => "R004_STATUS_MAINTAINED",
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::R001_NO_CANDIDATE => "No candidate in frame",
            Self::R001_BELOW_CONFIDENCE => "Candidate below confidence gate",
            Self::R002_INSUFFICIENT_HISTORY => "Not enough history to vote",
            Self::R002_NO_MAJORITY => "No 2-of-3 agreement",
            Self::R002_WEAK_MAJORITY => "Agreement without enough confidence",
            Self::R003_PROMOTED => "New status promoted",
            Self::R003_CONFIRMED => "Status confirmed",
            Self::R004_IDLE_DECAY => "Idle - back to monitoring",
            Self::R004_RESET => "Session reset",
            Self::R004_STATUS_MAINTAINED => "Status unchanged",
        }
    }

    /// Did this decision change or confirm the displayed status?
    pub fn is_promotion(&self) -> bool {
        matches!(self, Self::R003_PROMOTED | Self::R003_CONFIRMED)
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}
