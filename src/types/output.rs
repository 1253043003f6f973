//! Output structures for display and downstream actuation

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::types::{ReasonCode, StatusKind};

/// What the session displays after an update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusOutput {
    /// Timestamp
    pub timestamp: DateTime<Utc>,
    /// Displayed status
    pub status: StatusKind,
    /// Confidence of the displayed status
    pub confidence: f64,
    /// Reason for this update's outcome
    pub reason: ReasonCode,
    /// The vote elected the displayed status on this update
    pub promoted: bool,
    /// Observations currently held by the stabilizer
    pub history_len: usize,
    /// Frames processed since the session started
    pub frame_count: u64,
}

impl StatusOutput {
    /// Create new output
    pub fn new(
        status: StatusKind,
        confidence: f64,
        reason: ReasonCode,
        history_len: usize,
        frame_count: u64,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            status,
            confidence,
            reason,
            promoted: reason.is_promotion(),
            history_len,
            frame_count,
        }
    }

    /// Operator message for the displayed status
    pub fn message(&self) -> &'static str {
        self.status.display().map(|d| d.message).unwrap_or("")
    }

    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        let color = self.status.color_code();
        let reset = StatusKind::color_reset();
        let emoji = self.status.emoji();

        format!(
            "{}{} {} {:.0}% | {} | history={} | {}{}",
            color,
            emoji,
            self.status,
            self.confidence * 100.0,
            self.message(),
            self.history_len,
            self.reason.code(),
            reset
        )
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "status={} | confidence={:.2} | history={} | frame={} | reason={}",
            self.status,
            self.confidence,
            self.history_len,
            self.frame_count,
            self.reason.code()
        )
    }
}
