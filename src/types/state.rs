//! Displayed session state

use std::time::Instant;
use crate::types::{Observation, StatusKind};

/// The status currently on display. Only changed by promotion, idle decay
/// and reset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionState {
    status: StatusKind,
    confidence: f64,
    /// Last promotion (or reset)
    last_update: Instant,
}

impl SessionState {
    /// Fresh state: MONITORING at zero confidence
    pub fn new(now: Instant) -> Self {
        Self {
            status: StatusKind::Monitoring,
            confidence: 0.0,
            last_update: now,
        }
    }

    pub fn status(&self) -> StatusKind {
        self.status
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn last_update(&self) -> Instant {
        self.last_update
    }

    /// Display a promoted observation
    pub fn promote(&mut self, observation: Observation, now: Instant) {
        self.status = observation.label;
        self.confidence = observation.confidence;
        self.last_update = now;
    }

    /// Back to MONITORING without touching the detection timestamp
    pub fn decay(&mut self) {
        self.status = StatusKind::Monitoring;
        self.confidence = 0.0;
    }

    pub fn reset(&mut self, now: Instant) {
        *self = Self::new(now);
    }
}
