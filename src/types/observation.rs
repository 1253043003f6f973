//! Classifier results and the observations fed to the stabilizer

use serde::{Deserialize, Serialize};
use crate::types::StatusKind;

/// A (status, confidence) pair as it enters history
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub label: StatusKind,
    /// 0.0-1.0
    pub confidence: f64,
}

impl Observation {
    pub fn new(label: StatusKind, confidence: f64) -> Self {
        Self { label, confidence }
    }
}

/// What a classifier saw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClassLabel {
    /// No hand landmarks supplied
    NoHand,
    /// No pose landmarks supplied
    PoseNotDetected,
    /// Upright body, never offered for display
    NormalPosture,
    Status(StatusKind),
}

/// Output of a single classifier call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: ClassLabel,
    pub confidence: f64,
}

impl Classification {
    pub fn new(label: ClassLabel, confidence: f64) -> Self {
        Self { label, confidence }
    }

    pub fn status(kind: StatusKind, confidence: f64) -> Self {
        Self::new(ClassLabel::Status(kind), confidence)
    }

    pub fn no_hand() -> Self {
        Self::new(ClassLabel::NoHand, 0.0)
    }

    pub fn pose_not_detected() -> Self {
        Self::new(ClassLabel::PoseNotDetected, 0.0)
    }

    /// The status carried by this classification, if any
    pub fn status_kind(&self) -> Option<StatusKind> {
        match self.label {
            ClassLabel::Status(kind) => Some(kind),
            _ => None,
        }
    }

    /// As an observation, when the label names a status
    pub fn observation(&self) -> Option<Observation> {
        self.status_kind().map(|kind| Observation::new(kind, self.confidence))
    }
}
