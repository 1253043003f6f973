//! Gestalert: emergency hand-signal and fall detection core
//!
//! Keypoints in → classifiers → temporal stabilizer → displayed status out.
//! Camera capture, keypoint detection and rendering live outside this crate.

pub mod config;
pub mod core;
pub mod types;

// =============================================================================
// CONFIDENCE GATES [C]
// =============================================================================

/// A candidate must exceed this confidence to be offered to the stabilizer,
/// and the best of the last votes must exceed it to be promoted
pub const PROMOTION_CONFIDENCE: f64 = 0.7;

/// A FALLEN posture must exceed this confidence to replace a hand candidate
pub const FALLEN_GATE_CONFIDENCE: f64 = 0.8;

// =============================================================================
// STABILIZER [C]
// =============================================================================

/// Observations kept in history (oldest evicted beyond this)
pub const HISTORY_CAPACITY: usize = 5;

/// Most recent observations that take part in the vote
pub const VOTE_WINDOW: usize = 3;

/// Votes the winning label needs inside the window
pub const VOTE_MIN_AGREEMENT: usize = 2;

// =============================================================================
// TIMING [C]
// =============================================================================

/// Without any landmarks for longer than this, status decays to MONITORING
pub const IDLE_TIMEOUT_MS: u64 = 3000;

// =============================================================================
// POSTURE [C]
// =============================================================================

/// Nose-to-hip vertical span below this fraction of frame height reads as fallen
pub const FALL_SPAN_RATIO: f64 = 0.25;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
