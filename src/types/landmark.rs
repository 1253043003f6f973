//! Keypoint input: landmarks, anatomical indices and per-update frames
//!
//! Coordinates are normalized to [0, 1] with y growing downwards. Hand sets
//! carry 21 points, body pose sets 33 points.

use serde::{Deserialize, Serialize};
use crate::types::{LandmarkSet, ValidationError};

// ============================================================================
// HAND LANDMARK INDICES (21 total)
// ============================================================================

pub const HAND_LANDMARK_COUNT: usize = 21;

pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_PIP: usize = 6;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_TIP: usize = 12;
pub const RING_PIP: usize = 14;
pub const RING_TIP: usize = 16;
pub const PINKY_PIP: usize = 18;
pub const PINKY_TIP: usize = 20;

/// (tip, proximal joint) for index, middle, ring, pinky
pub const FINGER_JOINTS: [(usize, usize); 4] = [
    (INDEX_TIP, INDEX_PIP),
    (MIDDLE_TIP, MIDDLE_PIP),
    (RING_TIP, RING_PIP),
    (PINKY_TIP, PINKY_PIP),
];

// ============================================================================
// POSE LANDMARK INDICES (33 total)
// ============================================================================

pub const POSE_LANDMARK_COUNT: usize = 33;

pub const NOSE: usize = 0;
pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;

// ============================================================================
// LANDMARK
// ============================================================================

/// A single keypoint in normalized image coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    /// Relative depth, unused by the classifiers
    #[serde(default)]
    pub z: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }
}

/// Check a landmark set: empty passes (it means "absent"), anything else
/// must have exactly `expected` finite points inside the unit square.
pub fn validate_landmarks(
    set: LandmarkSet,
    points: &[Landmark],
    expected: usize,
) -> Result<(), ValidationError> {
    if points.is_empty() {
        return Ok(());
    }
    if points.len() != expected {
        return Err(ValidationError::WrongLandmarkCount {
            set,
            expected,
            got: points.len(),
        });
    }

    for (index, p) in points.iter().enumerate() {
        if !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()) {
            return Err(ValidationError::NonFiniteCoordinate { set, index });
        }
        for (axis, value) in [('x', p.x), ('y', p.y)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ValidationError::CoordinateOutOfRange { set, index, axis, value });
            }
        }
    }
    Ok(())
}

// ============================================================================
// FRAME
// ============================================================================

/// Pixel dimensions of the frame the landmarks were detected on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.width == 0 || self.height == 0 {
            return Err(ValidationError::InvalidFrameSize {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

impl Default for FrameSize {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

/// Everything the keypoint source produced for one update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeypointFrame {
    /// Zero or more hands, 21 points each
    #[serde(default)]
    pub hands: Vec<Vec<Landmark>>,
    /// At most one body, 33 points
    #[serde(default)]
    pub pose: Option<Vec<Landmark>>,
    #[serde(default)]
    pub size: FrameSize,
}

impl KeypointFrame {
    /// Frame with nothing detected
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_hand(mut self, hand: Vec<Landmark>) -> Self {
        self.hands.push(hand);
        self
    }

    pub fn with_pose(mut self, pose: Vec<Landmark>, size: FrameSize) -> Self {
        self.pose = Some(pose);
        self.size = size;
        self
    }

    /// True if any hand or pose landmarks were observed
    pub fn has_landmarks(&self) -> bool {
        self.hands.iter().any(|h| !h.is_empty())
            || self.pose.as_ref().is_some_and(|p| !p.is_empty())
    }

    /// Validate every landmark set and the frame size before anything runs
    pub fn validate(&self) -> Result<(), ValidationError> {
        for hand in &self.hands {
            validate_landmarks(LandmarkSet::Hand, hand, HAND_LANDMARK_COUNT)?;
        }
        if let Some(pose) = &self.pose {
            validate_landmarks(LandmarkSet::Pose, pose, POSE_LANDMARK_COUNT)?;
            if !pose.is_empty() {
                self.size.validate()?;
            }
        }
        Ok(())
    }
}
