//! Input validation errors

use thiserror::Error;

/// Which landmark set a validation error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandmarkSet {
    Hand,
    Pose,
}

impl std::fmt::Display for LandmarkSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LandmarkSet::Hand => write!(f, "hand"),
            LandmarkSet::Pose => write!(f, "pose"),
        }
    }
}

/// Malformed keypoint input. Absent landmarks are not an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{set} landmark set has {got} points, expected {expected}")]
    WrongLandmarkCount {
        set: LandmarkSet,
        expected: usize,
        got: usize,
    },

    #[error("{set} landmark {index} has {axis}={value} outside [0, 1]")]
    CoordinateOutOfRange {
        set: LandmarkSet,
        index: usize,
        axis: char,
        value: f64,
    },

    #[error("{set} landmark {index} has a non-finite coordinate")]
    NonFiniteCoordinate { set: LandmarkSet, index: usize },

    #[error("frame size {width}x{height} is not usable")]
    InvalidFrameSize { width: u32, height: u32 },
}
