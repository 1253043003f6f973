//! Core types for Gestalert

mod error;
mod landmark;
mod status;
mod observation;
mod history;
mod reason;
mod output;
mod state;

pub use error::{LandmarkSet, ValidationError};
pub use landmark::{
    Landmark, FrameSize, KeypointFrame, validate_landmarks,
    HAND_LANDMARK_COUNT, POSE_LANDMARK_COUNT, FINGER_JOINTS,
    THUMB_IP, THUMB_TIP, INDEX_PIP, INDEX_TIP, MIDDLE_PIP, MIDDLE_TIP,
    RING_PIP, RING_TIP, PINKY_PIP, PINKY_TIP,
    NOSE, LEFT_SHOULDER, RIGHT_SHOULDER, LEFT_HIP, RIGHT_HIP,
};
pub use status::{StatusKind, StatusDisplay};
pub use observation::{Observation, Classification, ClassLabel};
pub use history::History;
pub use reason::ReasonCode;
pub use output::StatusOutput;
pub use state::SessionState;
