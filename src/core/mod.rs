//! Core modules for Gestalert

pub mod hand;
pub mod posture;
pub mod stabilizer;
pub mod session;
pub mod api;

pub use hand::{HandClassifier, Gesture, FingerVector, GESTURE_TABLE};
pub use posture::{PostureClassifier, VerticalProfile};
pub use stabilizer::{Stabilizer, Vote};
pub use session::SessionEngine;
pub use api::{create_router, run_server};
