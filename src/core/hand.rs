//! Hand gesture classifier: finger-extension vector → gesture
//!
//! Frames are mirrored, so the thumb counts as extended when its tip lies to
//! the right of its IP joint. The other fingers count when the tip is above
//! (smaller y than) the PIP joint. The 5-bit vector must match the table
//! exactly; anything else is UNDEFINED at a fixed low confidence.

use tracing::debug;
use crate::types::{
    Classification, Landmark, LandmarkSet, StatusKind, ValidationError,
    validate_landmarks, FINGER_JOINTS, HAND_LANDMARK_COUNT, THUMB_IP, THUMB_TIP,
};

/// Confidence for an unmatched hand shape
pub const UNDEFINED_CONFIDENCE: f64 = 0.30;

/// Extended flags in order thumb, index, middle, ring, pinky
pub type FingerVector = [bool; 5];

/// A row of the gesture table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gesture {
    pub fingers: FingerVector,
    pub status: StatusKind,
    pub confidence: f64,
    /// How an operator makes the sign
    pub hint: &'static str,
}

pub const GESTURE_TABLE: [Gesture; 4] = [
    Gesture {
        fingers: [false, true, true, true, true],
        status: StatusKind::HelpCritical,
        confidence: 0.95,
        hint: "four fingers up, thumb folded",
    },
    Gesture {
        fingers: [true, true, false, false, false],
        status: StatusKind::Safe,
        confidence: 0.90,
        hint: "thumb + index",
    },
    Gesture {
        fingers: [false, true, true, false, false],
        status: StatusKind::NeedAssistance,
        confidence: 0.85,
        hint: "index + middle",
    },
    Gesture {
        fingers: [true, true, true, true, true],
        status: StatusKind::Stop,
        confidence: 0.88,
        hint: "open hand",
    },
];

/// Stateless classifier for a single hand
#[derive(Debug, Clone, Default)]
pub struct HandClassifier;

impl HandClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify one hand. An empty set yields a zero-confidence NoHand.
    pub fn classify(&self, landmarks: &[Landmark]) -> Result<Classification, ValidationError> {
        if landmarks.is_empty() {
            return Ok(Classification::no_hand());
        }
        validate_landmarks(LandmarkSet::Hand, landmarks, HAND_LANDMARK_COUNT)?;

        let fingers = finger_vector(landmarks);
        let result = match lookup(&fingers) {
            Some(gesture) => Classification::status(gesture.status, gesture.confidence),
            None => Classification::status(StatusKind::Undefined, UNDEFINED_CONFIDENCE),
        };
        debug!(?fingers, label = ?result.label, confidence = result.confidence, "hand classified");
        Ok(result)
    }

    /// Classify every hand and keep the most confident one.
    /// Ties keep the earlier hand; no hands at all yields NoHand.
    pub fn classify_best(&self, hands: &[Vec<Landmark>]) -> Result<Classification, ValidationError> {
        let mut best = Classification::no_hand();
        for hand in hands {
            let candidate = self.classify(hand)?;
            if candidate.confidence > best.confidence {
                best = candidate;
            }
        }
        Ok(best)
    }
}

/// Compute the extension flags. Expects a validated 21-point set.
pub fn finger_vector(landmarks: &[Landmark]) -> FingerVector {
    let mut fingers = [false; 5];
    fingers[0] = landmarks[THUMB_TIP].x > landmarks[THUMB_IP].x;
    for (slot, (tip, pip)) in fingers[1..].iter_mut().zip(FINGER_JOINTS) {
        *slot = landmarks[tip].y < landmarks[pip].y;
    }
    fingers
}

/// Exact match against the gesture table
pub fn lookup(fingers: &FingerVector) -> Option<&'static Gesture> {
    GESTURE_TABLE.iter().find(|g| &g.fingers == fingers)
}

/// Build a 21-point hand whose finger vector is `fingers`. Used by tests and
/// demo input.
pub fn synthetic_hand(fingers: FingerVector) -> Vec<Landmark> {
    let mut points = vec![Landmark::new(0.5, 0.5); HAND_LANDMARK_COUNT];
    points[THUMB_IP] = Landmark::new(0.5, 0.5);
    points[THUMB_TIP] = Landmark::new(if fingers[0] { 0.6 } else { 0.4 }, 0.5);
    for (extended, (tip, pip)) in fingers[1..].iter().zip(FINGER_JOINTS) {
        points[pip] = Landmark::new(0.5, 0.5);
        points[tip] = Landmark::new(0.5, if *extended { 0.3 } else { 0.6 });
    }
    points
}
