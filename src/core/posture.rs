//! Posture classifier: a single frame's nose-to-hip span
//!
//! If the nose and the hip midpoint are vertically closer than a quarter of
//! the frame height the body is read as lying down. A crouch can trip this;
//! the stabilizer is what smooths it out.

use tracing::debug;
use crate::FALL_SPAN_RATIO;
use crate::types::{
    Classification, ClassLabel, FrameSize, Landmark, LandmarkSet, StatusKind, ValidationError,
    validate_landmarks, LEFT_HIP, LEFT_SHOULDER, NOSE, POSE_LANDMARK_COUNT, RIGHT_HIP,
    RIGHT_SHOULDER,
};

pub const FALLEN_CONFIDENCE: f64 = 0.92;
pub const NORMAL_POSTURE_CONFIDENCE: f64 = 0.80;

/// Vertical pixel positions extracted from a pose
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalProfile {
    pub nose_y: f64,
    pub shoulder_y: f64,
    pub hip_y: f64,
}

impl VerticalProfile {
    /// Expects a validated 33-point set
    pub fn from_landmarks(landmarks: &[Landmark], height: f64) -> Self {
        let mid = |a: usize, b: usize| (landmarks[a].y + landmarks[b].y) / 2.0 * height;
        Self {
            nose_y: landmarks[NOSE].y * height,
            shoulder_y: mid(LEFT_SHOULDER, RIGHT_SHOULDER),
            hip_y: mid(LEFT_HIP, RIGHT_HIP),
        }
    }

    pub fn nose_hip_span(&self) -> f64 {
        (self.nose_y - self.hip_y).abs()
    }
}

#[derive(Debug, Clone)]
pub struct PostureClassifier {
    span_ratio: f64,
}

impl Default for PostureClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl PostureClassifier {
    pub fn new() -> Self {
        Self::with_span_ratio(FALL_SPAN_RATIO)
    }

    pub fn with_span_ratio(span_ratio: f64) -> Self {
        Self { span_ratio }
    }

    /// Classify a body. An empty set yields a zero-confidence PoseNotDetected.
    pub fn classify(
        &self,
        landmarks: &[Landmark],
        size: FrameSize,
    ) -> Result<Classification, ValidationError> {
        if landmarks.is_empty() {
            return Ok(Classification::pose_not_detected());
        }
        validate_landmarks(LandmarkSet::Pose, landmarks, POSE_LANDMARK_COUNT)?;
        size.validate()?;

        let height = f64::from(size.height);
        let profile = VerticalProfile::from_landmarks(landmarks, height);
        let result = if profile.nose_hip_span() < height * self.span_ratio {
            Classification::status(StatusKind::Fallen, FALLEN_CONFIDENCE)
        } else {
            Classification::new(ClassLabel::NormalPosture, NORMAL_POSTURE_CONFIDENCE)
        };
        debug!(
            span = profile.nose_hip_span(),
            shoulder_y = profile.shoulder_y,
            label = ?result.label,
            "posture classified"
        );
        Ok(result)
    }
}

/// Build a 33-point pose with the nose at `nose_y` and both hips at `hip_y`
pub fn synthetic_pose(nose_y: f64, hip_y: f64) -> Vec<Landmark> {
    let mut points = vec![Landmark::new(0.5, 0.5); POSE_LANDMARK_COUNT];
    let shoulder_y = (nose_y + hip_y) / 2.0;
    points[NOSE] = Landmark::new(0.5, nose_y);
    points[LEFT_SHOULDER] = Landmark::new(0.4, shoulder_y);
    points[RIGHT_SHOULDER] = Landmark::new(0.6, shoulder_y);
    points[LEFT_HIP] = Landmark::new(0.45, hip_y);
    points[RIGHT_HIP] = Landmark::new(0.55, hip_y);
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    const HD: FrameSize = FrameSize { width: 1280, height: 720 };

    #[test]
    fn test_upright_is_normal() {
        let result = PostureClassifier::new().classify(&synthetic_pose(0.2, 0.7), HD).unwrap();
        assert_eq!(result.label, ClassLabel::NormalPosture);
        assert_eq!(result.confidence, 0.80);
        assert_eq!(result.observation(), None);
    }

    #[test]
    fn test_lying_is_fallen() {
        let result = PostureClassifier::new().classify(&synthetic_pose(0.5, 0.6), HD).unwrap();
        assert_eq!(result, Classification::status(StatusKind::Fallen, 0.92));
    }

    #[test]
    fn test_span_uses_hip_midpoint() {
        let mut pose = synthetic_pose(0.2, 0.7);
        // One hip level with the nose: midpoint 0.35
        pose[LEFT_HIP].y = 0.5;
        pose[RIGHT_HIP].y = 0.2;
        let profile = VerticalProfile::from_landmarks(&pose, 100.0);
        assert!((profile.hip_y - 35.0).abs() < 1e-9);
        let result = PostureClassifier::new().classify(&pose, HD).unwrap();
        assert_eq!(result.status_kind(), Some(StatusKind::Fallen));
    }

    #[test]
    fn test_span_at_threshold_is_normal() {
        // 0.25 exactly is not "less than"
        let pose = synthetic_pose(0.25, 0.5);
        let result = PostureClassifier::new().classify(&pose, FrameSize::new(100, 100)).unwrap();
        assert_eq!(result.label, ClassLabel::NormalPosture);
    }

    #[test]
    fn test_absent_pose() {
        let result = PostureClassifier::new().classify(&[], HD).unwrap();
        assert_eq!(result.label, ClassLabel::PoseNotDetected);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_zero_height_frame_fails() {
        let err = PostureClassifier::new()
            .classify(&synthetic_pose(0.5, 0.6), FrameSize::new(1280, 0))
            .unwrap_err();
        assert_eq!(err, ValidationError::InvalidFrameSize { width: 1280, height: 0 });
    }

    #[test]
    fn test_custom_ratio() {
        let classifier = PostureClassifier::with_span_ratio(0.6);
        let result = classifier.classify(&synthetic_pose(0.2, 0.7), HD).unwrap();
        assert_eq!(result.status_kind(), Some(StatusKind::Fallen));
    }
}
