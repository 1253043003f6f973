//! Session engine: one keypoint frame in, one displayed status out
//!
//! Per update:
//! 1. Validate the frame (nothing is mutated on error)
//! 2. Idle decay when no landmarks arrived and the last promotion is too old
//! 3. Best hand candidate across all hands
//! 4. A confident FALLEN posture overrides the hand candidate
//! 5. Candidates above the confidence gate go to the stabilizer

use std::time::Instant;
use tracing::{info, warn};
use crate::config::EngineConfig;
use crate::core::{HandClassifier, PostureClassifier, Stabilizer};
use crate::types::{
    Classification, KeypointFrame, Observation, ReasonCode, SessionState, StatusKind,
    StatusOutput, ValidationError,
};

/// Classification + stabilization for one keypoint stream
#[derive(Debug)]
pub struct SessionEngine {
    config: EngineConfig,
    hands: HandClassifier,
    posture: PostureClassifier,
    stabilizer: Stabilizer,
    state: SessionState,
    /// Frames accepted since start
    frame_count: u64,
    /// Reason attached to the last output
    last_reason: ReasonCode,
}

impl Default for SessionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionEngine {
    /// Create new engine with default thresholds
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_config_at(config, Instant::now())
    }

    /// Create an engine whose clock starts at `now`
    pub fn with_config_at(config: EngineConfig, now: Instant) -> Self {
        Self {
            hands: HandClassifier::new(),
            posture: PostureClassifier::with_span_ratio(config.fall_span_ratio),
            stabilizer: Stabilizer::with_promotion_confidence(config.promotion_confidence),
            state: SessionState::new(now),
            frame_count: 0,
            last_reason: ReasonCode::R004_STATUS_MAINTAINED,
            config,
        }
    }

    /// Fold a frame into the session using the wall clock
    pub fn update(&mut self, frame: &KeypointFrame) -> Result<StatusOutput, ValidationError> {
        self.update_at(frame, Instant::now())
    }

    /// Fold a frame into the session at monotonic time `now`
    pub fn update_at(
        &mut self,
        frame: &KeypointFrame,
        now: Instant,
    ) -> Result<StatusOutput, ValidationError> {
        if let Err(e) = frame.validate() {
            warn!(error = %e, "frame rejected");
            return Err(e);
        }
        self.frame_count += 1;

        let decayed = self.apply_idle_decay(frame, now);

        let candidate = self.candidate(frame)?;
        let reason = match candidate {
            None if decayed => ReasonCode::R004_IDLE_DECAY,
            None => ReasonCode::R001_NO_CANDIDATE,
            Some(obs) if obs.confidence <= self.config.promotion_confidence => {
                ReasonCode::R001_BELOW_CONFIDENCE
            }
            Some(obs) => self.stabilizer.stabilize(obs, &mut self.state, now).reason(),
        };

        self.last_reason = reason;
        Ok(self.current_output())
    }

    /// Force MONITORING once nothing has been seen for longer than the timeout.
    /// Returns whether the displayed status changed.
    fn apply_idle_decay(&mut self, frame: &KeypointFrame, now: Instant) -> bool {
        if frame.has_landmarks() {
            return false;
        }
        let idle = now.saturating_duration_since(self.state.last_update());
        if idle <= self.config.idle_timeout() {
            return false;
        }
        if self.state.status() == StatusKind::Monitoring && self.state.confidence() == 0.0 {
            return false;
        }
        info!(from = %self.state.status(), idle_ms = idle.as_millis() as u64, "idle decay");
        self.state.decay();
        true
    }

    /// Pick this frame's candidate observation, if any
    fn candidate(&self, frame: &KeypointFrame) -> Result<Option<Observation>, ValidationError> {
        let mut best = self.hands.classify_best(&frame.hands)?;

        if let Some(pose) = frame.pose.as_deref() {
            let posture = self.posture.classify(pose, frame.size)?;
            if posture.status_kind() == Some(StatusKind::Fallen)
                && posture.confidence > self.config.fallen_gate_confidence
            {
                best = posture;
            }
        }

        Ok(observation_of(&best))
    }

    /// Explicit reset: MONITORING, zero confidence, empty history
    pub fn reset(&mut self) -> StatusOutput {
        self.reset_at(Instant::now())
    }

    pub fn reset_at(&mut self, now: Instant) -> StatusOutput {
        info!(from = %self.state.status(), "session reset");
        self.state.reset(now);
        self.stabilizer.clear();
        self.last_reason = ReasonCode::R004_RESET;
        self.current_output()
    }

    /// Get current status
    pub fn status(&self) -> StatusKind {
        self.state.status()
    }

    /// Get current confidence
    pub fn confidence(&self) -> f64 {
        self.state.confidence()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn history_len(&self) -> usize {
        self.stabilizer.history().len()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get current output without updating
    pub fn current_output(&self) -> StatusOutput {
        StatusOutput::new(
            self.state.status(),
            self.state.confidence(),
            self.last_reason,
            self.history_len(),
            self.frame_count,
        )
    }
}

/// Only statuses with a real confidence become candidates
fn observation_of(classification: &Classification) -> Option<Observation> {
    classification
        .observation()
        .filter(|obs| obs.confidence > 0.0)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hand::synthetic_hand;
    use crate::core::posture::synthetic_pose;
    use crate::types::{FrameSize, Landmark};
    use std::time::Duration;

    const HELP: [bool; 5] = [false, true, true, true, true];
    const SAFE: [bool; 5] = [true, true, false, false, false];

    fn hand_frame(fingers: [bool; 5]) -> KeypointFrame {
        KeypointFrame::empty().with_hand(synthetic_hand(fingers))
    }

    fn fallen_frame() -> KeypointFrame {
        KeypointFrame::empty().with_pose(synthetic_pose(0.5, 0.6), FrameSize::new(1280, 720))
    }

    fn engine_at(t0: Instant) -> SessionEngine {
        SessionEngine::with_config_at(EngineConfig::default(), t0)
    }

    #[test]
    fn test_initial_state_is_monitoring() {
        let engine = SessionEngine::new();
        assert_eq!(engine.status(), StatusKind::Monitoring);
        assert_eq!(engine.confidence(), 0.0);
        assert_eq!(engine.history_len(), 0);
    }

    #[test]
    fn test_three_frames_promote_help() {
        let t0 = Instant::now();
        let mut engine = engine_at(t0);

        let first = engine.update_at(&hand_frame(HELP), t0).unwrap();
        assert_eq!(first.reason, ReasonCode::R002_INSUFFICIENT_HISTORY);
        assert!(!first.promoted);
        engine.update_at(&hand_frame(HELP), t0).unwrap();
        let output = engine.update_at(&hand_frame(HELP), t0).unwrap();

        assert_eq!(output.status, StatusKind::HelpCritical);
        assert_eq!(output.confidence, 0.95);
        assert_eq!(output.reason, ReasonCode::R003_PROMOTED);
        assert!(output.promoted);
        assert_eq!(output.frame_count, 3);
    }

    #[test]
    fn test_undefined_never_offered() {
        let t0 = Instant::now();
        let mut engine = engine_at(t0);
        for _ in 0..5 {
            let output = engine.update_at(&hand_frame([false; 5]), t0).unwrap();
            assert_eq!(output.reason, ReasonCode::R001_BELOW_CONFIDENCE);
        }
        assert_eq!(engine.history_len(), 0);
        assert_eq!(engine.status(), StatusKind::Monitoring);
    }

    #[test]
    fn test_normal_posture_never_offered() {
        let t0 = Instant::now();
        let mut engine = engine_at(t0);
        let upright = KeypointFrame::empty()
            .with_pose(synthetic_pose(0.2, 0.7), FrameSize::new(1280, 720));
        let output = engine.update_at(&upright, t0).unwrap();
        assert_eq!(output.reason, ReasonCode::R001_NO_CANDIDATE);
        assert_eq!(engine.history_len(), 0);
    }

    #[test]
    fn test_fallen_overrides_hand() {
        let t0 = Instant::now();
        let mut engine = engine_at(t0);
        let frame = KeypointFrame {
            hands: vec![synthetic_hand(HELP)],
            ..fallen_frame()
        };
        for _ in 0..3 {
            engine.update_at(&frame, t0).unwrap();
        }
        assert_eq!(engine.status(), StatusKind::Fallen);
        assert_eq!(engine.confidence(), 0.92);
    }

    #[test]
    fn test_fallen_gate_from_config() {
        let t0 = Instant::now();
        let config = EngineConfig { fallen_gate_confidence: 0.95, ..EngineConfig::default() };
        let mut engine = SessionEngine::with_config_at(config, t0);
        for _ in 0..3 {
            engine.update_at(&fallen_frame(), t0).unwrap();
        }
        assert_eq!(engine.status(), StatusKind::Monitoring);
    }

    #[test]
    fn test_idle_decay_after_timeout() {
        let t0 = Instant::now();
        let mut engine = engine_at(t0);
        for _ in 0..3 {
            engine.update_at(&hand_frame(SAFE), t0).unwrap();
        }
        assert_eq!(engine.status(), StatusKind::Safe);

        // Within the timeout: still displayed
        let output = engine.update_at(&KeypointFrame::empty(), t0 + Duration::from_secs(3)).unwrap();
        assert_eq!(output.status, StatusKind::Safe);

        let output = engine
            .update_at(&KeypointFrame::empty(), t0 + Duration::from_millis(3001))
            .unwrap();
        assert_eq!(output.status, StatusKind::Monitoring);
        assert_eq!(output.confidence, 0.0);
        assert_eq!(output.reason, ReasonCode::R004_IDLE_DECAY);
        assert_eq!(engine.state().last_update(), t0);
        // History survives decay
        assert_eq!(output.history_len, 3);
    }

    #[test]
    fn test_no_decay_while_landmarks_seen() {
        let t0 = Instant::now();
        let mut engine = engine_at(t0);
        for _ in 0..3 {
            engine.update_at(&hand_frame(SAFE), t0).unwrap();
        }
        // A fist is a landmark observation even though it is never offered
        let output = engine
            .update_at(&hand_frame([false; 5]), t0 + Duration::from_secs(10))
            .unwrap();
        assert_eq!(output.status, StatusKind::Safe);
    }

    #[test]
    fn test_reset() {
        let t0 = Instant::now();
        let mut engine = engine_at(t0);
        for _ in 0..4 {
            engine.update_at(&hand_frame(HELP), t0).unwrap();
        }
        let output = engine.reset_at(t0);
        assert_eq!(output.status, StatusKind::Monitoring);
        assert_eq!(output.confidence, 0.0);
        assert_eq!(output.history_len, 0);
        assert_eq!(output.reason, ReasonCode::R004_RESET);
    }

    #[test]
    fn test_invalid_frame_changes_nothing() {
        let t0 = Instant::now();
        let mut engine = engine_at(t0);
        engine.update_at(&hand_frame(HELP), t0).unwrap();

        let bad = KeypointFrame::empty()
            .with_hand(synthetic_hand(HELP))
            .with_hand(vec![Landmark::new(0.5, 0.5); 3]);
        assert!(engine.update_at(&bad, t0).is_err());
        assert_eq!(engine.frame_count(), 1);
        assert_eq!(engine.history_len(), 1);
    }
}
