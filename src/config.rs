//! Engine configuration, optionally loaded from a TOML file
//!
//! ```toml
//! [engine]
//! promotion_confidence = 0.7
//! fallen_gate_confidence = 0.8
//! idle_timeout_ms = 3000
//! fall_span_ratio = 0.25
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::{FALLEN_GATE_CONFIDENCE, FALL_SPAN_RATIO, IDLE_TIMEOUT_MS, PROMOTION_CONFIDENCE};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Gate for offering a candidate and for promoting a majority
    #[serde(default = "default_promotion_confidence")]
    pub promotion_confidence: f64,
    /// A FALLEN posture must exceed this to override hand candidates
    #[serde(default = "default_fallen_gate_confidence")]
    pub fallen_gate_confidence: f64,
    /// Idle decay after this long without landmarks
    #[serde(default = "default_idle_timeout_ms")]
    pub idle_timeout_ms: u64,
    /// Nose-to-hip span, as a fraction of frame height, that reads as fallen
    #[serde(default = "default_fall_span_ratio")]
    pub fall_span_ratio: f64,
}

fn default_promotion_confidence() -> f64 { PROMOTION_CONFIDENCE }
fn default_fallen_gate_confidence() -> f64 { FALLEN_GATE_CONFIDENCE }
fn default_idle_timeout_ms() -> u64 { IDLE_TIMEOUT_MS }
fn default_fall_span_ratio() -> f64 { FALL_SPAN_RATIO }

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            promotion_confidence: default_promotion_confidence(),
            fallen_gate_confidence: default_fallen_gate_confidence(),
            idle_timeout_ms: default_idle_timeout_ms(),
            fall_span_ratio: default_fall_span_ratio(),
        }
    }
}

impl EngineConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        let engine = &config.engine;
        for (name, value) in [
            ("promotion_confidence", engine.promotion_confidence),
            ("fallen_gate_confidence", engine.fallen_gate_confidence),
            ("fall_span_ratio", engine.fall_span_ratio),
        ] {
            if !(0.0..=1.0).contains(&value) {
                anyhow::bail!("engine.{} must be within [0, 1], got {}", name, value);
            }
        }
        Ok(config)
    }
}
