//! Temporal stabilizer: 2-of-3 majority vote over recent observations
//!
//! Every offered candidate enters history. Once three are held, the label
//! seen most often in the last three wins if it appears at least twice and
//! the best confidence among those three clears the gate. The winner is
//! displayed with that best confidence. Otherwise the display is left alone.

use std::time::Instant;
use tracing::{debug, info};
use crate::{PROMOTION_CONFIDENCE, VOTE_MIN_AGREEMENT, VOTE_WINDOW};
use crate::types::{History, Observation, ReasonCode, SessionState, StatusKind};

/// Outcome of one vote
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Vote {
    /// A different status takes the display
    Promoted(Observation),
    /// The displayed status won again (confidence may change)
    Confirmed(Observation),
    InsufficientHistory,
    NoMajority,
    WeakMajority,
}

impl Vote {
    pub fn reason(&self) -> ReasonCode {
        match self {
            Vote::Promoted(_) => ReasonCode::R003_PROMOTED,
            Vote::Confirmed(_) => ReasonCode::R003_CONFIRMED,
            Vote::InsufficientHistory => ReasonCode::R002_INSUFFICIENT_HISTORY,
            Vote::NoMajority => ReasonCode::R002_NO_MAJORITY,
            Vote::WeakMajority => ReasonCode::R002_WEAK_MAJORITY,
        }
    }

    /// The observation to display, if the vote produced one
    pub fn winner(&self) -> Option<Observation> {
        match self {
            Vote::Promoted(o) | Vote::Confirmed(o) => Some(*o),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Stabilizer {
    history: History,
    promotion_confidence: f64,
}

impl Default for Stabilizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Stabilizer {
    pub fn new() -> Self {
        Self::with_promotion_confidence(PROMOTION_CONFIDENCE)
    }

    pub fn with_promotion_confidence(promotion_confidence: f64) -> Self {
        Self {
            history: History::new(),
            promotion_confidence,
        }
    }

    /// Record a candidate and apply the vote to `state`
    pub fn stabilize(
        &mut self,
        candidate: Observation,
        state: &mut SessionState,
        now: Instant,
    ) -> Vote {
        self.history.push(candidate);

        let vote = match self.majority() {
            Err(vote) => vote,
            Ok(winner) if winner.label == state.status() => Vote::Confirmed(winner),
            Ok(winner) => Vote::Promoted(winner),
        };

        match vote {
            Vote::Promoted(winner) => {
                info!(from = %state.status(), to = %winner.label, confidence = winner.confidence, "status promoted");
                state.promote(winner, now);
            }
            Vote::Confirmed(winner) => state.promote(winner, now),
            _ => debug!(reason = vote.reason().code(), history = self.history.len(), "display held"),
        }
        vote
    }

    /// Majority over the vote window, or the reason there is none.
    /// Among equally frequent labels the one seen first wins.
    pub fn majority(&self) -> Result<Observation, Vote> {
        if self.history.len() < VOTE_WINDOW {
            return Err(Vote::InsufficientHistory);
        }

        let mut counts: Vec<(StatusKind, usize)> = Vec::with_capacity(VOTE_WINDOW);
        let mut best_confidence = f64::MIN;
        for obs in self.history.recent(VOTE_WINDOW) {
            best_confidence = best_confidence.max(obs.confidence);
            match counts.iter_mut().find(|(label, _)| *label == obs.label) {
                Some((_, count)) => *count += 1,
                None => counts.push((obs.label, 1)),
            }
        }

        let (mode, count) = counts
            .iter()
            .copied()
            .fold(None, |best: Option<(StatusKind, usize)>, entry| match best {
                Some(b) if b.1 >= entry.1 => Some(b),
                _ => Some(entry),
            })
            .ok_or(Vote::InsufficientHistory)?;

        if count < VOTE_MIN_AGREEMENT {
            return Err(Vote::NoMajority);
        }
        if best_confidence <= self.promotion_confidence {
            return Err(Vote::WeakMajority);
        }
        Ok(Observation::new(mode, best_confidence))
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Forget all observations
    pub fn clear(&mut self) {
        self.history.clear();
    }
}
