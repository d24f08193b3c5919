//! Tutor-side estimate of the student's skill
//!
//! A heuristic tracker, not a posterior: the estimate moves by a
//! difficulty-scaled gain and the uncertainty decays geometrically on every
//! observation regardless of how informative it was.

use serde::{Deserialize, Serialize};

use crate::core::types::Difficulty;

pub const ESTIMATE_BOUND: f64 = 3.0;
pub const INITIAL_UNCERTAINTY: f64 = 2.0;
pub const UNCERTAINTY_FLOOR: f64 = 0.2;
pub const UNCERTAINTY_DECAY: f64 = 0.96;

const BASE_GAIN: f64 = 0.18;
const GAIN_PER_LEVEL: f64 = 0.05;
/// Gain multiplier after a wrong answer (small negative step)
const INCORRECT_GAIN_FACTOR: f64 = -0.12;
/// Reading-heavy items say less about skill
const READING_DAMPING: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Belief {
    pub estimate: f64,
    pub uncertainty: f64,
}

impl Default for Belief {
    fn default() -> Self {
        Self {
            estimate: 0.0,
            uncertainty: INITIAL_UNCERTAINTY,
        }
    }
}

impl Belief {
    pub fn updated(self, difficulty: Difficulty, reading_load: f64, correct: bool) -> Belief {
        let (estimate, uncertainty) = update_belief(
            self.estimate,
            self.uncertainty,
            difficulty,
            reading_load,
            correct,
        );
        Belief { estimate, uncertainty }
    }
}

/// Returns the new (estimate, uncertainty)
pub fn update_belief(
    estimate: f64,
    uncertainty: f64,
    difficulty: Difficulty,
    reading_load: f64,
    correct: bool,
) -> (f64, f64) {
    let mut gain = BASE_GAIN + GAIN_PER_LEVEL * f64::from(difficulty.get() - 1);
    if !correct {
        gain *= INCORRECT_GAIN_FACTOR;
    }
    gain *= 1.0 - READING_DAMPING * reading_load;

    let estimate = (estimate + gain).clamp(-ESTIMATE_BOUND, ESTIMATE_BOUND);
    let uncertainty = (uncertainty * UNCERTAINTY_DECAY).max(UNCERTAINTY_FLOOR);
    (estimate, uncertainty)
}
