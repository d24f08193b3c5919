//! Observation vector handed to the policy

use serde::{Deserialize, Serialize};

pub const OBSERVATION_DIM: usize = 6;

/// Lower bounds of each observation component
pub const OBSERVATION_LOW: [f32; OBSERVATION_DIM] = [-3.0, 0.0, 0.0, 0.0, 0.0, 0.0];

/// Upper bounds of each observation component
pub const OBSERVATION_HIGH: [f32; OBSERVATION_DIM] = [3.0, 5.0, 1.0, 1.0, 1.0, 1.0];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub belief_estimate: f64,
    pub belief_uncertainty: f64,
    pub engagement: f64,
    /// 1.0 if the last answer was correct, else 0.0
    pub last_correct: f64,
    /// (last difficulty - 1) / 4
    pub last_difficulty: f64,
    pub last_reading_load: f64,
}

impl Observation {
    /// Flat vector in the fixed component order
    pub fn to_array(&self) -> [f32; OBSERVATION_DIM] {
        [
            self.belief_estimate as f32,
            self.belief_uncertainty as f32,
            self.engagement as f32,
            self.last_correct as f32,
            self.last_difficulty as f32,
            self.last_reading_load as f32,
        ]
    }

    pub fn within_bounds(&self) -> bool {
        self.to_array()
            .iter()
            .zip(OBSERVATION_LOW.iter().zip(OBSERVATION_HIGH.iter()))
            .all(|(v, (lo, hi))| v >= lo && v <= hi)
    }
}
