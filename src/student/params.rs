//! Latent traits of a simulated student

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Range of the latent skill level
pub const THETA_RANGE: (f64, f64) = (-1.5, 1.5);

/// Range of how strongly reading effort hurts the student
pub const READING_SENSITIVITY_RANGE: (f64, f64) = (0.0, 2.0);

/// Standard deviation of the per-answer latent score jitter
pub const RESPONSE_NOISE: f64 = 0.15;

/// One student's traits, fixed for the length of an episode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StudentParams {
    /// Latent skill at fractions
    pub theta: f64,
    /// How much reading load lowers performance and engagement
    pub reading_sensitivity: f64,
    pub noise: f64,
}

impl StudentParams {
    pub fn new(theta: f64, reading_sensitivity: f64) -> Self {
        Self {
            theta,
            reading_sensitivity,
            noise: RESPONSE_NOISE,
        }
    }
}

/// Draw a fresh student
pub fn sample_student<R: Rng + ?Sized>(rng: &mut R) -> StudentParams {
    let theta = rng.gen_range(THETA_RANGE.0..=THETA_RANGE.1);
    let reading_sensitivity =
        rng.gen_range(READING_SENSITIVITY_RANGE.0..=READING_SENSITIVITY_RANGE.1);
    StudentParams::new(theta, reading_sensitivity)
}
