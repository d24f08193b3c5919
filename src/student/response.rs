//! Response and engagement dynamics
//!
//! Reading load couples the format choice to both the chance of a correct
//! answer and the rate at which engagement drains.

use rand::Rng;
use rand_distr::StandardNormal;

use crate::core::types::{Difficulty, Format};
use crate::student::params::StudentParams;

/// Latent score shift per difficulty level away from the middle (3)
const DIFFICULTY_SLOPE: f64 = 0.6;
const DIFFICULTY_CENTER: f64 = 3.0;

/// Weight of engagement (centered at 0.5) in the latent score
const ENGAGEMENT_WEIGHT: f64 = 0.8;

// Engagement deltas, applied additively per answered item
const LOAD_FATIGUE: f64 = 0.10;
const DIFFICULTY_FATIGUE: f64 = 0.03;
const CORRECT_BOOST: f64 = 0.06;
const INCORRECT_PENALTY: f64 = 0.02;
const SENSITIVE_LOAD_FATIGUE: f64 = 0.04;

pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Latent score offset of a difficulty level; zero at difficulty 3
pub fn difficulty_bias(difficulty: Difficulty) -> f64 {
    (f64::from(difficulty.get()) - DIFFICULTY_CENTER) * DIFFICULTY_SLOPE
}

/// Noise-free latent score of the student on an item
pub fn latent_score(
    params: &StudentParams,
    difficulty: Difficulty,
    format: Format,
    engagement: f64,
) -> f64 {
    params.theta
        - difficulty_bias(difficulty)
        - format.reading_load() * params.reading_sensitivity
        + ENGAGEMENT_WEIGHT * (engagement - 0.5)
}

/// Success probability with the noise held at its mean
pub fn p_correct_mean(
    params: &StudentParams,
    difficulty: Difficulty,
    format: Format,
    engagement: f64,
) -> f64 {
    sigmoid(latent_score(params, difficulty, format, engagement))
}

/// Success probability with one Gaussian jitter of the latent score
pub fn p_correct<R: Rng + ?Sized>(
    params: &StudentParams,
    difficulty: Difficulty,
    format: Format,
    engagement: f64,
    rng: &mut R,
) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    sigmoid(latent_score(params, difficulty, format, engagement) + z * params.noise)
}

/// Engagement after answering one item, clamped to [0, 1]
///
/// Heavy-reading formats always drain engagement; a correct answer on a light,
/// easy item can raise it.
pub fn step_engagement(
    params: &StudentParams,
    difficulty: Difficulty,
    format: Format,
    engagement: f64,
    correct: bool,
) -> f64 {
    let load = format.reading_load();
    let mut delta = -LOAD_FATIGUE * load - DIFFICULTY_FATIGUE * f64::from(difficulty.get() - 1);
    delta += if correct { CORRECT_BOOST } else { -INCORRECT_PENALTY };
    delta -= SENSITIVE_LOAD_FATIGUE * load * params.reading_sensitivity;
    (engagement + delta).clamp(0.0, 1.0)
}
