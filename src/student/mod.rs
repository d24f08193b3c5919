//! Simulated student
//!
//! A student is a small set of latent traits drawn once per episode. The
//! response functions turn those traits plus the current engagement into a
//! probability of answering correctly and an engagement update.

pub mod params;
pub mod response;

pub use params::{sample_student, StudentParams, RESPONSE_NOISE};
pub use response::{
    difficulty_bias, latent_score, p_correct, p_correct_mean, sigmoid, step_engagement,
};
