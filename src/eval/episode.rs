//! Running one policy through one episode

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::env::{EndReason, TutorEnv};
use crate::policy::Policy;

/// Outcome of a single episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeResult {
    pub return_sum: f64,
    pub steps: u32,
    /// Student quit (low engagement)
    pub abandoned: bool,
    /// Session ran to the step limit
    pub completed: bool,
    pub reason: Option<EndReason>,
}

/// Reset with `seed` and step until the episode terminates or truncates
pub fn run_episode(
    env: &mut TutorEnv,
    policy: &mut dyn Policy,
    rng: &mut dyn RngCore,
    seed: u64,
) -> Result<EpisodeResult> {
    let mut observation = env.reset(Some(seed));
    let mut return_sum = 0.0;
    let mut steps = 0;

    let reason = loop {
        let action = policy.act(&observation, rng);
        let outcome = env.step(action)?;
        return_sum += outcome.reward;
        steps += 1;
        observation = outcome.observation;
        if outcome.is_done() {
            break outcome.end_reason();
        }
    };

    Ok(EpisodeResult {
        return_sum,
        steps,
        abandoned: reason == Some(EndReason::LowEngagement),
        completed: reason == Some(EndReason::TimeLimit),
        reason,
    })
}
