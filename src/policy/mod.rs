//! Policies that choose the next question cell
//!
//! The environment only consumes the `Policy` interface. The baselines here
//! are fixed heuristics used as reference points for learned policies.

pub mod baselines;

use rand::RngCore;

use crate::core::types::Action;
use crate::env::Observation;

pub use baselines::{BaselineKind, EngagementAwarePolicy, RandomPolicy, StaircasePolicy};

/// Maps an observation to an action
pub trait Policy: Send {
    fn name(&self) -> &str;

    fn act(&mut self, observation: &Observation, rng: &mut dyn RngCore) -> Action;
}
