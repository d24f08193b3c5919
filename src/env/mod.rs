//! Closed-loop tutoring environment
//!
//! Exposes a fixed observation/action/reward contract for external policies.

pub mod belief;
pub mod diagnostics;
pub mod environment;
pub mod observation;

pub use belief::{update_belief, Belief};
pub use diagnostics::{Diagnostics, EndReason, StepOutcome};
pub use environment::{EpisodeState, EpisodeStatus, TutorEnv};
pub use observation::{Observation, OBSERVATION_DIM, OBSERVATION_HIGH, OBSERVATION_LOW};
