//! Tutoring environment
//!
//! Each step the tutor picks a (format, difficulty) cell, an item is drawn
//! from that cell, the simulated student answers, and engagement and the
//! tutor's belief are updated.
//!
//! ## Step order
//!
//! 1. Decode the action into a cell
//! 2. Draw an item; an empty cell ends the episode with a fixed penalty and
//!    no student interaction
//! 3. Draw the student's answer
//! 4. Update engagement, history and belief
//! 5. Reward: correctness, quit penalty, uncertainty-reduction bonus
//! 6. Advance the step counter and check the step limit
//!
//! One ChaCha8 stream drives every random draw, so the same reset seed and
//! action sequence reproduce the same trajectory.

use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::bank::QuestionBank;
use crate::core::config::EnvConfig;
use crate::core::error::{Result, TutorError};
use crate::core::types::{Action, Difficulty};
use crate::env::belief::Belief;
use crate::env::diagnostics::{Diagnostics, EndReason, StepOutcome};
use crate::env::observation::Observation;
use crate::student::{p_correct, sample_student, step_engagement, StudentParams};

/// Reward for choosing a cell with no items
pub const EMPTY_CELL_PENALTY: f64 = -3.0;
pub const CORRECT_REWARD: f64 = 1.0;
pub const INCORRECT_REWARD: f64 = -0.4;

/// Engagement at or below this means the student quits
pub const QUIT_THRESHOLD: f64 = 0.12;
pub const QUIT_PENALTY: f64 = 5.0;

/// Weight of the uncertainty-reduction shaping bonus
pub const UNCERTAINTY_BONUS: f64 = 0.05;

const INITIAL_ENGAGEMENT: f64 = 1.0;
/// Reading load reported before the first item (short_text level)
const INITIAL_READING_LOAD: f64 = 0.2;

/// Where the current episode stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeStatus {
    /// No reset yet
    NotStarted,
    Active,
    /// Ended by the environment (takes precedence if truncated on the same step)
    Terminated(EndReason),
    /// Step limit reached
    Truncated,
}

impl EpisodeStatus {
    pub fn is_over(self) -> bool {
        matches!(self, EpisodeStatus::Terminated(_) | EpisodeStatus::Truncated)
    }
}

/// Mutable per-episode record
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeState {
    pub steps: u32,
    pub engagement: f64,
    pub last_correct: bool,
    pub last_difficulty: Difficulty,
    pub last_reading_load: f64,
    pub belief: Belief,
    pub status: EpisodeStatus,
}

impl EpisodeState {
    fn fresh() -> Self {
        Self {
            steps: 0,
            engagement: INITIAL_ENGAGEMENT,
            last_correct: false,
            last_difficulty: Difficulty::EASIEST,
            last_reading_load: INITIAL_READING_LOAD,
            belief: Belief::default(),
            status: EpisodeStatus::NotStarted,
        }
    }
}

pub struct TutorEnv {
    bank: Arc<QuestionBank>,
    config: EnvConfig,
    rng: ChaCha8Rng,
    student: Option<StudentParams>,
    state: EpisodeState,
}

impl TutorEnv {
    pub fn new(bank: Arc<QuestionBank>, config: EnvConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self {
            bank,
            config,
            rng,
            student: None,
            state: EpisodeState::fresh(),
        }
    }

    /// Start a new episode with a freshly sampled student
    ///
    /// `Some(seed)` reseeds the random source; `None` continues the current stream.
    pub fn reset(&mut self, seed: Option<u64>) -> Observation {
        self.reseed(seed);
        let student = sample_student(&mut self.rng);
        self.begin(student)
    }

    /// Start a new episode with a given student
    pub fn reset_with_student(&mut self, seed: Option<u64>, student: StudentParams) -> Observation {
        self.reseed(seed);
        self.begin(student)
    }

    fn reseed(&mut self, seed: Option<u64>) {
        if let Some(seed) = seed {
            self.rng = ChaCha8Rng::seed_from_u64(seed);
        }
    }

    fn begin(&mut self, student: StudentParams) -> Observation {
        self.student = Some(student);
        self.state = EpisodeState::fresh();
        self.state.status = EpisodeStatus::Active;
        tracing::debug!(
            "Episode reset: theta={:.3}, reading_sensitivity={:.3}",
            student.theta,
            student.reading_sensitivity
        );
        self.observation()
    }

    pub fn step(&mut self, action: Action) -> Result<StepOutcome> {
        match self.state.status {
            EpisodeStatus::NotStarted => return Err(TutorError::EpisodeNotStarted),
            status if status.is_over() => return Err(TutorError::EpisodeFinished),
            _ => {}
        }
        let student = self.student.ok_or(TutorError::EpisodeNotStarted)?;

        let cell = action.cell();
        let (format, difficulty) = (cell.format, cell.difficulty);

        let sampled = self
            .bank
            .sample(format, difficulty, &mut self.rng)
            .map(|item| (item.reading_load(), item.id().to_string()));
        let (reading_load, item_id) = match sampled {
            Ok(drawn) => drawn,
            Err(TutorError::EmptyCell(_)) => {
                self.state.status = EpisodeStatus::Terminated(EndReason::EmptyCell);
                tracing::debug!("Episode terminated: no items for cell {}", cell);
                return Ok(StepOutcome {
                    observation: self.observation(),
                    reward: EMPTY_CELL_PENALTY,
                    terminated: true,
                    truncated: false,
                    diagnostics: Diagnostics::empty_cell(cell),
                });
            }
            Err(e) => return Err(e),
        };

        let p = p_correct(&student, difficulty, format, self.state.engagement, &mut self.rng);
        let correct = self.rng.gen::<f64>() < p;

        self.state.engagement =
            step_engagement(&student, difficulty, format, self.state.engagement, correct);

        self.state.last_correct = correct;
        self.state.last_difficulty = difficulty;
        self.state.last_reading_load = reading_load;

        let prior_uncertainty = self.state.belief.uncertainty;
        self.state.belief = self.state.belief.updated(difficulty, reading_load, correct);

        let mut reward = if correct { CORRECT_REWARD } else { INCORRECT_REWARD };

        let mut reason = None;
        let terminated = self.state.engagement <= QUIT_THRESHOLD;
        if terminated {
            reward -= QUIT_PENALTY;
            reason = Some(EndReason::LowEngagement);
        }

        reward += UNCERTAINTY_BONUS * (prior_uncertainty - self.state.belief.uncertainty);

        self.state.steps += 1;
        let truncated = self.state.steps >= self.config.max_steps;

        self.state.status = if terminated {
            EpisodeStatus::Terminated(EndReason::LowEngagement)
        } else if truncated {
            EpisodeStatus::Truncated
        } else {
            EpisodeStatus::Active
        };
        if self.state.status.is_over() {
            tracing::debug!(
                "Episode ended after {} steps: terminated={}, truncated={}, engagement={:.3}",
                self.state.steps,
                terminated,
                truncated,
                self.state.engagement
            );
        }

        Ok(StepOutcome {
            observation: self.observation(),
            reward,
            terminated,
            truncated,
            diagnostics: Diagnostics {
                format,
                difficulty,
                p_correct: Some(p),
                correct: Some(correct),
                engagement: Some(self.state.engagement),
                item_id: Some(item_id),
                reason,
            },
        })
    }

    pub fn observation(&self) -> Observation {
        Observation {
            belief_estimate: self.state.belief.estimate,
            belief_uncertainty: self.state.belief.uncertainty,
            engagement: self.state.engagement,
            last_correct: if self.state.last_correct { 1.0 } else { 0.0 },
            last_difficulty: self.state.last_difficulty.normalized(),
            last_reading_load: self.state.last_reading_load,
        }
    }

    pub fn state(&self) -> &EpisodeState {
        &self.state
    }

    pub fn status(&self) -> EpisodeStatus {
        self.state.status
    }

    pub fn student(&self) -> Option<&StudentParams> {
        self.student.as_ref()
    }

    pub fn steps(&self) -> u32 {
        self.state.steps
    }

    pub fn engagement(&self) -> f64 {
        self.state.engagement
    }

    pub fn belief(&self) -> Belief {
        self.state.belief
    }

    pub fn bank(&self) -> &Arc<QuestionBank> {
        &self.bank
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::generate_bank;
    use crate::core::types::Format;

    fn full_env(max_steps: u32) -> TutorEnv {
        let bank = QuestionBank::from_items(generate_bank(2, 0).unwrap());
        TutorEnv::new(Arc::new(bank), EnvConfig { max_steps, seed: 0 })
    }

    fn action(i: usize) -> Action {
        Action::new(i).unwrap()
    }

    #[test]
    fn test_reset_observation() {
        let mut env = full_env(20);
        let obs = env.reset(Some(0));
        assert_eq!(obs.belief_estimate, 0.0);
        assert_eq!(obs.belief_uncertainty, 2.0);
        assert_eq!(obs.engagement, 1.0);
        assert_eq!(obs.last_correct, 0.0);
        assert_eq!(obs.last_difficulty, 0.0);
        assert_eq!(obs.last_reading_load, 0.2);
        assert_eq!(env.status(), EpisodeStatus::Active);
    }

    #[test]
    fn test_step_before_reset_errors() {
        let mut env = full_env(20);
        assert!(matches!(env.step(action(0)), Err(TutorError::EpisodeNotStarted)));
    }

    #[test]
    fn test_step_after_truncation_errors() {
        let mut env = full_env(1);
        env.reset_with_student(Some(0), StudentParams::new(1.5, 0.0));
        let out = env.step(action(0)).unwrap();
        assert!(out.truncated);
        assert!(matches!(env.step(action(0)), Err(TutorError::EpisodeFinished)));

        env.reset(Some(1));
        assert!(env.step(action(0)).is_ok());
    }

    #[test]
    fn test_step_records_history() {
        let mut env = full_env(20);
        env.reset(Some(3));
        let out = env.step(action(13)).unwrap();
        assert_eq!(out.diagnostics.format, Format::Visual);
        assert_eq!(out.diagnostics.difficulty.get(), 4);
        assert_eq!(out.observation.last_difficulty, 0.75);
        assert_eq!(out.observation.last_reading_load, Format::Visual.reading_load());
        assert!((out.observation.belief_uncertainty - 1.92).abs() < 1e-12);
        assert_eq!(env.steps(), 1);
    }

    #[test]
    fn test_reward_decomposition() {
        let mut env = full_env(20);
        env.reset(Some(5));
        let out = env.step(action(0)).unwrap();
        let base = if out.diagnostics.correct == Some(true) { 1.0 } else { -0.4 };
        let shaping = 0.05 * (2.0 - out.observation.belief_uncertainty);
        assert!((out.reward - (base + shaping)).abs() < 1e-12);
    }

    #[test]
    fn test_empty_bank_ends_on_any_action() {
        for i in 0..Action::COUNT {
            let mut env = TutorEnv::new(
                Arc::new(QuestionBank::default()),
                EnvConfig { max_steps: 20, seed: 0 },
            );
            let initial = env.reset(Some(0));
            let out = env.step(action(i)).unwrap();
            assert_eq!(out.reward, EMPTY_CELL_PENALTY);
            assert!(out.terminated);
            assert_eq!(out.diagnostics.reason, Some(EndReason::EmptyCell));
            assert_eq!(out.diagnostics.cell(), action(i).cell());
            assert_eq!(out.observation, initial);
            assert_eq!(env.steps(), 0);
        }
    }

    #[test]
    fn test_item_id_from_requested_cell() {
        let mut env = full_env(20);
        env.reset(Some(8));
        let out = env.step(action(19)).unwrap();
        let id = out.diagnostics.item_id.unwrap();
        assert!(id.contains("scaffold_d5"), "{id}");
    }
}
