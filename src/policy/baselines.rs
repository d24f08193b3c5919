//! Fixed heuristic policies

use std::fmt;
use std::str::FromStr;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::core::error::TutorError;
use crate::core::types::{Action, Cell, Difficulty, Format};
use crate::env::Observation;
use crate::policy::Policy;

/// Below this engagement the engagement-aware policy backs off
const LOW_ENGAGEMENT: f64 = 0.35;
/// Below this it drops all the way to difficulty 1
const CRITICAL_ENGAGEMENT: f64 = 0.25;
/// Above this reading load the engagement-aware policy backs off
const HEAVY_READING: f64 = 0.70;

/// Uniformly random cell
#[derive(Debug, Default, Clone)]
pub struct RandomPolicy;

impl Policy for RandomPolicy {
    fn name(&self) -> &str {
        "random"
    }

    fn act(&mut self, _observation: &Observation, rng: &mut dyn RngCore) -> Action {
        Action::wrapping(rng.gen_range(0..Action::COUNT))
    }
}

/// Multiple choice only: one level up after a correct answer, one down after a miss
#[derive(Debug, Default, Clone)]
pub struct StaircasePolicy;

impl StaircasePolicy {
    fn next_difficulty(observation: &Observation) -> Difficulty {
        let last = (observation.last_difficulty * 4.0).round() as i32 + 1;
        if observation.last_correct >= 0.5 {
            Difficulty::saturating(last + 1)
        } else {
            Difficulty::saturating(last - 1)
        }
    }
}

impl Policy for StaircasePolicy {
    fn name(&self) -> &str {
        "staircase"
    }

    fn act(&mut self, observation: &Observation, _rng: &mut dyn RngCore) -> Action {
        Action::from_cell(Cell::new(
            Format::MultipleChoice,
            Self::next_difficulty(observation),
        ))
    }
}

/// Staircase that retreats to easy items when engagement sags or reading load spikes
#[derive(Debug, Default, Clone)]
pub struct EngagementAwarePolicy;

impl Policy for EngagementAwarePolicy {
    fn name(&self) -> &str {
        "engagement"
    }

    fn act(&mut self, observation: &Observation, _rng: &mut dyn RngCore) -> Action {
        let difficulty = if observation.engagement < LOW_ENGAGEMENT
            || observation.last_reading_load > HEAVY_READING
        {
            if observation.engagement < CRITICAL_ENGAGEMENT {
                Difficulty::saturating(1)
            } else {
                Difficulty::saturating(2)
            }
        } else {
            StaircasePolicy::next_difficulty(observation)
        };
        Action::from_cell(Cell::new(Format::MultipleChoice, difficulty))
    }
}

/// The built-in baselines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineKind {
    Random,
    Staircase,
    Engagement,
}

impl BaselineKind {
    pub const ALL: [BaselineKind; 3] = [
        BaselineKind::Random,
        BaselineKind::Staircase,
        BaselineKind::Engagement,
    ];

    pub fn build(self) -> Box<dyn Policy> {
        match self {
            BaselineKind::Random => Box::new(RandomPolicy),
            BaselineKind::Staircase => Box::new(StaircasePolicy),
            BaselineKind::Engagement => Box::new(EngagementAwarePolicy),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BaselineKind::Random => "random",
            BaselineKind::Staircase => "staircase",
            BaselineKind::Engagement => "engagement",
        }
    }
}

impl fmt::Display for BaselineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BaselineKind {
    type Err = TutorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BaselineKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| TutorError::Config(format!("Unknown baseline policy: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn obs(
        engagement: f64,
        last_correct: f64,
        last_difficulty: u8,
        last_reading_load: f64,
    ) -> Observation {
        Observation {
            belief_estimate: 0.0,
            belief_uncertainty: 2.0,
            engagement,
            last_correct,
            last_difficulty: Difficulty::new(last_difficulty).unwrap().normalized(),
            last_reading_load,
        }
    }

    fn cell_of(action: Action) -> (Format, u8) {
        let c = action.cell();
        (c.format, c.difficulty.get())
    }

    #[test]
    fn test_staircase_steps_up_and_down() {
        let mut p = StaircasePolicy;
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(cell_of(p.act(&obs(1.0, 1.0, 2, 0.35), &mut rng)), (Format::MultipleChoice, 3));
        assert_eq!(cell_of(p.act(&obs(1.0, 0.0, 2, 0.35), &mut rng)), (Format::MultipleChoice, 1));
        assert_eq!(cell_of(p.act(&obs(1.0, 1.0, 5, 0.35), &mut rng)), (Format::MultipleChoice, 5));
        assert_eq!(cell_of(p.act(&obs(1.0, 0.0, 1, 0.35), &mut rng)), (Format::MultipleChoice, 1));
    }

    #[test]
    fn test_engagement_policy_backs_off() {
        let mut p = EngagementAwarePolicy;
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(cell_of(p.act(&obs(0.2, 1.0, 4, 0.35), &mut rng)).1, 1);
        assert_eq!(cell_of(p.act(&obs(0.3, 1.0, 4, 0.35), &mut rng)).1, 2);
        assert_eq!(cell_of(p.act(&obs(0.9, 1.0, 4, 0.8), &mut rng)).1, 2);
        // healthy engagement falls back to the staircase
        assert_eq!(cell_of(p.act(&obs(0.9, 1.0, 4, 0.35), &mut rng)).1, 5);
    }

    #[test]
    fn test_random_policy_covers_actions() {
        let mut p = RandomPolicy;
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let o = obs(1.0, 0.0, 1, 0.2);
        let mut seen = [false; Action::COUNT];
        for _ in 0..2000 {
            seen[p.act(&o, &mut rng).index()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_baseline_kind_parses() {
        assert_eq!("staircase".parse::<BaselineKind>().unwrap(), BaselineKind::Staircase);
        assert!("ppo".parse::<BaselineKind>().is_err());
        assert_eq!(BaselineKind::Engagement.build().name(), "engagement");
    }
}
