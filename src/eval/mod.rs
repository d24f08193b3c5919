//! Policy evaluation over many independent episodes
//!
//! Each episode gets its own environment and random streams, so episodes run
//! in parallel while the bank is shared read-only.

pub mod episode;
pub mod summary;

use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::bank::QuestionBank;
use crate::core::config::EnvConfig;
use crate::core::error::Result;
use crate::env::TutorEnv;
use crate::policy::BaselineKind;

pub use episode::{run_episode, EpisodeResult};
pub use summary::{EvaluationReport, PolicySummary};

/// Offset between environment seeds and policy RNG seeds
pub const POLICY_SEED_OFFSET: u64 = 10_000;

/// Seed of the policy RNG for episode `i`
pub fn policy_seed(seed: u64, i: u64) -> u64 {
    seed.wrapping_add(POLICY_SEED_OFFSET).wrapping_add(i)
}

/// Run `episodes` episodes of a baseline, results in episode order
///
/// Episode `i` seeds its environment with `seed + i` and its policy RNG with
/// `seed + 10_000 + i`, both wrapping at `u64::MAX`.
pub fn evaluate(
    bank: &Arc<QuestionBank>,
    env_config: &EnvConfig,
    kind: BaselineKind,
    episodes: u32,
    seed: u64,
) -> Result<Vec<EpisodeResult>> {
    (0..episodes)
        .into_par_iter()
        .map(|i| {
            let i = u64::from(i);
            let env_seed = seed.wrapping_add(i);
            let config = EnvConfig {
                seed: env_seed,
                ..env_config.clone()
            };
            let mut env = TutorEnv::new(Arc::clone(bank), config);
            let mut policy = kind.build();
            let mut rng = ChaCha8Rng::seed_from_u64(policy_seed(seed, i));
            run_episode(&mut env, policy.as_mut(), &mut rng, env_seed)
        })
        .collect()
}

/// Evaluate every baseline and collect their summaries
pub fn evaluate_baselines(
    bank: &Arc<QuestionBank>,
    env_config: &EnvConfig,
    episodes: u32,
    seed: u64,
) -> Result<EvaluationReport> {
    let mut report = EvaluationReport::new();
    for kind in BaselineKind::ALL {
        let results = evaluate(bank, env_config, kind, episodes, seed)?;
        let summary = PolicySummary::from_episodes(&results);
        tracing::info!("{:>10}: {}", kind.as_str(), summary.summary_line());
        report.insert(kind.as_str(), summary);
    }
    Ok(report)
}
