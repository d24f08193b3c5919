//! Aggregate statistics over evaluated episodes

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::eval::episode::EpisodeResult;

/// Summary of one policy's episodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicySummary {
    pub episodes: usize,
    pub mean_return: f64,
    /// Sample standard deviation; 0 with fewer than two episodes
    pub std_return: f64,
    pub abandon_rate: f64,
    pub mean_steps: f64,
    pub complete_rate: f64,
    /// Episode count per end reason
    pub reasons: BTreeMap<String, usize>,
}

impl PolicySummary {
    pub fn from_episodes(episodes: &[EpisodeResult]) -> Self {
        let n = episodes.len();
        let mean_return = mean_of(episodes, |e| e.return_sum);
        let std_return = if n > 1 {
            let ss: f64 = episodes
                .iter()
                .map(|e| (e.return_sum - mean_return).powi(2))
                .sum();
            (ss / (n - 1) as f64).sqrt()
        } else {
            0.0
        };

        let mut reasons = BTreeMap::new();
        for e in episodes {
            let key = e.reason.map_or("unknown", |r| r.as_str());
            *reasons.entry(key.to_string()).or_insert(0) += 1;
        }

        Self {
            episodes: n,
            mean_return,
            std_return,
            abandon_rate: mean_of(episodes, |e| if e.abandoned { 1.0 } else { 0.0 }),
            mean_steps: mean_of(episodes, |e| f64::from(e.steps)),
            complete_rate: mean_of(episodes, |e| if e.completed { 1.0 } else { 0.0 }),
            reasons,
        }
    }

    pub fn summary_line(&self) -> String {
        format!(
            "return {:.3} ± {:.3}, abandon {:.1}%, complete {:.1}%, {:.1} steps",
            self.mean_return,
            self.std_return,
            self.abandon_rate * 100.0,
            self.complete_rate * 100.0,
            self.mean_steps,
        )
    }
}

fn mean_of(episodes: &[EpisodeResult], f: impl Fn(&EpisodeResult) -> f64) -> f64 {
    if episodes.is_empty() {
        return 0.0;
    }
    episodes.iter().map(f).sum::<f64>() / episodes.len() as f64
}

/// Summaries keyed by policy name; serializes as a plain name -> summary map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvaluationReport {
    pub policies: BTreeMap<String, PolicySummary>,
}

impl EvaluationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, summary: PolicySummary) {
        self.policies.insert(name.into(), summary);
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as pretty JSON, creating parent directories
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
