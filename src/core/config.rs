//! Run configuration loaded from TOML
//!
//! Every field has a default, so an empty file (or no file at all) yields the
//! standard 20-question session setup.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, TutorError};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TutorConfig {
    pub env: EnvConfig,
    pub bank: BankConfig,
    pub eval: EvalConfig,
}

/// Settings for a single tutoring environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    /// Questions per episode before the session is truncated
    pub max_steps: u32,

    /// Seed for the environment's random source at construction
    ///
    /// `reset(Some(seed))` overrides this for a single episode.
    pub seed: u64,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            max_steps: 20,
            seed: 0,
        }
    }
}

/// Where the item bank comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankConfig {
    /// JSON Lines bank file
    pub path: PathBuf,

    /// Items per cell when the template generator fills in a missing bank
    pub items_per_cell: u32,

    /// Seed for the template generator
    pub template_seed: u64,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/items_bank.jsonl"),
            items_per_cell: 10,
            template_seed: 0,
        }
    }
}

/// Baseline evaluation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    pub episodes: u32,
    pub seed: u64,
    /// Destination of the JSON summary
    pub output: PathBuf,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            episodes: 200,
            seed: 1,
            output: PathBuf::from("runs/eval/summary.json"),
        }
    }
}

impl TutorConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            TutorError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: TutorConfig = toml::from_str(contents)
            .map_err(|e| TutorError::Config(format!("Failed to parse config TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.env.max_steps == 0 {
            return Err(TutorError::Config("env.max_steps must be at least 1".into()));
        }
        if self.bank.items_per_cell == 0 {
            return Err(TutorError::Config("bank.items_per_cell must be at least 1".into()));
        }
        if self.eval.episodes == 0 {
            return Err(TutorError::Config("eval.episodes must be at least 1".into()));
        }
        Ok(())
    }
}
