//! Per-step diagnostics for external logging and evaluation

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::{Cell, Difficulty, Format};
use crate::env::observation::Observation;

/// Why an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// The chosen cell has no items
    EmptyCell,
    /// The student quit
    LowEngagement,
    /// The step limit was reached
    TimeLimit,
}

impl EndReason {
    pub fn as_str(self) -> &'static str {
        match self {
            EndReason::EmptyCell => "empty_cell",
            EndReason::LowEngagement => "low_engagement",
            EndReason::TimeLimit => "time_limit",
        }
    }
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnostics for one step
///
/// The interaction fields are absent when the step short-circuited on an
/// empty cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub format: Format,
    pub difficulty: Difficulty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p_correct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<EndReason>,
}

impl Diagnostics {
    pub(crate) fn empty_cell(cell: Cell) -> Self {
        Self {
            format: cell.format,
            difficulty: cell.difficulty,
            p_correct: None,
            correct: None,
            engagement: None,
            item_id: None,
            reason: Some(EndReason::EmptyCell),
        }
    }

    pub fn cell(&self) -> Cell {
        Cell::new(self.format, self.difficulty)
    }

    /// Diagnostics as a string-keyed JSON object
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Everything `TutorEnv::step` returns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub observation: Observation,
    pub reward: f64,
    pub terminated: bool,
    pub truncated: bool,
    pub diagnostics: Diagnostics,
}

impl StepOutcome {
    pub fn is_done(&self) -> bool {
        self.terminated || self.truncated
    }

    /// Reason the episode ended here, if it did
    ///
    /// The environment only records terminal reasons; truncation without
    /// one is reported as `TimeLimit`.
    pub fn end_reason(&self) -> Option<EndReason> {
        match self.diagnostics.reason {
            Some(reason) => Some(reason),
            None if self.truncated => Some(EndReason::TimeLimit),
            None if self.terminated => Some(EndReason::LowEngagement),
            None => None,
        }
    }
}
