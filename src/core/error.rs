use std::path::PathBuf;

use thiserror::Error;

use crate::core::types::Cell;

#[derive(Error, Debug)]
pub enum TutorError {
    #[error("Bank not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed record on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Schema violation on line {line}: {source}")]
    Schema {
        line: usize,
        #[source]
        source: SchemaError,
    },

    #[error("Generated item failed validation: {0}")]
    Generation(#[from] SchemaError),

    #[error("No items for cell {0}")]
    EmptyCell(Cell),

    #[error("Invalid action: {0} (expected 0..20)")]
    InvalidAction(usize),

    #[error("Invalid difficulty: {0} (expected 1..=5)")]
    InvalidDifficulty(u8),

    #[error("Episode not started: call reset() first")]
    EpisodeNotStarted,

    #[error("Episode already ended: call reset() to start a new one")]
    EpisodeFinished,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Cross-field violations of the item schema.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("multiple_choice items need exactly 4 options, got {0}")]
    McqOptionCount(usize),

    #[error("multiple_choice correct_index must be in 0..=3, got {0}")]
    McqCorrectIndex(i32),

    #[error("non-multiple_choice items must have no options, got {0}")]
    UnexpectedOptions(usize),

    #[error("non-multiple_choice correct_index must be -1, got {0}")]
    UnexpectedCorrectIndex(i32),

    #[error("difficulty must be in 1..=5, got {0}")]
    Difficulty(u8),

    #[error("variation must be >= 1, got {0}")]
    Variation(u32),

    #[error("reading_load must be in [0, 1], got {0}")]
    ReadingLoad(f64),
}

pub type Result<T> = std::result::Result<T, TutorError>;
