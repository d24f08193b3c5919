//! Question item schema
//!
//! `ItemRecord` is the raw shape of one line in a bank file. `Item` is the
//! validated, immutable form; the only way to obtain one is `Item::new`, which
//! enforces the cross-field rules between format, options and correct index.

use serde::{Deserialize, Serialize};

use crate::core::error::SchemaError;
use crate::core::types::{Cell, Difficulty, Format};

/// Number of options on a multiple-choice item
pub const MCQ_OPTIONS: usize = 4;

/// `correct_index` value for items without options
pub const NO_CORRECT_INDEX: i32 = -1;

pub const DEFAULT_TOPIC: &str = "frações";

fn default_topic() -> String {
    DEFAULT_TOPIC.to_string()
}

fn default_variation() -> u32 {
    1
}

fn default_correct_index() -> i32 {
    NO_CORRECT_INDEX
}

/// One item as it appears on disk; unknown fields are ignored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: String,
    #[serde(default = "default_topic")]
    pub topic: String,
    pub format: Format,
    pub difficulty: u8,
    #[serde(default = "default_variation")]
    pub variation: u32,
    pub statement: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default = "default_correct_index")]
    pub correct_index: i32,
    pub solution: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_load: Option<f64>,
}

/// A validated question item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ItemRecord", into = "ItemRecord")]
pub struct Item {
    id: String,
    topic: String,
    format: Format,
    difficulty: Difficulty,
    variation: u32,
    statement: String,
    options: Vec<String>,
    correct_index: i32,
    solution: String,
    skills: Vec<String>,
    tags: Vec<String>,
    reading_load: f64,
}

impl Item {
    /// Validate a record into an item
    ///
    /// A missing reading load is filled in from the format's default.
    pub fn new(record: ItemRecord) -> Result<Self, SchemaError> {
        let difficulty =
            Difficulty::new(record.difficulty).ok_or(SchemaError::Difficulty(record.difficulty))?;

        if record.variation < 1 {
            return Err(SchemaError::Variation(record.variation));
        }

        match record.format {
            Format::MultipleChoice => {
                if record.options.len() != MCQ_OPTIONS {
                    return Err(SchemaError::McqOptionCount(record.options.len()));
                }
                if !(0..MCQ_OPTIONS as i32).contains(&record.correct_index) {
                    return Err(SchemaError::McqCorrectIndex(record.correct_index));
                }
            }
            _ => {
                if !record.options.is_empty() {
                    return Err(SchemaError::UnexpectedOptions(record.options.len()));
                }
                if record.correct_index != NO_CORRECT_INDEX {
                    return Err(SchemaError::UnexpectedCorrectIndex(record.correct_index));
                }
            }
        }

        let reading_load = record
            .reading_load
            .unwrap_or_else(|| record.format.reading_load());
        if !(0.0..=1.0).contains(&reading_load) {
            return Err(SchemaError::ReadingLoad(reading_load));
        }

        Ok(Self {
            id: record.id,
            topic: record.topic,
            format: record.format,
            difficulty,
            variation: record.variation,
            statement: record.statement,
            options: record.options,
            correct_index: record.correct_index,
            solution: record.solution,
            skills: record.skills,
            tags: record.tags,
            reading_load,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn cell(&self) -> Cell {
        Cell::new(self.format, self.difficulty)
    }

    pub fn variation(&self) -> u32 {
        self.variation
    }

    pub fn statement(&self) -> &str {
        &self.statement
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Index of the correct option, `None` for open-answer formats
    pub fn correct_index(&self) -> Option<usize> {
        usize::try_from(self.correct_index).ok()
    }

    pub fn solution(&self) -> &str {
        &self.solution
    }

    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn reading_load(&self) -> f64 {
        self.reading_load
    }
}

impl TryFrom<ItemRecord> for Item {
    type Error = SchemaError;

    fn try_from(record: ItemRecord) -> Result<Self, SchemaError> {
        Item::new(record)
    }
}

impl From<Item> for ItemRecord {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            topic: item.topic,
            format: item.format,
            difficulty: item.difficulty.get(),
            variation: item.variation,
            statement: item.statement,
            options: item.options,
            correct_index: item.correct_index,
            solution: item.solution,
            skills: item.skills,
            tags: item.tags,
            reading_load: Some(item.reading_load),
        }
    }
}
