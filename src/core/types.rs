//! Core type definitions used throughout the codebase

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, TutorError};

/// Presentation format of a question item
///
/// The declaration order is the action-encoding order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    ShortText,
    MultipleChoice,
    Visual,
    Scaffold,
}

impl Format {
    pub const ALL: [Format; 4] = [
        Format::ShortText,
        Format::MultipleChoice,
        Format::Visual,
        Format::Scaffold,
    ];

    /// Position of this format in the action encoding
    pub fn index(self) -> usize {
        match self {
            Format::ShortText => 0,
            Format::MultipleChoice => 1,
            Format::Visual => 2,
            Format::Scaffold => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Format> {
        Self::ALL.get(index).copied()
    }

    /// Default reading load for items of this format
    ///
    /// Heavier formats cost the student more effort to read, which both
    /// lowers the chance of a correct answer and drains engagement.
    pub fn reading_load(self) -> f64 {
        match self {
            Format::ShortText => 0.20,
            Format::MultipleChoice => 0.35,
            Format::Visual => 0.45,
            Format::Scaffold => 0.70,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Format::ShortText => "short_text",
            Format::MultipleChoice => "multiple_choice",
            Format::Visual => "visual",
            Format::Scaffold => "scaffold",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Item difficulty level, 1 (easiest) through 5 (hardest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;
    pub const COUNT: usize = (Self::MAX - Self::MIN + 1) as usize;
    pub const EASIEST: Difficulty = Difficulty(Self::MIN);

    pub fn new(level: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&level).then_some(Self(level))
    }

    /// Clamp an arbitrary level into 1..=5
    pub fn saturating(level: i32) -> Self {
        Self(level.clamp(i32::from(Self::MIN), i32::from(Self::MAX)) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Difficulty rescaled to [0, 1]
    pub fn normalized(self) -> f64 {
        f64::from(self.0 - Self::MIN) / f64::from(Self::MAX - Self::MIN)
    }

    pub fn all() -> impl Iterator<Item = Difficulty> {
        (Self::MIN..=Self::MAX).map(Difficulty)
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = TutorError;

    fn try_from(level: u8) -> Result<Self> {
        Difficulty::new(level).ok_or(TutorError::InvalidDifficulty(level))
    }
}

impl From<Difficulty> for u8 {
    fn from(d: Difficulty) -> u8 {
        d.0
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A (format, difficulty) pool of interchangeable items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub format: Format,
    pub difficulty: Difficulty,
}

impl Cell {
    pub fn new(format: Format, difficulty: Difficulty) -> Self {
        Self { format, difficulty }
    }

    /// Every cell, in action order
    pub fn all() -> impl Iterator<Item = Cell> {
        Format::ALL
            .into_iter()
            .flat_map(|format| Difficulty::all().map(move |d| Cell::new(format, d)))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.format, self.difficulty)
    }
}

/// Tutor action: an index into the 4 x 5 grid of cells
///
/// Encoded as `format_index * 5 + (difficulty - 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Action(u8);

impl Action {
    pub const COUNT: usize = Format::ALL.len() * Difficulty::COUNT;

    pub fn new(index: usize) -> Result<Self> {
        if index < Self::COUNT {
            Ok(Self(index as u8))
        } else {
            Err(TutorError::InvalidAction(index))
        }
    }

    /// Action for `index` modulo the action count
    pub fn wrapping(index: usize) -> Self {
        Self((index % Self::COUNT) as u8)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn cell(self) -> Cell {
        let i = self.index();
        let format = Format::ALL[i / Difficulty::COUNT];
        let difficulty = Difficulty(Difficulty::MIN + (i % Difficulty::COUNT) as u8);
        Cell::new(format, difficulty)
    }

    pub fn from_cell(cell: Cell) -> Self {
        let d = (cell.difficulty.get() - Difficulty::MIN) as usize;
        Self((cell.format.index() * Difficulty::COUNT + d) as u8)
    }

    pub fn all() -> impl Iterator<Item = Action> {
        (0..Self::COUNT as u8).map(Action)
    }
}

impl TryFrom<usize> for Action {
    type Error = TutorError;

    fn try_from(index: usize) -> Result<Self> {
        Action::new(index)
    }
}

impl From<Action> for usize {
    fn from(action: Action) -> usize {
        action.index()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.0, self.cell())
    }
}
