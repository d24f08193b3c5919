//! Question bank indexed by (format, difficulty) cell
//!
//! The bank is read-only once built. Sampling draws from the caller's random
//! source, so several environments can share one bank through an `Arc` and
//! still stay independently reproducible.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use ahash::AHashMap;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::bank::item::{Item, ItemRecord};
use crate::core::error::{Result, TutorError};
use crate::core::types::{Cell, Difficulty, Format};

#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    items: Vec<Item>,
    /// Cell -> indices into `items`; pools are never empty
    by_cell: AHashMap<Cell, Vec<usize>>,
}

impl QuestionBank {
    /// Build a bank from already-validated items
    pub fn from_items(items: Vec<Item>) -> Self {
        let mut by_cell: AHashMap<Cell, Vec<usize>> = AHashMap::new();
        for (i, item) in items.iter().enumerate() {
            by_cell.entry(item.cell()).or_default().push(i);
        }
        Self { items, by_cell }
    }

    /// Load a JSON Lines bank file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(TutorError::SourceNotFound(path.to_path_buf()));
        }
        let contents = fs::read_to_string(path)?;
        let bank = Self::from_jsonl_str(&contents)?;

        tracing::info!(
            "Loaded {} items into {} cells from {}",
            bank.len(),
            bank.by_cell.len(),
            path.display()
        );
        let missing = bank.missing_cells();
        if !missing.is_empty() {
            tracing::warn!(
                "Bank has no items for {} of {} cells; choosing them ends the episode",
                missing.len(),
                Cell::all().count()
            );
        }

        Ok(bank)
    }

    /// Parse bank contents, one record per non-blank line
    pub fn from_jsonl_str(contents: &str) -> Result<Self> {
        let mut items = Vec::new();
        for (i, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let line_no = i + 1;
            let record: ItemRecord = serde_json::from_str(line)
                .map_err(|source| TutorError::Parse { line: line_no, source })?;
            let item = Item::new(record)
                .map_err(|source| TutorError::Schema { line: line_no, source })?;
            items.push(item);
        }
        Ok(Self::from_items(items))
    }

    pub fn has_cell(&self, format: Format, difficulty: Difficulty) -> bool {
        self.cell_len(Cell::new(format, difficulty)) > 0
    }

    /// Draw one item uniformly from a cell's pool
    pub fn sample<R: Rng + ?Sized>(
        &self,
        format: Format,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Result<&Item> {
        let cell = Cell::new(format, difficulty);
        self.by_cell
            .get(&cell)
            .and_then(|pool| pool.choose(rng))
            .map(|&i| &self.items[i])
            .ok_or(TutorError::EmptyCell(cell))
    }

    pub fn cell_len(&self, cell: Cell) -> usize {
        self.by_cell.get(&cell).map_or(0, Vec::len)
    }

    /// Cells with no items, in action order
    pub fn missing_cells(&self) -> Vec<Cell> {
        Cell::all().filter(|c| self.cell_len(*c) == 0).collect()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Write items as a JSON Lines bank file, creating parent directories
pub fn write_jsonl(items: &[Item], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut out = BufWriter::new(fs::File::create(path)?);
    for item in items {
        serde_json::to_writer(&mut out, item)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::SchemaError;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const BANK: &str = r#"
{"id":"a","format":"short_text","difficulty":1,"statement":"s","solution":"t"}
{"id":"b","format":"short_text","difficulty":1,"statement":"s","solution":"t"}

{"id":"c","format":"multiple_choice","difficulty":3,"statement":"s","options":["1","2","3","4"],"correct_index":2,"solution":"t"}
"#;

    fn d(level: u8) -> Difficulty {
        Difficulty::new(level).unwrap()
    }

    #[test]
    fn test_pools_partition_items() {
        let bank = QuestionBank::from_jsonl_str(BANK).unwrap();
        assert_eq!(bank.len(), 3);
        assert!(bank.has_cell(Format::ShortText, d(1)));
        assert!(bank.has_cell(Format::MultipleChoice, d(3)));
        assert!(!bank.has_cell(Format::Visual, d(1)));
        assert_eq!(bank.missing_cells().len(), 18);
    }

    #[test]
    fn test_sample_stays_in_cell() {
        let bank = QuestionBank::from_jsonl_str(BANK).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..20 {
            let item = bank.sample(Format::ShortText, d(1), &mut rng).unwrap();
            assert!(item.id() == "a" || item.id() == "b");
        }
    }

    #[test]
    fn test_sample_empty_cell_errors() {
        let bank = QuestionBank::from_jsonl_str(BANK).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = bank.sample(Format::Scaffold, d(5), &mut rng).unwrap_err();
        assert!(matches!(err, TutorError::EmptyCell(c) if c.format == Format::Scaffold));
    }

    #[test]
    fn test_schema_violation_reports_line() {
        let bad = "\n{\"id\":\"x\",\"format\":\"multiple_choice\",\"difficulty\":1,\"statement\":\"s\",\"options\":[\"1\",\"2\",\"3\"],\"correct_index\":0,\"solution\":\"t\"}\n";
        let err = QuestionBank::from_jsonl_str(bad).unwrap_err();
        match err {
            TutorError::Schema { line, source } => {
                assert_eq!(line, 2);
                assert_eq!(source, SchemaError::McqOptionCount(3));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = QuestionBank::from_jsonl_str("{not json}").unwrap_err();
        assert!(matches!(err, TutorError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_missing_file_is_source_not_found() {
        let err = QuestionBank::load(Path::new("/nonexistent/bank.jsonl")).unwrap_err();
        assert!(matches!(err, TutorError::SourceNotFound(_)));
    }
}
