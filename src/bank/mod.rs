//! Question items and the bank they are drawn from

pub mod fraction;
pub mod item;
pub mod question_bank;
pub mod templates;

pub use fraction::Fraction;
pub use item::{Item, ItemRecord};
pub use question_bank::{write_jsonl, QuestionBank};
pub use templates::generate_bank;
