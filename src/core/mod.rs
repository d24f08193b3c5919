pub mod config;
pub mod error;
pub mod types;

pub use config::{BankConfig, EnvConfig, EvalConfig, TutorConfig};
pub use error::{Result, SchemaError, TutorError};
pub use types::{Action, Cell, Difficulty, Format};
