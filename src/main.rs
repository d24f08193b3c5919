//! Fraction Tutor - Baseline Evaluation
//!
//! Loads the run configuration and the item bank, evaluates the baseline
//! policies against the simulated student, and writes a JSON summary.

use std::path::Path;
use std::sync::Arc;

use fraction_tutor::bank::{generate_bank, write_jsonl, QuestionBank};
use fraction_tutor::core::error::{Result, TutorError};
use fraction_tutor::core::TutorConfig;
use fraction_tutor::eval::evaluate_baselines;

const CONFIG_PATH: &str = "data/tutor.toml";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("fraction_tutor=info")
        .init();

    let config_path = Path::new(CONFIG_PATH);
    let config = if config_path.exists() {
        TutorConfig::load(config_path)?
    } else {
        tracing::warn!("{} not found - using default configuration", CONFIG_PATH);
        TutorConfig::default()
    };

    let bank = match QuestionBank::load(&config.bank.path) {
        Ok(bank) => bank,
        Err(TutorError::SourceNotFound(path)) => {
            tracing::warn!(
                "Bank {} not found - generating {} template items per cell",
                path.display(),
                config.bank.items_per_cell
            );
            let items = generate_bank(config.bank.items_per_cell, config.bank.template_seed)?;
            write_jsonl(&items, &path)?;
            tracing::info!("Wrote {} template items to {}", items.len(), path.display());
            QuestionBank::from_items(items)
        }
        Err(e) => return Err(e),
    };
    let bank = Arc::new(bank);

    tracing::info!(
        "Evaluating baselines: {} episodes, {} steps each",
        config.eval.episodes,
        config.env.max_steps
    );
    let report = evaluate_baselines(&bank, &config.env, config.eval.episodes, config.eval.seed)?;

    report.write(&config.eval.output)?;
    tracing::info!("Wrote {}", config.eval.output.display());

    Ok(())
}
