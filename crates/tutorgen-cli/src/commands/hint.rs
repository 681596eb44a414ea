//! `tutorgen hint` — ask for the next hint on an exercise.

use std::path::PathBuf;

use anyhow::Result;

use tutorgen_core::model::{Difficulty, HintRequest};
use tutorgen_providers::config::load_config_from;
use tutorgen_providers::Orchestrator;

pub async fn execute(
    statement: String,
    topic: String,
    difficulty: Difficulty,
    given: Vec<String>,
    config: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config.as_deref())?;
    let orchestrator = Orchestrator::from_config(&config);

    let request = HintRequest {
        statement,
        difficulty,
        topic,
        previous_hints: given,
    };

    let response = orchestrator.generate_hint(&request).await;
    let hint = response
        .into_result()
        .map_err(|e| anyhow::anyhow!("hint failed: {e}"))?;

    println!("{}", hint.hint);
    Ok(())
}
