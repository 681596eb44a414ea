//! `tutorgen generate` — generate a batch of practice exercises.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Table};

use tutorgen_core::model::{Difficulty, ExerciseRequest};
use tutorgen_providers::config::load_config_from;
use tutorgen_providers::Orchestrator;

use crate::session::StudySession;

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    grade: String,
    topic: String,
    difficulty: Difficulty,
    count: u32,
    language: String,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(count > 0, "--count must be positive");

    let config = load_config_from(config.as_deref())?;
    let orchestrator = Orchestrator::from_config(&config);

    let request = ExerciseRequest {
        grade: grade.clone(),
        topic: topic.clone(),
        difficulty,
        count,
        language,
        personalization: None,
    };

    tracing::info!(provider = orchestrator.active_provider(), count, "generating exercises");
    let response = orchestrator.generate_exercises(&request).await;
    let batch = response
        .into_result()
        .map_err(|e| anyhow::anyhow!("generation failed: {e}"))?;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["id", "statement", "answer", "options", "hints"]);
    for exercise in &batch.exercises {
        table.add_row(vec![
            exercise.id.clone(),
            exercise.statement.clone(),
            exercise.correct_answer.clone(),
            exercise.options.len().to_string(),
            exercise.hints.len().to_string(),
        ]);
    }
    println!("{table}");
    println!(
        "{} exercises ({}, ~{} min){}",
        batch.metadata.total_generated,
        batch.metadata.difficulty,
        batch.metadata.estimated_time_minutes,
        if batch.metadata.personalized {
            ", personalized"
        } else {
            ""
        },
    );

    if let Some(path) = output {
        let session = StudySession::new(&grade, &topic, batch.exercises);
        session.save_json(&path)?;
        println!("session written to {}", path.display());
    }

    Ok(())
}
