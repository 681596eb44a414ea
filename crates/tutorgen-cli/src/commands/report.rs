//! `tutorgen report` — performance report for a finished study session.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Table};

use tutorgen_core::report::SessionStats;
use tutorgen_providers::config::load_config_from;
use tutorgen_providers::Orchestrator;

use crate::session::StudySession;

pub async fn execute(session: PathBuf, config: Option<PathBuf>) -> Result<()> {
    let session = StudySession::load_json(&session)?;
    let request = session.to_report_request();

    let stats = SessionStats::from_request(&request)
        .map_err(|e| anyhow::anyhow!("cannot report on this session: {e}"))?;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["attempted", "correct", "score", "tier", "avg time", "hints"]);
    table.add_row(vec![
        stats.total_items.to_string(),
        stats.correct.to_string(),
        format!("{}/100", stats.score),
        stats.tier.to_string(),
        format!("{:.1}s", stats.average_time_secs),
        stats.hints_used.to_string(),
    ]);
    println!("{table}");

    let config = load_config_from(config.as_deref())?;
    let orchestrator = Orchestrator::from_config(&config);

    let response = orchestrator.generate_report(&request).await;
    let report = response
        .into_result()
        .map_err(|e| anyhow::anyhow!("report failed: {e}"))?;

    println!("\nperformance: {} ({}/100)", report.general.performance, report.general.score);
    print_list("strengths", &report.general.strengths);
    print_list("weaknesses", &report.general.weaknesses);
    print_list("patterns", &report.general.patterns);

    println!("\ntopic mastery: {}", report.topics.mastery_level);
    print_list("mastered", &report.topics.mastered_concepts);
    print_list("weak", &report.topics.weak_concepts);
    println!("appropriate difficulty: {}", report.topics.appropriate_difficulty);

    println!(
        "\nbehavior: {:.1}s per exercise, {} hint(s)",
        report.behavior.average_time_secs, report.behavior.hints_used
    );
    print_list("error patterns", &report.behavior.error_patterns);

    println!("\nrecommendations:");
    if let Some(difficulty) = report.recommendations.suggested_difficulty {
        println!("  suggested difficulty: {difficulty}");
    }
    print_list("  priority topics", &report.recommendations.priority_topics);
    print_list(
        "  topics to consolidate",
        &report.recommendations.topics_to_consolidate,
    );
    print_list("  strategies", &report.recommendations.strategies);
    print_list("  next objectives", &report.recommendations.next_objectives);

    Ok(())
}

fn print_list(label: &str, items: &[String]) {
    if !items.is_empty() {
        println!("{label}: {}", items.join("; "));
    }
}
