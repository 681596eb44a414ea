//! Prompt builders for the five generation operations.
//!
//! Pure functions: a request in, instruction text out. Each prompt embeds
//! every required field of the request, spells out the exact JSON shape
//! the reply must follow, and tells the backend to reply with only that
//! structure.

use std::fmt::Write;

use crate::model::{
    ExerciseRequest, ExplanationRequest, HintRequest, Recommendations, ReportRequest,
    ValidationRequest,
};
use crate::report::SessionStats;

/// Build the exercise-batch prompt.
pub fn exercises(request: &ExerciseRequest) -> String {
    let mut prompt = format!(
        "Generate {count} practice exercises for a grade {grade} student \
         on the topic \"{topic}\".\n\
         Difficulty: {difficulty}.\n\
         Write every statement, option, hint, and explanation in the language \"{language}\".\n\
         Each exercise must include 2 to 4 progressively more specific hints. \
         Multiple-choice exercises list their options in order; open-response \
         exercises use an empty options list.\n",
        count = request.count,
        grade = request.grade,
        topic = request.topic,
        difficulty = request.difficulty,
        language = request.language,
    );

    if let Some(personalization) = &request.personalization {
        prompt.push('\n');
        prompt.push_str(&personalization_block(personalization));
    }

    prompt.push_str(
        "\nReply with ONLY this JSON object and nothing else:\n\
         {\n\
         \x20 \"exercises\": [\n\
         \x20   {\n\
         \x20     \"id\": \"ex-1\",\n\
         \x20     \"statement\": \"...\",\n\
         \x20     \"options\": [\"...\"],\n\
         \x20     \"correct_answer\": \"...\",\n\
         \x20     \"explanation\": \"...\",\n\
         \x20     \"hints\": [\"...\"],\n\
         \x20     \"difficulty\": \"basic|medium|advanced\",\n\
         \x20     \"topic\": \"...\",\n\
         \x20     \"grade\": \"...\"\n\
         \x20   }\n\
         \x20 ]\n\
         }\n",
    );
    prompt
}

/// Previous-performance block appended when personalization data exists.
fn personalization_block(recommendations: &Recommendations) -> String {
    let mut block = String::from("Previous performance for this student:\n");
    if let Some(difficulty) = recommendations.suggested_difficulty {
        let _ = writeln!(block, "- suggested difficulty: {difficulty}");
    }
    if !recommendations.priority_topics.is_empty() {
        let _ = writeln!(
            block,
            "- priority topics: {}",
            recommendations.priority_topics.join(", ")
        );
    }
    if !recommendations.topics_to_consolidate.is_empty() {
        let _ = writeln!(
            block,
            "- topics to consolidate: {}",
            recommendations.topics_to_consolidate.join(", ")
        );
    }
    if !recommendations.strategies.is_empty() {
        let _ = writeln!(
            block,
            "- learning strategies: {}",
            recommendations.strategies.join(", ")
        );
    }
    if !recommendations.next_objectives.is_empty() {
        let _ = writeln!(
            block,
            "- next objectives: {}",
            recommendations.next_objectives.join(", ")
        );
    }
    block.push_str(
        "Bias exercise difficulty and topic selection toward these recommendations.\n",
    );
    block
}

/// Build the next-hint prompt. Previously given hints are echoed verbatim
/// so the backend does not repeat them.
pub fn hint(request: &HintRequest) -> String {
    let mut prompt = format!(
        "A grade-school student is stuck on this {difficulty} exercise about \
         \"{topic}\":\n\n{statement}\n\n",
        difficulty = request.difficulty,
        topic = request.topic,
        statement = request.statement,
    );

    if request.previous_hints.is_empty() {
        prompt.push_str("No hints have been given yet. Give a first, gentle hint.\n");
    } else {
        prompt.push_str("Hints already given, in order:\n");
        for (i, given) in request.previous_hints.iter().enumerate() {
            let _ = writeln!(prompt, "{}. {given}", i + 1);
        }
        prompt.push_str(
            "Give the next hint: more specific than the ones above, but still \
             not revealing the answer.\n",
        );
    }

    prompt.push_str(
        "\nReply with ONLY this JSON object and nothing else:\n\
         {\"hint\": \"...\"}\n",
    );
    prompt
}

/// Build the answer-explanation prompt.
pub fn explanation(request: &ExplanationRequest) -> String {
    format!(
        "A grade-school student answered this {difficulty} exercise about \
         \"{topic}\":\n\n{statement}\n\n\
         Correct answer: {correct}\n\
         Student's answer: {student}\n\n\
         Explain step by step why the correct answer is right, addressing the \
         student's answer where it went wrong (or confirming their reasoning \
         if it was right).\n\n\
         Reply with ONLY this JSON object and nothing else:\n\
         {{\"explanation\": \"...\"}}\n",
        difficulty = request.difficulty,
        topic = request.topic,
        statement = request.statement,
        correct = request.correct_answer,
        student = request.student_answer,
    )
}

/// Build the answer-validation prompt.
pub fn validation(request: &ValidationRequest) -> String {
    format!(
        "Judge a student's answer to this {difficulty} exercise about \
         \"{topic}\":\n\n{statement}\n\n\
         Canonical answer: {correct}\n\
         Student's answer: {student}\n\n\
         Accept equivalent formulations (different spacing, order, or \
         phrasing with the same meaning). Give one short sentence of \
         feedback suitable for the student.\n\n\
         Reply with ONLY this JSON object and nothing else:\n\
         {{\"is_correct\": true|false, \"feedback\": \"...\"}}\n",
        difficulty = request.difficulty,
        topic = request.topic,
        statement = request.statement,
        correct = request.correct_answer,
        student = request.student_answer,
    )
}

/// Build the performance-report prompt from the request and the locally
/// computed statistics.
pub fn report(request: &ReportRequest, stats: &SessionStats) -> String {
    let mut prompt = format!(
        "Write a performance report for a grade {grade} student who finished \
         a practice session on \"{topic}\".\n\n\
         Session statistics (computed, authoritative — do not recalculate):\n\
         - exercises attempted: {total}\n\
         - correct: {correct}\n\
         - incorrect: {incorrect}\n\
         - score: {score}/100\n\
         - performance tier: {tier}\n\
         - average seconds per exercise: {avg:.1}\n\
         - hints used: {hints}\n\
         - session duration: {duration}s\n\n\
         Attempts:\n",
        grade = request.grade,
        topic = request.topic,
        total = stats.total_items,
        correct = stats.correct,
        incorrect = stats.incorrect,
        score = stats.score,
        tier = stats.tier,
        avg = stats.average_time_secs,
        hints = stats.hints_used,
        duration = request.session_duration_secs,
    );

    for attempt in &request.attempts {
        let statement = request
            .exercises
            .iter()
            .find(|e| e.id == attempt.exercise_id)
            .map(|e| e.statement.as_str())
            .unwrap_or("(statement unavailable)");
        let _ = writeln!(
            prompt,
            "- [{mark}] {id}: \"{statement}\" — answered \"{answer}\", \
             {hints} hint(s), {secs}s",
            mark = if attempt.correct { "ok" } else { "x" },
            id = attempt.exercise_id,
            statement = statement,
            answer = attempt.answer,
            hints = attempt.hints_used,
            secs = attempt.time_secs,
        );
    }

    prompt.push_str(
        "\nUse the computed score and performance tier above verbatim in the \
         \"general\" section. Reply with ONLY this JSON object and nothing else:\n\
         {\n\
         \x20 \"general\": {\"performance\": \"excellent|good|fair|needs improvement\", \
         \"score\": 0, \"strengths\": [\"...\"], \"weaknesses\": [\"...\"], \
         \"patterns\": [\"...\"]},\n\
         \x20 \"topics\": {\"mastery_level\": \"...\", \"mastered_concepts\": [\"...\"], \
         \"weak_concepts\": [\"...\"], \"appropriate_difficulty\": \"basic|medium|advanced\"},\n\
         \x20 \"behavior\": {\"average_time_secs\": 0.0, \"hints_used\": 0, \
         \"error_patterns\": [\"...\"]},\n\
         \x20 \"recommendations\": {\"suggested_difficulty\": \"basic|medium|advanced\", \
         \"priority_topics\": [\"...\"], \"topics_to_consolidate\": [\"...\"], \
         \"strategies\": [\"...\"], \"next_objectives\": [\"...\"]}\n\
         }\n",
    );
    prompt
}
