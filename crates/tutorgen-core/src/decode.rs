//! Reshape extracted JSON into the typed operation responses.
//!
//! Replies are treated as untrusted: intermediate structs accept sparse
//! input, required fields map to `AiError::Validation`, and fields the
//! request already knows (difficulty, topic, grade) are echoed when the
//! model omits them.

use serde::Deserialize;
use serde_json::Value;

use crate::error::AiError;
use crate::extract::extract_json;
use crate::model::{
    Difficulty, Exercise, ExerciseMetadata, ExerciseRequest, ExerciseResponse,
    ExplanationResponse, HintResponse, ReportResponse, ValidationResponse,
};
use crate::report::SessionStats;

/// Lenient intermediate shape for a single generated exercise.
#[derive(Debug, Deserialize)]
struct RawExercise {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    statement: Option<String>,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    correct_answer: Option<String>,
    #[serde(default)]
    explanation: Option<String>,
    #[serde(default)]
    hints: Vec<String>,
    #[serde(default)]
    difficulty: Option<Difficulty>,
    #[serde(default)]
    topic: Option<String>,
    #[serde(default)]
    grade: Option<String>,
}

/// Decode an exercise-batch reply.
///
/// Accepts either `{"exercises": [...]}` or a bare array, fills missing
/// ids, echoes difficulty/topic/grade from the request, and computes the
/// batch metadata.
pub fn exercises(text: &str, request: &ExerciseRequest) -> Result<ExerciseResponse, AiError> {
    let value = extract_json(text)?;

    let list = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("exercises") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(AiError::Validation(
                    "reply has no 'exercises' array".into(),
                ))
            }
        },
        _ => return Err(AiError::Validation("reply is not an exercise batch".into())),
    };

    if list.is_empty() {
        return Err(AiError::Validation("reply contains zero exercises".into()));
    }

    let mut exercises = Vec::with_capacity(list.len());
    for (i, item) in list.into_iter().enumerate() {
        let raw: RawExercise = serde_json::from_value(item)
            .map_err(|e| AiError::Validation(format!("exercise {}: {e}", i + 1)))?;

        let statement = raw
            .statement
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| AiError::Validation(format!("exercise {} has no statement", i + 1)))?;
        let correct_answer = raw.correct_answer.filter(|s| !s.trim().is_empty()).ok_or_else(
            || AiError::Validation(format!("exercise {} has no correct answer", i + 1)),
        )?;

        exercises.push(Exercise {
            id: raw
                .id
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| format!("ex-{}", i + 1)),
            statement,
            options: raw.options,
            correct_answer,
            explanation: raw.explanation.unwrap_or_default(),
            hints: raw.hints,
            difficulty: raw.difficulty.unwrap_or(request.difficulty),
            topic: raw.topic.unwrap_or_else(|| request.topic.clone()),
            grade: raw.grade.unwrap_or_else(|| request.grade.clone()),
        });
    }

    let metadata = ExerciseMetadata {
        total_generated: exercises.len(),
        estimated_time_minutes: exercises.len() as u32
            * request.difficulty.minutes_per_exercise(),
        difficulty: request.difficulty,
        topic: request.topic.clone(),
        personalized: request.personalization.is_some(),
    };

    Ok(ExerciseResponse {
        exercises,
        metadata,
    })
}

/// Decode a hint reply.
pub fn hint(text: &str) -> Result<HintResponse, AiError> {
    let value = extract_json(text)?;
    let response: HintResponse = serde_json::from_value(value)
        .map_err(|e| AiError::Validation(format!("hint reply: {e}")))?;
    if response.hint.trim().is_empty() {
        return Err(AiError::Validation("hint reply is empty".into()));
    }
    Ok(response)
}

/// Decode an explanation reply.
pub fn explanation(text: &str) -> Result<ExplanationResponse, AiError> {
    let value = extract_json(text)?;
    let response: ExplanationResponse = serde_json::from_value(value)
        .map_err(|e| AiError::Validation(format!("explanation reply: {e}")))?;
    if response.explanation.trim().is_empty() {
        return Err(AiError::Validation("explanation reply is empty".into()));
    }
    Ok(response)
}

/// Decode an answer-validation reply.
pub fn validation(text: &str) -> Result<ValidationResponse, AiError> {
    let value = extract_json(text)?;
    serde_json::from_value(value)
        .map_err(|e| AiError::Validation(format!("validation reply: {e}")))
}

/// Decode a report reply.
///
/// The computed score and tier are authoritative: whatever the model put
/// in the general section is overwritten before deserialization.
pub fn report(text: &str, stats: &SessionStats) -> Result<ReportResponse, AiError> {
    let mut value = extract_json(text)?;

    if let Some(general) = value.get_mut("general") {
        if let Some(map) = general.as_object_mut() {
            map.insert("score".into(), Value::from(stats.score));
            map.insert("performance".into(), Value::from(stats.tier.to_string()));
        }
    }

    serde_json::from_value(value)
        .map_err(|e| AiError::Validation(format!("report reply: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ReportRequest, StudentAttempt};
    use crate::report::PerformanceTier;

    fn request() -> ExerciseRequest {
        ExerciseRequest {
            grade: "3".into(),
            topic: "basic addition".into(),
            difficulty: Difficulty::Basic,
            count: 2,
            language: "en".into(),
            personalization: None,
        }
    }

    const BATCH: &str = r#"{
        "exercises": [
            {"id": "ex-1", "statement": "2 + 3 = ?", "options": ["4", "5"],
             "correct_answer": "5", "explanation": "Count on from 2.",
             "hints": ["Use your fingers."], "difficulty": "basic",
             "topic": "basic addition", "grade": "3"},
            {"statement": "1 + 6 = ?", "correct_answer": "7"}
        ]
    }"#;

    #[test]
    fn batch_with_metadata() {
        let response = exercises(BATCH, &request()).unwrap();
        assert_eq!(response.exercises.len(), 2);
        assert_eq!(response.metadata.total_generated, 2);
        assert_eq!(response.metadata.estimated_time_minutes, 4);
        assert!(!response.metadata.personalized);
    }

    #[test]
    fn sparse_exercise_is_filled_from_request() {
        let response = exercises(BATCH, &request()).unwrap();
        let second = &response.exercises[1];
        assert_eq!(second.id, "ex-2");
        assert_eq!(second.difficulty, Difficulty::Basic);
        assert_eq!(second.topic, "basic addition");
        assert_eq!(second.grade, "3");
        assert!(second.options.is_empty());
    }

    #[test]
    fn bare_array_is_accepted() {
        let text = r#"[{"statement": "3 + 3 = ?", "correct_answer": "6"}]"#;
        let response = exercises(text, &request()).unwrap();
        assert_eq!(response.exercises.len(), 1);
        assert_eq!(response.exercises[0].id, "ex-1");
    }

    #[test]
    fn missing_statement_is_a_validation_error() {
        let text = r#"{"exercises": [{"correct_answer": "6"}]}"#;
        let err = exercises(text, &request()).unwrap_err();
        assert!(matches!(err, AiError::Validation(_)));
        assert!(err.to_string().contains("no statement"));
    }

    #[test]
    fn empty_batch_is_rejected() {
        let err = exercises(r#"{"exercises": []}"#, &request()).unwrap_err();
        assert!(err.to_string().contains("zero exercises"));
    }

    #[test]
    fn wrong_shape_is_a_validation_error() {
        let err = exercises(r#"{"items": []}"#, &request()).unwrap_err();
        assert!(err.to_string().contains("exercises"));
    }

    #[test]
    fn unparseable_text_is_a_parse_error() {
        let err = exercises("no json here", &request()).unwrap_err();
        assert!(matches!(err, AiError::Parse { .. }));
    }

    #[test]
    fn hint_decoding() {
        let response = hint(r#"{"hint": "Make a ten first."}"#).unwrap();
        assert_eq!(response.hint, "Make a ten first.");

        assert!(hint(r#"{"hint": "  "}"#).is_err());
        assert!(hint(r#"{"tip": "wrong field"}"#).is_err());
    }

    #[test]
    fn validation_decoding() {
        let response =
            validation(r#"{"is_correct": false, "feedback": "Check your carrying."}"#).unwrap();
        assert!(!response.is_correct);
        assert_eq!(response.feedback, "Check your carrying.");

        // feedback is optional, is_correct is not
        assert!(validation(r#"{"is_correct": true}"#).is_ok());
        assert!(validation(r#"{"feedback": "nice"}"#).is_err());
    }

    fn stats() -> SessionStats {
        let request = ReportRequest {
            grade: "3".into(),
            topic: "basic addition".into(),
            exercises: vec![],
            attempts: (0..10)
                .map(|i| StudentAttempt {
                    exercise_id: format!("ex-{i}"),
                    answer: "1".into(),
                    correct: i < 8,
                    hints_used: 0,
                    time_secs: 30,
                })
                .collect(),
            total_time_secs: 300,
            session_duration_secs: 400,
        };
        SessionStats::from_request(&request).unwrap()
    }

    const REPORT: &str = r#"{
        "general": {"performance": "fair", "score": 55,
                    "strengths": ["quick on easy sums"],
                    "weaknesses": ["carrying"], "patterns": []},
        "topics": {"mastery_level": "developing",
                   "mastered_concepts": ["single digits"],
                   "weak_concepts": ["carrying"],
                   "appropriate_difficulty": "basic"},
        "behavior": {"average_time_secs": 30.0, "hints_used": 0,
                     "error_patterns": ["rushes the last step"]},
        "recommendations": {"suggested_difficulty": "medium",
                            "priority_topics": ["carrying"],
                            "topics_to_consolidate": [],
                            "strategies": ["estimate first"],
                            "next_objectives": ["two-digit sums"]}
    }"#;

    #[test]
    fn report_overwrites_model_score_and_tier() {
        let response = report(REPORT, &stats()).unwrap();
        // Model said fair/55; computed stats say 80/excellent.
        assert_eq!(response.general.score, 80);
        assert_eq!(response.general.performance, PerformanceTier::Excellent);
        assert_eq!(response.recommendations.priority_topics, vec!["carrying"]);
        assert_eq!(
            response.topics.appropriate_difficulty,
            Difficulty::Basic
        );
    }

    #[test]
    fn report_missing_section_is_a_validation_error() {
        let err = report(r#"{"general": {"performance": "good", "score": 1}}"#, &stats())
            .unwrap_err();
        assert!(matches!(err, AiError::Validation(_)));
    }
}
