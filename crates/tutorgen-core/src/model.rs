//! Request and response types for the five generation operations.
//!
//! These are the shapes the surrounding platform hands to the
//! orchestrator and gets back inside an `AiResponse` envelope. Every
//! pair is transient — built per call, never persisted by this layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::report::PerformanceTier;

/// Exercise difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Basic,
    Medium,
    Advanced,
}

impl Difficulty {
    /// Estimated minutes a student needs per exercise of this tier.
    pub fn minutes_per_exercise(self) -> u32 {
        match self {
            Difficulty::Basic => 2,
            Difficulty::Medium => 4,
            Difficulty::Advanced => 6,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Basic => write!(f, "basic"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Advanced => write!(f, "advanced"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" | "easy" => Ok(Difficulty::Basic),
            "medium" | "intermediate" => Ok(Difficulty::Medium),
            "advanced" | "hard" => Ok(Difficulty::Advanced),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// Prior-performance recommendations.
///
/// Produced as the final section of a performance report, and optionally
/// fed back into an `ExerciseRequest` to bias the next batch. This layer
/// only consumes the field; it never computes recommendations on its own.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Recommendations {
    #[serde(default)]
    pub suggested_difficulty: Option<Difficulty>,
    #[serde(default)]
    pub priority_topics: Vec<String>,
    #[serde(default)]
    pub topics_to_consolidate: Vec<String>,
    #[serde(default)]
    pub strategies: Vec<String>,
    #[serde(default)]
    pub next_objectives: Vec<String>,
}

/// Request for a batch of exercises.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseRequest {
    /// School grade of the student (e.g. "3").
    pub grade: String,
    /// Topic to generate exercises for.
    pub topic: String,
    pub difficulty: Difficulty,
    /// Number of exercises to generate. Must be positive.
    pub count: u32,
    /// BCP-47 language tag the exercises should be written in.
    #[serde(default = "default_language")]
    pub language: String,
    /// Optional prior-performance hints.
    #[serde(default)]
    pub personalization: Option<Recommendations>,
}

fn default_language() -> String {
    "en".to_string()
}

/// A single generated exercise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub statement: String,
    /// Ordered answer options; empty for open-response exercises.
    #[serde(default)]
    pub options: Vec<String>,
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: String,
    /// Ordered hints, progressively more specific.
    #[serde(default)]
    pub hints: Vec<String>,
    pub difficulty: Difficulty,
    pub topic: String,
    pub grade: String,
}

/// Metadata computed locally for a generated batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseMetadata {
    pub total_generated: usize,
    /// Estimated completion time for the whole batch, in minutes.
    pub estimated_time_minutes: u32,
    pub difficulty: Difficulty,
    pub topic: String,
    /// Whether personalization hints influenced the batch.
    pub personalized: bool,
}

/// A generated exercise batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseResponse {
    pub exercises: Vec<Exercise>,
    pub metadata: ExerciseMetadata,
}

/// Request for the next hint on an exercise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HintRequest {
    pub statement: String,
    pub difficulty: Difficulty,
    pub topic: String,
    /// Hints the student has already received, in the order given.
    #[serde(default)]
    pub previous_hints: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HintResponse {
    pub hint: String,
}

/// Request to explain the correct answer to a student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplanationRequest {
    pub statement: String,
    pub correct_answer: String,
    pub student_answer: String,
    pub difficulty: Difficulty,
    pub topic: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplanationResponse {
    pub explanation: String,
}

/// Request to judge a student's submitted answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRequest {
    pub statement: String,
    pub correct_answer: String,
    pub student_answer: String,
    pub difficulty: Difficulty,
    pub topic: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub is_correct: bool,
    #[serde(default)]
    pub feedback: String,
}

/// One attempt record from a practice session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentAttempt {
    /// Id of the exercise this attempt refers to.
    pub exercise_id: String,
    pub answer: String,
    pub correct: bool,
    #[serde(default)]
    pub hints_used: u32,
    /// Seconds spent on this exercise.
    #[serde(default)]
    pub time_secs: u64,
}

/// Request for a performance report over a finished session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRequest {
    pub grade: String,
    pub topic: String,
    pub exercises: Vec<Exercise>,
    pub attempts: Vec<StudentAttempt>,
    /// Total seconds spent answering, summed over attempts.
    pub total_time_secs: u64,
    /// Wall-clock session length in seconds.
    pub session_duration_secs: u64,
}

/// General analysis section of a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralAnalysis {
    pub performance: PerformanceTier,
    /// Percentage score, 0–100.
    pub score: u32,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// Per-topic analysis section of a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicAnalysis {
    pub mastery_level: String,
    #[serde(default)]
    pub mastered_concepts: Vec<String>,
    #[serde(default)]
    pub weak_concepts: Vec<String>,
    pub appropriate_difficulty: Difficulty,
}

/// Behavioral analysis section of a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehavioralAnalysis {
    pub average_time_secs: f64,
    #[serde(default)]
    pub hints_used: u32,
    #[serde(default)]
    pub error_patterns: Vec<String>,
}

/// Structured performance report for one practice session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportResponse {
    pub general: GeneralAnalysis,
    pub topics: TopicAnalysis,
    pub behavior: BehavioralAnalysis,
    pub recommendations: Recommendations,
}
