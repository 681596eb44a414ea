//! Quantitative session statistics for the report synthesizer.
//!
//! Everything here is deterministic and independent of the backend: the
//! backend is asked to honor these numbers, and report decoding
//! re-imposes them on the reply.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AiError;
use crate::model::ReportRequest;

/// Performance tier derived from a numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerformanceTier {
    #[serde(rename = "excellent")]
    Excellent,
    #[serde(rename = "good")]
    Good,
    #[serde(rename = "fair")]
    Fair,
    #[serde(rename = "needs improvement", alias = "needs_improvement")]
    NeedsImprovement,
}

impl PerformanceTier {
    /// Deterministic mapping from a 0–100 score.
    pub fn from_score(score: u32) -> Self {
        match score {
            80.. => PerformanceTier::Excellent,
            60..=79 => PerformanceTier::Good,
            40..=59 => PerformanceTier::Fair,
            _ => PerformanceTier::NeedsImprovement,
        }
    }
}

impl fmt::Display for PerformanceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PerformanceTier::Excellent => write!(f, "excellent"),
            PerformanceTier::Good => write!(f, "good"),
            PerformanceTier::Fair => write!(f, "fair"),
            PerformanceTier::NeedsImprovement => write!(f, "needs improvement"),
        }
    }
}

/// Derived inputs for the report prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_items: usize,
    pub correct: usize,
    pub incorrect: usize,
    /// round(correct / total × 100)
    pub score: u32,
    pub tier: PerformanceTier,
    pub average_time_secs: f64,
    pub hints_used: u32,
}

impl SessionStats {
    /// Derive statistics from a report request.
    ///
    /// The attempt batch must be non-empty; the attempt count need not
    /// equal the exercise count.
    pub fn from_request(request: &ReportRequest) -> Result<Self, AiError> {
        if request.attempts.is_empty() {
            return Err(AiError::Validation(
                "report request contains no attempts".into(),
            ));
        }

        let total_items = request.attempts.len();
        let correct = request.attempts.iter().filter(|a| a.correct).count();
        let incorrect = total_items - correct;
        let score = ((correct as f64 / total_items as f64) * 100.0).round() as u32;
        let average_time_secs = request.total_time_secs as f64 / total_items as f64;
        let hints_used = request.attempts.iter().map(|a| a.hints_used).sum();

        Ok(Self {
            total_items,
            correct,
            incorrect,
            score,
            tier: PerformanceTier::from_score(score),
            average_time_secs,
            hints_used,
        })
    }
}
