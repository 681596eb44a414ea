//! Study-session files: a generated batch plus the attempts recorded
//! against it, saved as JSON so a session can be resumed and reported on.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tutorgen_core::model::{Exercise, ReportRequest, StudentAttempt};

/// One practice session: the exercises handed to the student and the
/// attempts recorded so far.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudySession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub grade: String,
    pub topic: String,
    pub exercises: Vec<Exercise>,
    #[serde(default)]
    pub attempts: Vec<StudentAttempt>,
    /// Seconds spent answering, summed over attempts.
    #[serde(default)]
    pub total_time_secs: u64,
    /// Wall-clock session length in seconds.
    #[serde(default)]
    pub session_duration_secs: u64,
}

impl StudySession {
    pub fn new(grade: &str, topic: &str, exercises: Vec<Exercise>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            grade: grade.to_string(),
            topic: topic.to_string(),
            exercises,
            attempts: Vec::new(),
            total_time_secs: 0,
            session_duration_secs: 0,
        }
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize session")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write session to {}", path.display()))?;
        Ok(())
    }

    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read session from {}", path.display()))?;
        let session: StudySession =
            serde_json::from_str(&content).context("failed to parse session JSON")?;
        Ok(session)
    }

    /// Turn the recorded session into a report request.
    pub fn to_report_request(&self) -> ReportRequest {
        ReportRequest {
            grade: self.grade.clone(),
            topic: self.topic.clone(),
            exercises: self.exercises.clone(),
            attempts: self.attempts.clone(),
            total_time_secs: self.total_time_secs,
            session_duration_secs: self.session_duration_secs,
        }
    }
}
