use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use greenroom_oracle::{JobRole, QaPair};

/// One persisted interview: written once when a session completes evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRecord {
    pub id: String,
    pub role: JobRole,
    pub timestamp: DateTime<Utc>,
    pub question_limit: usize,
    pub history: Vec<QaPair>,
    pub evaluation: String,
}

impl ReportRecord {
    /// Build a record for a just-completed session. The id combines the UTC
    /// timestamp with a short hash of the role and history, matching the
    /// on-disk filename.
    pub fn new(
        role: JobRole,
        question_limit: usize,
        history: Vec<QaPair>,
        evaluation: String,
    ) -> Self {
        let timestamp = Utc::now();
        let timestamp_str = timestamp.format("%Y-%m-%dT%H-%M-%SZ").to_string();

        let mut hasher = Sha256::new();
        hasher.update(role.to_string().as_bytes());
        for qa in &history {
            hasher.update(qa.question.as_bytes());
            hasher.update(qa.answer.as_bytes());
        }
        let hash = hex::encode(hasher.finalize());
        let short_hash = &hash[..6];

        Self {
            id: format!("{}_{}", timestamp_str, short_hash),
            role,
            timestamp,
            question_limit,
            history,
            evaluation,
        }
    }
}

/// Summary for list views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub id: String,
    pub role: JobRole,
    pub timestamp: DateTime<Utc>,
    pub turns: usize,
    pub evaluation_preview: String,
}

impl From<&ReportRecord> for ReportSummary {
    fn from(record: &ReportRecord) -> Self {
        let preview: String = record.evaluation.chars().take(120).collect();
        Self {
            id: record.id.clone(),
            role: record.role,
            timestamp: record.timestamp,
            turns: record.history.len(),
            evaluation_preview: preview,
        }
    }
}

/// Filter parameters for listing reports.
#[derive(Debug, Default)]
pub struct ReportFilter {
    pub role: Option<JobRole>,
    pub after: Option<DateTime<Utc>>,
    pub before: Option<DateTime<Utc>>,
}
