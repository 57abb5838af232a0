use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::types::{ReportFilter, ReportRecord, ReportSummary};

/// Provides access to saved evaluation reports on disk, one JSON file per
/// completed interview.
pub struct ReportStore {
    reports_dir: PathBuf,
}

impl ReportStore {
    /// Create a new ReportStore using the default reports directory.
    pub fn new() -> Result<Self> {
        let data_dir = dirs::data_dir().with_context(|| "Could not determine data directory")?;
        let reports_dir = data_dir.join("greenroom").join("reports");
        Ok(Self { reports_dir })
    }

    /// Create a ReportStore with a custom directory (useful for testing).
    pub fn with_dir(reports_dir: PathBuf) -> Self {
        Self { reports_dir }
    }

    /// Return the reports directory path.
    pub fn reports_dir(&self) -> &Path {
        &self.reports_dir
    }

    /// Write a report to disk. Returns the path written.
    pub fn save(&self, record: &ReportRecord) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.reports_dir)
            .with_context(|| format!("Failed to create reports dir: {:?}", self.reports_dir))?;

        let path = self.reports_dir.join(format!("{}.json", record.id));
        let json = serde_json::to_string_pretty(record)?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write report: {:?}", path))?;

        Ok(path)
    }

    /// List reports matching the given filter, sorted by timestamp descending.
    pub fn list(&self, filter: &ReportFilter) -> Result<Vec<ReportSummary>> {
        if !self.reports_dir.exists() {
            return Ok(Vec::new());
        }

        let mut summaries: Vec<ReportSummary> = Vec::new();

        let entries = std::fs::read_dir(&self.reports_dir)
            .with_context(|| format!("Failed to read reports dir: {:?}", self.reports_dir))?;

        for entry in entries {
            let entry = entry?;
            let path = entry.path();

            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            match Self::parse_record(&path) {
                Ok(record) => {
                    if self.matches_filter(&record, filter) {
                        summaries.push(ReportSummary::from(&record));
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to parse report {:?}: {}", path, e);
                }
            }
        }

        // Newest first
        summaries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        Ok(summaries)
    }

    /// Get a fully parsed report by ID.
    ///
    /// Ids are single path components; anything carrying separators or `..`
    /// is rejected rather than joined into the reports directory.
    pub fn get(&self, id: &str) -> Result<ReportRecord> {
        if id.contains(['/', '\\']) || id.contains("..") {
            anyhow::bail!("Invalid report id: {}", id);
        }
        let path = self.reports_dir.join(format!("{}.json", id));
        Self::parse_record(&path)
    }

    fn parse_record(path: &Path) -> Result<ReportRecord> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read report: {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse report: {:?}", path))
    }

    fn matches_filter(&self, record: &ReportRecord, filter: &ReportFilter) -> bool {
        if let Some(role) = filter.role {
            if record.role != role {
                return false;
            }
        }
        if let Some(after) = filter.after {
            if record.timestamp < after {
                return false;
            }
        }
        if let Some(before) = filter.before {
            if record.timestamp > before {
                return false;
            }
        }
        true
    }
}
