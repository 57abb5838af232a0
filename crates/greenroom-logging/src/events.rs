use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Structured log events for the interview lifecycle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LogEvent {
    SessionStarted {
        role: String,
        question_limit: usize,
    },
    AnswerSubmitted {
        index: usize,
        chars: usize,
    },
    OracleStarted {
        index: usize,
    },
    QuestionAsked {
        index: usize,
    },
    OracleFailed {
        index: usize,
        error: String,
    },
    CandidateDeclined,
    InterviewFinished {
        turns: usize,
    },
    EvaluationStarted,
    EvaluationRecorded {
        report_chars: usize,
    },
    ReportSaved {
        path: PathBuf,
    },
    SessionReset,
}

impl LogEvent {
    /// Add a timestamp to serialize with the event
    fn with_timestamp(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if let Some(obj) = value.as_object_mut() {
            obj.insert(
                "timestamp".to_string(),
                serde_json::Value::String(chrono::Utc::now().to_rfc3339()),
            );
        }
        value
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors
    #[default]
    Pretty,
    /// JSON lines format for machine consumption
    Json,
    /// Compact single-line format
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// Logger for greenroom events - handles both console output and file logging
pub struct Logger {
    format: LogFormat,
    file_writer: Option<Mutex<File>>,
}

impl Logger {
    pub fn new(format: LogFormat) -> Self {
        Self {
            format,
            file_writer: None,
        }
    }

    /// Create a logger with file output in addition to console
    pub fn with_file(format: LogFormat, log_path: &Path) -> std::io::Result<Self> {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        Ok(Self {
            format,
            file_writer: Some(Mutex::new(file)),
        })
    }

    pub fn log(&self, event: &LogEvent) {
        // File output is always JSON lines
        if let Some(ref writer) = self.file_writer {
            if let Ok(mut file) = writer.lock() {
                let json = event.with_timestamp();
                let _ = writeln!(file, "{}", json);
            }
        }

        match self.format {
            LogFormat::Json => self.log_json(event),
            LogFormat::Pretty => self.log_pretty(event),
            LogFormat::Compact => self.log_compact(event),
        }
    }

    fn log_json(&self, event: &LogEvent) {
        if let Ok(json) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{}", json);
        }
    }

    fn log_pretty(&self, event: &LogEvent) {
        let mut stderr = std::io::stderr();
        match event {
            LogEvent::SessionStarted {
                role,
                question_limit,
            } => {
                let _ = writeln!(stderr);
                let _ = writeln!(
                    stderr,
                    "{} {} {} ({} questions)",
                    "▶".bright_cyan(),
                    "Interview started:".bold(),
                    role.bright_white().bold(),
                    question_limit
                );
            }
            LogEvent::AnswerSubmitted { index, chars } => {
                let _ = writeln!(
                    stderr,
                    "  {} answer for question {} ({} chars)",
                    "·".dimmed(),
                    index,
                    chars
                );
            }
            LogEvent::OracleStarted { index } => {
                let _ = writeln!(
                    stderr,
                    "  {} {} question {}...",
                    "▶".bright_magenta(),
                    "Oracle:".bright_magenta(),
                    index
                );
            }
            LogEvent::QuestionAsked { index } => {
                let _ = writeln!(
                    stderr,
                    "  {} Question {} ready",
                    "✓".bright_green(),
                    index
                );
            }
            LogEvent::OracleFailed { index, error } => {
                let _ = writeln!(
                    stderr,
                    "  {} Oracle failed at question {}: {}",
                    "✗".bright_red(),
                    index,
                    error.bright_red()
                );
            }
            LogEvent::CandidateDeclined => {
                let _ = writeln!(
                    stderr,
                    "  {} Candidate declined to start",
                    "→".bright_yellow()
                );
            }
            LogEvent::InterviewFinished { turns } => {
                let _ = writeln!(stderr);
                let _ = writeln!(
                    stderr,
                    "{} Interview finished after {} turns",
                    "✓".bright_green(),
                    turns
                );
            }
            LogEvent::EvaluationStarted => {
                let _ = writeln!(
                    stderr,
                    "  {} {}",
                    "▶".bright_magenta(),
                    "Oracle: evaluating...".bright_magenta()
                );
            }
            LogEvent::EvaluationRecorded { report_chars } => {
                let _ = writeln!(
                    stderr,
                    "  {} Evaluation ready ({} chars)",
                    "✓".bright_green(),
                    report_chars
                );
            }
            LogEvent::ReportSaved { path } => {
                let _ = writeln!(
                    stderr,
                    "  {} Report saved to {}",
                    "✓".bright_green(),
                    path.display().to_string().dimmed()
                );
            }
            LogEvent::SessionReset => {
                let _ = writeln!(stderr, "{} Session reset", "↺".bright_yellow());
            }
        }
    }

    fn log_compact(&self, event: &LogEvent) {
        let mut stderr = std::io::stderr();
        let timestamp = chrono::Utc::now().format("%H:%M:%S");
        let msg = match event {
            LogEvent::SessionStarted {
                role,
                question_limit,
            } => format!("[{}] session:start {} n={}", timestamp, role, question_limit),
            LogEvent::AnswerSubmitted { index, chars } => {
                format!("[{}] answer:{} chars={}", timestamp, index, chars)
            }
            LogEvent::OracleStarted { index } => {
                format!("[{}] oracle:start:{}", timestamp, index)
            }
            LogEvent::QuestionAsked { index } => {
                format!("[{}] oracle:question:{}", timestamp, index)
            }
            LogEvent::OracleFailed { index, error } => {
                format!("[{}] oracle:fail:{} {}", timestamp, index, error)
            }
            LogEvent::CandidateDeclined => format!("[{}] session:declined", timestamp),
            LogEvent::InterviewFinished { turns } => {
                format!("[{}] session:finished turns={}", timestamp, turns)
            }
            LogEvent::EvaluationStarted => format!("[{}] oracle:evaluate", timestamp),
            LogEvent::EvaluationRecorded { report_chars } => {
                format!("[{}] oracle:report chars={}", timestamp, report_chars)
            }
            LogEvent::ReportSaved { path } => {
                format!("[{}] report:saved {}", timestamp, path.display())
            }
            LogEvent::SessionReset => format!("[{}] session:reset", timestamp),
        };
        let _ = writeln!(stderr, "{}", msg);
    }
}
