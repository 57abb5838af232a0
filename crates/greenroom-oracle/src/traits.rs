use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::{JobRole, QaPair, QuestionOutcome};

/// Errors that can occur while consulting an oracle
#[derive(Error, Debug)]
pub enum OracleError {
    #[error("Failed to spawn oracle process: {0}")]
    SpawnFailed(#[from] std::io::Error),

    #[error("Oracle call timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Oracle binary not found at path: {0}")]
    NotFound(String),

    #[error("Oracle returned an empty response")]
    EmptyResponse,

    #[error("Oracle call failed: {0}")]
    CallFailed(String),

    #[error("Oracle violated its contract: {0}")]
    ContractViolation(String),
}

/// Configuration for oracle calls
#[derive(Debug, Clone)]
pub struct OracleConfig {
    /// Bounded timeout per call (None = no limit)
    pub timeout: Option<std::time::Duration>,
    /// Additional environment variables for the oracle process
    pub env_vars: HashMap<String, String>,
    /// Model to use (if the oracle supports it)
    pub model: Option<String>,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            timeout: Some(std::time::Duration::from_secs(120)),
            env_vars: HashMap::new(),
            model: None,
        }
    }
}

impl OracleConfig {
    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn without_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = Some(model);
        self
    }

    pub fn with_env(mut self, key: String, value: String) -> Self {
        self.env_vars.insert(key, value);
        self
    }
}

/// Supported oracle backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OracleKind {
    ClaudeCode,
    OpenCode,
    Scripted,
}

impl std::fmt::Display for OracleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OracleKind::ClaudeCode => write!(f, "claude-code"),
            OracleKind::OpenCode => write!(f, "opencode"),
            OracleKind::Scripted => write!(f, "scripted"),
        }
    }
}

impl std::str::FromStr for OracleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "claude" | "claude-code" | "claudecode" => Ok(OracleKind::ClaudeCode),
            "opencode" | "open-code" => Ok(OracleKind::OpenCode),
            "scripted" | "offline" => Ok(OracleKind::Scripted),
            _ => Err(format!("Unknown oracle kind: {}", s)),
        }
    }
}

/// The capability the interview state machine depends on: produce the next
/// question for a role given the conversation so far, and grade the whole
/// conversation once it is over. Both calls are single-shot; the caller never
/// issues two calls concurrently for the same session.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Human-readable name of the oracle backend
    fn name(&self) -> &str;

    /// The oracle kind
    fn kind(&self) -> OracleKind;

    /// Generate interview question number `index` (1-based) for `role`.
    ///
    /// A `Decline` outcome is only legitimate at index 1; callers enforce
    /// that rule, implementations should not decline later than that.
    async fn next_question(
        &self,
        role: JobRole,
        index: usize,
        history: &[QaPair],
        config: &OracleConfig,
    ) -> Result<QuestionOutcome, OracleError>;

    /// Produce the evaluation report for a finished interview.
    ///
    /// The result is opaque display text; callers must not parse fields
    /// out of it.
    async fn evaluate(
        &self,
        role: JobRole,
        history: &[QaPair],
        config: &OracleConfig,
    ) -> Result<String, OracleError>;

    /// Check if the oracle backend is usable on this system
    async fn is_available(&self) -> bool;

    /// Get the path to the backing binary, if any
    fn binary_path(&self) -> Option<&Path>;
}
