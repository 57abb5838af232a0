use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

use crate::{
    InterviewPrompts, JobRole, Oracle, OracleConfig, OracleError, OracleKind, ProcessSpawner,
    QaPair, QuestionOutcome,
};

/// Oracle backed by the Claude Code CLI
pub struct ClaudeOracle {
    binary_path: PathBuf,
}

impl ClaudeOracle {
    pub fn new() -> Self {
        Self {
            binary_path: PathBuf::from("claude"),
        }
    }

    pub fn with_binary_path(path: PathBuf) -> Self {
        Self { binary_path: path }
    }

    async fn run_prompt(&self, prompt: &str, config: &OracleConfig) -> Result<String, OracleError> {
        debug!(
            oracle = self.name(),
            prompt_len = prompt.len(),
            "Consulting oracle"
        );

        let mut args = vec![
            "--print",                        // Non-interactive mode, output only
            "--dangerously-skip-permissions", // Skip permission prompts
        ];

        let model_arg;
        if let Some(ref model) = config.model {
            args.push("--model");
            model_arg = model.clone();
            args.push(&model_arg);
        }

        // Add -- to signal end of options, then the prompt as positional argument
        // This prevents prompts starting with '-' from being interpreted as options
        args.push("--");
        args.push(prompt);

        let output = ProcessSpawner::spawn(&self.binary_path, &args, config).await?;

        if !output.success() {
            return Err(OracleError::CallFailed(format!(
                "{} exited with code {}: {}",
                self.name(),
                output.exit_code,
                output.stderr
            )));
        }

        let text = output.stdout.trim().to_string();
        if text.is_empty() {
            return Err(OracleError::EmptyResponse);
        }
        Ok(text)
    }
}

impl Default for ClaudeOracle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Oracle for ClaudeOracle {
    fn name(&self) -> &str {
        "Claude Code"
    }

    fn kind(&self) -> OracleKind {
        OracleKind::ClaudeCode
    }

    fn binary_path(&self) -> Option<&Path> {
        Some(&self.binary_path)
    }

    async fn is_available(&self) -> bool {
        Command::new(&self.binary_path)
            .arg("--version")
            .output()
            .await
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    async fn next_question(
        &self,
        role: JobRole,
        index: usize,
        history: &[QaPair],
        config: &OracleConfig,
    ) -> Result<QuestionOutcome, OracleError> {
        let prompt = InterviewPrompts::build_question_prompt(role, index, history);
        let raw = self.run_prompt(&prompt, config).await?;
        QuestionOutcome::parse(&raw).map_err(|e| OracleError::ContractViolation(e.to_string()))
    }

    async fn evaluate(
        &self,
        role: JobRole,
        history: &[QaPair],
        config: &OracleConfig,
    ) -> Result<String, OracleError> {
        let prompt = InterviewPrompts::build_evaluation_prompt(role, history);
        self.run_prompt(&prompt, config).await
    }
}
