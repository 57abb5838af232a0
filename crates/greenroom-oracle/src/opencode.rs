use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

use crate::{
    InterviewPrompts, JobRole, Oracle, OracleConfig, OracleError, OracleKind, ProcessSpawner,
    QaPair, QuestionOutcome,
};

/// Oracle backed by the OpenCode CLI
pub struct OpenCodeOracle {
    binary_path: PathBuf,
}

impl OpenCodeOracle {
    pub fn new() -> Self {
        Self {
            binary_path: PathBuf::from("opencode"),
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

        // OpenCode uses the "run" subcommand for non-interactive execution
        let mut args = vec!["run"];

        let model_arg;
        if let Some(ref model) = config.model {
            args.push("--model");
            model_arg = model.clone();
            args.push(&model_arg);
        }

        args.push("--prompt");
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

impl Default for OpenCodeOracle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Oracle for OpenCodeOracle {
    fn name(&self) -> &str {
        "OpenCode"
    }

    fn kind(&self) -> OracleKind {
        OracleKind::OpenCode
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
