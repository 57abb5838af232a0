use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use greenroom_core::DEFAULT_QUESTION_LIMIT;
use greenroom_logging::{LogFormat, Logger};
use greenroom_oracle::{create_oracle, JobRole, OracleConfig, OracleKind};
use greenroom_reports::ReportStore;

mod api;
mod config;
mod interview;
mod serve;

use config::ProjectConfig;

#[derive(Parser, Debug)]
#[command(
    name = "greenroom",
    about = "Mock Excel interviews with an LLM interviewer",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Oracle backend for questions and evaluation
    #[arg(short, long, value_enum, global = true)]
    oracle: Option<OracleChoice>,

    /// Model to use (if the oracle supports it)
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Log output format
    #[arg(long, value_enum, global = true, default_value = "pretty")]
    log_format: LogFormatChoice,

    /// Also append events as JSON lines to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run an interview in the terminal
    Run {
        /// Job role to interview for (picked interactively if omitted)
        #[arg(short, long)]
        role: Option<JobRole>,

        /// Number of questions to ask (3-10)
        #[arg(short = 'n', long)]
        questions: Option<usize>,

        /// Skip writing the evaluation report to disk
        #[arg(long)]
        no_save: bool,
    },
    /// Serve the HTTP API for a chat frontend
    Serve {
        /// Port for the API server
        #[arg(short, long, default_value = "8787")]
        port: u16,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OracleChoice {
    Claude,
    Opencode,
    Scripted,
}

impl From<OracleChoice> for OracleKind {
    fn from(choice: OracleChoice) -> Self {
        match choice {
            OracleChoice::Claude => OracleKind::ClaudeCode,
            OracleChoice::Opencode => OracleKind::OpenCode,
            OracleChoice::Scripted => OracleKind::Scripted,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatChoice {
    Pretty,
    Json,
    Compact,
}

impl From<LogFormatChoice> for LogFormat {
    fn from(choice: LogFormatChoice) -> Self {
        match choice {
            LogFormatChoice::Pretty => LogFormat::Pretty,
            LogFormatChoice::Json => LogFormat::Json,
            LogFormatChoice::Compact => LogFormat::Compact,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_format: LogFormat = cli.log_format.into();
    greenroom_logging::init_tracing("warn", log_format);

    let working_dir = std::env::current_dir().context("Failed to get current directory")?;
    let project = ProjectConfig::load(&working_dir)?.unwrap_or_default();

    // CLI flags win over greenroom.toml
    let kind: OracleKind = match cli.oracle {
        Some(choice) => choice.into(),
        None => project
            .oracle
            .as_deref()
            .map(|s| s.parse().map_err(anyhow::Error::msg))
            .transpose()?
            .unwrap_or(OracleKind::ClaudeCode),
    };

    let mut oracle_config = OracleConfig::default();
    if let Some(secs) = project.timeout_secs {
        oracle_config = oracle_config.with_timeout(std::time::Duration::from_secs(secs));
    }
    if let Some(model) = cli.model.clone().or_else(|| project.model.clone()) {
        oracle_config = oracle_config.with_model(model);
    }

    let oracle = create_oracle(kind);
    if !oracle.is_available().await {
        anyhow::bail!(
            "Oracle '{}' is not available. Make sure it's installed and in PATH.",
            oracle.name()
        );
    }

    let store = match project.reports_dir.clone() {
        Some(dir) => ReportStore::with_dir(expand_dir(dir, &working_dir)),
        None => ReportStore::new()?,
    };

    let logger = match cli.log_file.clone().or_else(|| project.log_file.clone()) {
        Some(path) => {
            let path = expand_dir(path, &working_dir);
            Logger::with_file(log_format, &path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?
        }
        None => Logger::new(log_format),
    };

    match cli.command {
        Command::Run {
            role,
            questions,
            no_save,
        } => {
            let questions = questions
                .or(project.question_limit)
                .unwrap_or(DEFAULT_QUESTION_LIMIT);

            let interrupted = Arc::new(AtomicBool::new(false));
            let handle = interrupted.clone();
            ctrlc::set_handler(move || {
                eprintln!("\nInterrupted. Wrapping up...");
                handle.store(true, Ordering::SeqCst);
            })
            .context("Failed to set Ctrl+C handler")?;

            let options = interview::ConsoleOptions {
                role,
                question_limit: questions,
                save_report: !no_save,
            };
            interview::run_interview(
                oracle.as_ref(),
                &oracle_config,
                &logger,
                &store,
                options,
                interrupted,
            )
            .await
        }
        Command::Serve { port } => serve::run(port, oracle, oracle_config, store, logger).await,
    }
}

fn expand_dir(dir: PathBuf, working_dir: &std::path::Path) -> PathBuf {
    if dir.is_absolute() {
        dir
    } else {
        working_dir.join(dir)
    }
}
