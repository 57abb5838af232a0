//! Console interview flow: the same state machine as the HTTP API, driven by
//! stdin answers instead of requests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::{Input, Select};

use greenroom_core::{EvalOutcome, InterviewSession, SubmitOutcome, TurnOutcome};
use greenroom_logging::{LogEvent, Logger};
use greenroom_oracle::{JobRole, Oracle, OracleConfig};
use greenroom_reports::{ReportRecord, ReportStore};

pub struct ConsoleOptions {
    pub role: Option<JobRole>,
    pub question_limit: usize,
    pub save_report: bool,
}

pub async fn run_interview(
    oracle: &dyn Oracle,
    config: &OracleConfig,
    logger: &Logger,
    store: &ReportStore,
    options: ConsoleOptions,
    interrupted: Arc<AtomicBool>,
) -> Result<()> {
    let role = match options.role {
        Some(role) => role,
        None => pick_role()?,
    };

    let mut session = InterviewSession::new(role, options.question_limit)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    logger.log(&LogEvent::SessionStarted {
        role: role.to_string(),
        question_limit: options.question_limit,
    });

    session.begin();
    print_assistant(&session.messages().last().expect("welcome message").text);

    while !session.finished() {
        if interrupted.load(Ordering::SeqCst) {
            println!("{}", "Interview abandoned.".dimmed());
            return Ok(());
        }

        let answer: String = Input::new()
            .with_prompt("Your answer")
            .allow_empty(true)
            .interact_text()
            .context("Failed to read answer")?;

        match session.submit_answer(&answer) {
            SubmitOutcome::Accepted => {}
            SubmitOutcome::IgnoredEmpty => continue,
            SubmitOutcome::AlreadyPending | SubmitOutcome::AlreadyFinished => continue,
        }
        logger.log(&LogEvent::AnswerSubmitted {
            index: session.current_index(),
            chars: answer.len(),
        });

        logger.log(&LogEvent::OracleStarted {
            index: session.current_index(),
        });
        let outcome = session.advance(oracle, config).await;
        match outcome {
            TurnOutcome::QuestionAsked { index } => {
                logger.log(&LogEvent::QuestionAsked { index });
                print_assistant(&session.messages().last().expect("question").text);
            }
            TurnOutcome::Declined => {
                logger.log(&LogEvent::CandidateDeclined);
                print_assistant(&session.messages().last().expect("farewell").text);
                return Ok(());
            }
            TurnOutcome::Completed => {
                logger.log(&LogEvent::InterviewFinished {
                    turns: session.history().len(),
                });
                print_assistant(&session.messages().last().expect("closing").text);
            }
            TurnOutcome::Failed { error } => {
                logger.log(&LogEvent::OracleFailed {
                    index: session.current_index(),
                    error,
                });
                print_assistant(&session.messages().last().expect("apology").text);
            }
            TurnOutcome::Idle => {}
        }
    }

    logger.log(&LogEvent::EvaluationStarted);
    match session.finalize(oracle, config).await {
        EvalOutcome::Evaluated { report } => {
            logger.log(&LogEvent::EvaluationRecorded {
                report_chars: report.len(),
            });
            println!();
            println!("{}", "=== Evaluation Report ===".bold());
            println!("{}", report);

            if options.save_report {
                let record = ReportRecord::new(
                    role,
                    options.question_limit,
                    session.history().to_vec(),
                    report,
                );
                let path = store.save(&record)?;
                logger.log(&LogEvent::ReportSaved { path });
            }
        }
        EvalOutcome::Failed { error } => {
            anyhow::bail!("Evaluation failed: {}", error);
        }
        EvalOutcome::NotFinished | EvalOutcome::AlreadyEvaluated => {}
    }

    Ok(())
}

fn pick_role() -> Result<JobRole> {
    let names: Vec<String> = JobRole::ALL.iter().map(|r| r.to_string()).collect();
    let index = Select::new()
        .with_prompt("Select job role")
        .items(&names)
        .default(0)
        .interact()
        .context("Failed to select role")?;
    Ok(JobRole::ALL[index])
}

fn print_assistant(text: &str) {
    println!();
    println!("{} {}", "Interviewer:".bright_cyan().bold(), text);
}
