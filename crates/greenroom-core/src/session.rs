use tracing::{debug, warn};

use greenroom_oracle::{JobRole, Oracle, OracleConfig, QaPair, QuestionOutcome};

use crate::error::SessionError;
use crate::outcome::{EvalOutcome, SubmitOutcome, TurnOutcome};
use crate::transcript::{Message, SessionView, Speaker};

pub const MIN_QUESTION_LIMIT: usize = 3;
pub const MAX_QUESTION_LIMIT: usize = 10;
pub const DEFAULT_QUESTION_LIMIT: usize = 5;

/// Question label paired with the answer to the welcome message. The welcome
/// is not itself an interview question, so the first history entry gets this
/// sentinel instead of real question text.
pub const INTRO_SENTINEL: &str = "Intro";

const CLOSING_MESSAGE: &str = "🎉 That concludes the interview!";
const REPORT_ANNOUNCEMENT: &str =
    "📊 The interview is now complete. Here's your evaluation report:";
const ORACLE_APOLOGY: &str =
    "Sorry, something went wrong on my end. Please send that again and I'll retry.";

fn welcome_message(role: JobRole) -> String {
    format!(
        "👋 Welcome to the Excel mock interview for the {} role!\n\nShall we start the interview?",
        role
    )
}

/// Lifecycle phase, derived from session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    AwaitingAnswer,
    OraclePending,
    Finished,
}

/// One end-to-end interview run for a single role and question count.
///
/// Owns the full transcript, the question/answer history, and the turn
/// counter. All oracle calls are driven through here, one at a time; the
/// `oracle_pending` guard rejects a second submission while a call is
/// logically in flight.
#[derive(Debug, Clone)]
pub struct InterviewSession {
    role: JobRole,
    question_limit: usize,
    /// 1-based index of the next question to ask
    current_index: usize,
    history: Vec<QaPair>,
    messages: Vec<Message>,
    finished: bool,
    oracle_pending: bool,
    evaluated: bool,
}

impl InterviewSession {
    pub fn new(role: JobRole, question_limit: usize) -> Result<Self, SessionError> {
        if !(MIN_QUESTION_LIMIT..=MAX_QUESTION_LIMIT).contains(&question_limit) {
            return Err(SessionError::QuestionLimitOutOfRange {
                given: question_limit,
            });
        }
        Ok(Self {
            role,
            question_limit,
            current_index: 1,
            history: Vec::new(),
            messages: Vec::new(),
            finished: false,
            oracle_pending: false,
            evaluated: false,
        })
    }

    pub fn role(&self) -> JobRole {
        self.role
    }

    pub fn question_limit(&self) -> usize {
        self.question_limit
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn history(&self) -> &[QaPair] {
        &self.history
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    pub fn oracle_pending(&self) -> bool {
        self.oracle_pending
    }

    pub fn evaluated(&self) -> bool {
        self.evaluated
    }

    pub fn phase(&self) -> Phase {
        if self.messages.is_empty() {
            Phase::NotStarted
        } else if self.finished {
            Phase::Finished
        } else if self.oracle_pending {
            Phase::OraclePending
        } else {
            Phase::AwaitingAnswer
        }
    }

    /// Read-only view for rendering. Never mutates state.
    pub fn view(&self) -> SessionView {
        SessionView {
            messages: self.messages.clone(),
            finished: self.finished,
        }
    }

    /// One-time unconditional transition out of `NotStarted`: synthesize the
    /// welcome message. A no-op once any message exists.
    pub fn begin(&mut self) {
        if self.messages.is_empty() {
            self.messages
                .push(Message::assistant(welcome_message(self.role)));
        }
    }

    /// Record a candidate answer verbatim and mark an oracle call pending.
    pub fn submit_answer(&mut self, text: &str) -> SubmitOutcome {
        if self.finished {
            return SubmitOutcome::AlreadyFinished;
        }
        if self.oracle_pending {
            return SubmitOutcome::AlreadyPending;
        }
        if text.trim().is_empty() {
            return SubmitOutcome::IgnoredEmpty;
        }

        self.messages.push(Message::user(text));
        self.oracle_pending = true;
        debug!(index = self.current_index, "Answer submitted");
        SubmitOutcome::Accepted
    }

    /// Drive the pending oracle round-trip: pair the answer with its question,
    /// then either fetch the next question or close out the interview.
    ///
    /// On oracle failure the provisional history entry is rolled back and an
    /// apology is appended, so resubmitting the same answer retries the step.
    pub async fn advance(&mut self, oracle: &dyn Oracle, config: &OracleConfig) -> TurnOutcome {
        if !self.oracle_pending {
            return TurnOutcome::Idle;
        }

        let answer = match self.last_user_text() {
            Some(text) => text,
            None => {
                // Pending without a user message means a caller bug; recover
                warn!("Oracle call pending with no user message");
                self.oracle_pending = false;
                return TurnOutcome::Idle;
            }
        };

        let question = if self.current_index == 1 {
            INTRO_SENTINEL.to_string()
        } else {
            self.last_assistant_text().unwrap_or_else(|| {
                warn!("No prior question found; using sentinel");
                INTRO_SENTINEL.to_string()
            })
        };

        self.history.push(QaPair::new(question, answer));

        if self.current_index > self.question_limit {
            self.finished = true;
            self.oracle_pending = false;
            self.messages.push(Message::assistant(CLOSING_MESSAGE));
            debug!(turns = self.history.len(), "Interview completed");
            return TurnOutcome::Completed;
        }

        match oracle
            .next_question(self.role, self.current_index, &self.history, config)
            .await
        {
            Ok(QuestionOutcome::Question(text)) => {
                self.messages.push(Message::assistant(text));
                let index = self.current_index;
                self.current_index += 1;
                self.oracle_pending = false;
                TurnOutcome::QuestionAsked { index }
            }
            Ok(QuestionOutcome::Decline(text)) => {
                if self.current_index == 1 {
                    // The candidate refused to begin; end gracefully with no report
                    self.messages.push(Message::assistant(text));
                    self.finished = true;
                    self.evaluated = true;
                    self.oracle_pending = false;
                    TurnOutcome::Declined
                } else {
                    // Declines are only legitimate at the intro
                    warn!(
                        index = self.current_index,
                        "Oracle declined past the intro; treating as failure"
                    );
                    self.fail_turn("oracle declined past question 1".to_string())
                }
            }
            Err(e) => self.fail_turn(e.to_string()),
        }
    }

    fn fail_turn(&mut self, error: String) -> TurnOutcome {
        self.history.pop();
        self.messages.push(Message::assistant(ORACLE_APOLOGY));
        self.oracle_pending = false;
        warn!(error = %error, index = self.current_index, "Oracle call failed");
        TurnOutcome::Failed { error }
    }

    /// Produce the evaluation report, exactly once per finished session.
    ///
    /// Re-rendering a finished view must not re-invoke the oracle; callers
    /// can retry only after a `Failed` outcome.
    pub async fn finalize(&mut self, oracle: &dyn Oracle, config: &OracleConfig) -> EvalOutcome {
        if !self.finished {
            return EvalOutcome::NotFinished;
        }
        if self.evaluated {
            return EvalOutcome::AlreadyEvaluated;
        }

        match oracle.evaluate(self.role, &self.history, config).await {
            Ok(report) => {
                self.messages.push(Message::assistant(REPORT_ANNOUNCEMENT));
                self.messages.push(Message::assistant(report.clone()));
                self.evaluated = true;
                debug!(report_len = report.len(), "Evaluation recorded");
                EvalOutcome::Evaluated { report }
            }
            Err(e) => {
                self.messages.push(Message::assistant(ORACLE_APOLOGY));
                warn!(error = %e, "Evaluation failed");
                EvalOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    /// Discard all interview state, returning to `NotStarted` with the same
    /// role and question limit. Valid from any phase, including `Finished`.
    pub fn reset(&mut self) {
        self.current_index = 1;
        self.history.clear();
        self.messages.clear();
        self.finished = false;
        self.oracle_pending = false;
        self.evaluated = false;
    }

    /// Selecting a different role discards the session outright; history never
    /// migrates across roles. Selecting the same role is a no-op.
    pub fn select_role(&mut self, role: JobRole) {
        if self.role != role {
            self.role = role;
            self.reset();
        }
    }

    /// Changing the question count discards the session, like a role change;
    /// the limit is fixed for the lifetime of one interview run. Selecting
    /// the current limit is a no-op.
    pub fn select_question_limit(&mut self, question_limit: usize) -> Result<(), SessionError> {
        if !(MIN_QUESTION_LIMIT..=MAX_QUESTION_LIMIT).contains(&question_limit) {
            return Err(SessionError::QuestionLimitOutOfRange {
                given: question_limit,
            });
        }
        if self.question_limit != question_limit {
            self.question_limit = question_limit;
            self.reset();
        }
        Ok(())
    }

    fn last_user_text(&self) -> Option<String> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.speaker == Speaker::User)
            .map(|m| m.text.clone())
    }

    fn last_assistant_text(&self) -> Option<String> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.speaker == Speaker::Assistant)
            .map(|m| m.text.clone())
    }
}
