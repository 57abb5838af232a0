use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use greenroom_core::{
    EvalOutcome, InterviewSession, Phase, Speaker, SubmitOutcome, TurnOutcome, INTRO_SENTINEL,
};
use greenroom_oracle::{
    JobRole, Oracle, OracleConfig, OracleError, OracleKind, QaPair, QuestionOutcome,
    ScriptedOracle,
};

/// Oracle that fails its first `fail_times` calls, then delegates to the
/// scripted oracle. Exercises the retry path.
struct FlakyOracle {
    inner: ScriptedOracle,
    failures_left: AtomicUsize,
}

impl FlakyOracle {
    fn new(fail_times: usize) -> Self {
        Self {
            inner: ScriptedOracle::new(),
            failures_left: AtomicUsize::new(fail_times),
        }
    }

    fn take_failure(&self) -> bool {
        self.failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl Oracle for FlakyOracle {
    fn name(&self) -> &str {
        "Flaky"
    }

    fn kind(&self) -> OracleKind {
        OracleKind::Scripted
    }

    fn binary_path(&self) -> Option<&Path> {
        None
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn next_question(
        &self,
        role: JobRole,
        index: usize,
        history: &[QaPair],
        config: &OracleConfig,
    ) -> Result<QuestionOutcome, OracleError> {
        if self.take_failure() {
            return Err(OracleError::CallFailed("simulated outage".to_string()));
        }
        self.inner.next_question(role, index, history, config).await
    }

    async fn evaluate(
        &self,
        role: JobRole,
        history: &[QaPair],
        config: &OracleConfig,
    ) -> Result<String, OracleError> {
        if self.take_failure() {
            return Err(OracleError::CallFailed("simulated outage".to_string()));
        }
        self.inner.evaluate(role, history, config).await
    }
}

/// Oracle that declines at every index, violating the intro-only rule.
struct AlwaysDeclines;

#[async_trait]
impl Oracle for AlwaysDeclines {
    fn name(&self) -> &str {
        "AlwaysDeclines"
    }

    fn kind(&self) -> OracleKind {
        OracleKind::Scripted
    }

    fn binary_path(&self) -> Option<&Path> {
        None
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn next_question(
        &self,
        _role: JobRole,
        _index: usize,
        _history: &[QaPair],
        _config: &OracleConfig,
    ) -> Result<QuestionOutcome, OracleError> {
        Ok(QuestionOutcome::Decline("goodbye".to_string()))
    }

    async fn evaluate(
        &self,
        _role: JobRole,
        _history: &[QaPair],
        _config: &OracleConfig,
    ) -> Result<String, OracleError> {
        Ok("report".to_string())
    }
}

fn session(limit: usize) -> InterviewSession {
    let mut s = InterviewSession::new(JobRole::DataAnalyst, limit).unwrap();
    s.begin();
    s
}

async fn answer(
    session: &mut InterviewSession,
    oracle: &dyn Oracle,
    text: &str,
) -> TurnOutcome {
    assert_eq!(session.submit_answer(text), SubmitOutcome::Accepted);
    session.advance(oracle, &OracleConfig::default()).await
}

#[tokio::test]
async fn test_full_interview_with_three_questions() {
    let oracle = ScriptedOracle::new();
    let config = OracleConfig::default();
    let mut session = session(3);

    // Answering the welcome pairs the answer with the intro sentinel
    let outcome = answer(&mut session, &oracle, "Hi, ready").await;
    assert_eq!(outcome, TurnOutcome::QuestionAsked { index: 1 });
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.history()[0].question, INTRO_SENTINEL);
    assert_eq!(session.history()[0].answer, "Hi, ready");
    assert_eq!(session.current_index(), 2);

    // Two more real questions
    for expected_index in 2..=3 {
        let outcome = answer(&mut session, &oracle, "I would use a PivotTable for that").await;
        assert_eq!(
            outcome,
            TurnOutcome::QuestionAsked {
                index: expected_index
            }
        );
        assert_eq!(session.history().len(), session.current_index() - 1);
    }
    assert!(!session.finished());

    // Answering the final question closes the interview
    let outcome = answer(&mut session, &oracle, "Final answer, with plenty of detail").await;
    assert_eq!(outcome, TurnOutcome::Completed);
    assert!(session.finished());
    assert_eq!(session.phase(), Phase::Finished);
    assert!(!session.oracle_pending());

    // The answer to the last question is still recorded
    assert_eq!(session.history().len(), 4);

    // Exactly one evaluation, no matter how often the view is refreshed
    let messages_before = session.messages().len();
    let eval = session.finalize(&oracle, &config).await;
    assert!(matches!(eval, EvalOutcome::Evaluated { .. }));
    assert_eq!(session.messages().len(), messages_before + 2);

    let eval = session.finalize(&oracle, &config).await;
    assert_eq!(eval, EvalOutcome::AlreadyEvaluated);
    assert_eq!(session.messages().len(), messages_before + 2);

    // Finished sessions take no more answers
    assert_eq!(
        session.submit_answer("one more"),
        SubmitOutcome::AlreadyFinished
    );
}

#[tokio::test]
async fn test_transcript_alternates_and_is_append_only() {
    let oracle = ScriptedOracle::new();
    let mut session = session(3);

    answer(&mut session, &oracle, "Hello").await;
    let first_two: Vec<Speaker> = session.messages().iter().map(|m| m.speaker).collect();
    assert_eq!(first_two, vec![Speaker::Assistant, Speaker::User, Speaker::Assistant]);

    let snapshot: Vec<String> = session.messages().iter().map(|m| m.text.clone()).collect();
    answer(&mut session, &oracle, "Another answer").await;

    // Earlier messages are untouched by later turns
    let prefix = &session.messages()[..snapshot.len()];
    for (old, new) in snapshot.iter().zip(prefix) {
        assert_eq!(old, &new.text);
    }
}

#[tokio::test]
async fn test_oracle_failure_rolls_back_and_allows_retry() {
    let oracle = FlakyOracle::new(1);
    let mut session = session(3);

    let index_before = session.current_index();
    let history_before = session.history().to_vec();

    let outcome = answer(&mut session, &oracle, "Hi, ready").await;
    assert!(matches!(outcome, TurnOutcome::Failed { .. }));

    // Failure surfaces as an assistant message, state is untouched
    assert_eq!(session.current_index(), index_before);
    assert_eq!(session.history(), history_before.as_slice());
    assert!(!session.oracle_pending());
    assert_eq!(
        session.messages().last().unwrap().speaker,
        Speaker::Assistant
    );
    assert!(!session.finished());

    // Resubmitting the same answer retries the step and now succeeds
    let outcome = answer(&mut session, &oracle, "Hi, ready").await;
    assert_eq!(outcome, TurnOutcome::QuestionAsked { index: 1 });
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.current_index(), 2);
}

#[tokio::test]
async fn test_evaluation_failure_can_be_retried() {
    let scripted = ScriptedOracle::new();
    let config = OracleConfig::default();
    let mut session = session(3);

    answer(&mut session, &scripted, "Hi, ready").await;
    for _ in 0..3 {
        answer(&mut session, &scripted, "A long, detailed answer about spreadsheets").await;
    }
    assert!(session.finished());

    // Evaluation fails once, then succeeds on retry
    let flaky = FlakyOracle::new(1);
    let eval = session.finalize(&flaky, &config).await;
    assert!(matches!(eval, EvalOutcome::Failed { .. }));
    assert!(!session.evaluated());

    let eval = session.finalize(&flaky, &config).await;
    assert!(matches!(eval, EvalOutcome::Evaluated { .. }));
    assert!(session.evaluated());
}

#[tokio::test]
async fn test_decline_at_intro_ends_without_report() {
    let oracle = ScriptedOracle::new();
    let config = OracleConfig::default();
    let mut session = session(3);

    let outcome = answer(&mut session, &oracle, "No thanks, I don't want to continue").await;
    assert_eq!(outcome, TurnOutcome::Declined);
    assert!(session.finished());

    // A declined interview is never evaluated
    assert_eq!(
        session.finalize(&oracle, &config).await,
        EvalOutcome::AlreadyEvaluated
    );
}

#[tokio::test]
async fn test_decline_past_intro_is_a_retryable_failure() {
    let scripted = ScriptedOracle::new();
    let declining = AlwaysDeclines;
    let mut session = session(3);

    // Get past the intro with the well-behaved oracle
    answer(&mut session, &scripted, "Hi, ready").await;
    assert_eq!(session.current_index(), 2);

    let outcome = answer(&mut session, &declining, "I don't know").await;
    assert!(matches!(outcome, TurnOutcome::Failed { .. }));
    assert_eq!(session.current_index(), 2);
    assert_eq!(session.history().len(), 1);
    assert!(!session.finished());
}

#[tokio::test]
async fn test_finished_is_monotonic_until_reset() {
    let oracle = ScriptedOracle::new();
    let config = OracleConfig::default();
    let mut session = session(3);

    answer(&mut session, &oracle, "Hi, ready").await;
    for _ in 0..3 {
        answer(&mut session, &oracle, "Sure, here's how I'd do it in Excel").await;
    }
    assert!(session.finished());

    session.finalize(&oracle, &config).await;
    assert!(session.finished());
    session.finalize(&oracle, &config).await;
    assert!(session.finished());

    session.reset();
    assert!(!session.finished());
    assert_eq!(session.phase(), Phase::NotStarted);
}
