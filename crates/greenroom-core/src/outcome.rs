/// Result of submitting candidate input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Input recorded, an oracle call is now pending
    Accepted,
    /// Empty or whitespace-only input; nothing changed
    IgnoredEmpty,
    /// An oracle call is already in flight for this session
    AlreadyPending,
    /// The interview is over; no further answers are taken
    AlreadyFinished,
}

/// Result of driving one pending oracle round-trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// No oracle call was pending
    Idle,
    /// The next question was appended to the transcript
    QuestionAsked { index: usize },
    /// The candidate refused to begin at the intro; interview ended gracefully
    Declined,
    /// The question limit was reached; the session is now finished
    Completed,
    /// The oracle call failed; state was rolled back so the answer can be resubmitted
    Failed { error: String },
}

/// Result of requesting the end-of-interview evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalOutcome {
    /// Report appended to the transcript
    Evaluated { report: String },
    /// The session is not finished yet
    NotFinished,
    /// The report was already produced for this session
    AlreadyEvaluated,
    /// The oracle call failed; evaluation can be retried
    Failed { error: String },
}
