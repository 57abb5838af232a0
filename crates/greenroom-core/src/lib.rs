mod error;
mod outcome;
mod session;
mod transcript;

pub use error::SessionError;
pub use outcome::{EvalOutcome, SubmitOutcome, TurnOutcome};
pub use session::{
    InterviewSession, Phase, DEFAULT_QUESTION_LIMIT, INTRO_SENTINEL, MAX_QUESTION_LIMIT,
    MIN_QUESTION_LIMIT,
};
pub use transcript::{Message, SessionView, Speaker};
