use thiserror::Error;

use crate::{MAX_QUESTION_LIMIT, MIN_QUESTION_LIMIT};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(
        "Question limit {given} is out of range [{MIN_QUESTION_LIMIT}, {MAX_QUESTION_LIMIT}]"
    )]
    QuestionLimitOutOfRange { given: usize },
}
