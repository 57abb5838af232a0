use thiserror::Error;
use tracing::debug;

/// What the oracle produced for a question request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionOutcome {
    /// The next interview question
    Question(String),
    /// The candidate refused to begin; the interview ends gracefully.
    /// Only honored by the state machine for question 1.
    Decline(String),
}

#[derive(Error, Debug)]
pub enum OutcomeParseError {
    #[error("Oracle output was empty after trimming")]
    Empty,

    #[error("Malformed decline block in oracle output")]
    MalformedDecline,
}

impl QuestionOutcome {
    /// Parse raw oracle output into a question or a decline.
    ///
    /// The question prompt instructs the model to wrap a graceful exit in a
    /// `<decline>...</decline>` block and to otherwise return only the
    /// question text. Anything without a decline block is the question.
    pub fn parse(raw: &str) -> Result<Self, OutcomeParseError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(OutcomeParseError::Empty);
        }

        let start = trimmed.find("<decline>");
        let end = trimmed.find("</decline>");

        match (start, end) {
            (Some(s), Some(e)) if s < e => {
                let message = trimmed[s + 9..e].trim();
                debug!(message_len = message.len(), "Parsed decline block");
                if message.is_empty() {
                    Err(OutcomeParseError::MalformedDecline)
                } else {
                    Ok(QuestionOutcome::Decline(message.to_string()))
                }
            }
            (Some(_), _) | (_, Some(_)) => Err(OutcomeParseError::MalformedDecline),
            (None, None) => Ok(QuestionOutcome::Question(trimmed.to_string())),
        }
    }

    pub fn is_decline(&self) -> bool {
        matches!(self, QuestionOutcome::Decline(_))
    }

    /// The text carried by either variant
    pub fn text(&self) -> &str {
        match self {
            QuestionOutcome::Question(t) | QuestionOutcome::Decline(t) => t,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_question() {
        let outcome =
            QuestionOutcome::parse("  How would you remove duplicates from a column?  ").unwrap();
        assert_eq!(
            outcome,
            QuestionOutcome::Question("How would you remove duplicates from a column?".into())
        );
    }

    #[test]
    fn test_parse_decline_block() {
        let raw = "<decline>No problem, thanks for your time today!</decline>";
        let outcome = QuestionOutcome::parse(raw).unwrap();
        assert!(outcome.is_decline());
        assert_eq!(outcome.text(), "No problem, thanks for your time today!");
    }

    #[test]
    fn test_parse_decline_with_surrounding_text() {
        let raw = "Understood.\n<decline>Good luck with your search.</decline>\n";
        let outcome = QuestionOutcome::parse(raw).unwrap();
        assert!(outcome.is_decline());
    }

    #[test]
    fn test_parse_empty_is_error() {
        assert!(matches!(
            QuestionOutcome::parse("   \n "),
            Err(OutcomeParseError::Empty)
        ));
    }

    #[test]
    fn test_parse_unclosed_decline_is_error() {
        assert!(matches!(
            QuestionOutcome::parse("<decline>bye"),
            Err(OutcomeParseError::MalformedDecline)
        ));
    }

    #[test]
    fn test_parse_empty_decline_is_error() {
        assert!(matches!(
            QuestionOutcome::parse("<decline> </decline>"),
            Err(OutcomeParseError::MalformedDecline)
        ));
    }
}
