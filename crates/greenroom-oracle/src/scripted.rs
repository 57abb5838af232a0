use async_trait::async_trait;
use std::path::Path;

use crate::{JobRole, Oracle, OracleConfig, OracleError, OracleKind, QaPair, QuestionOutcome};

/// Deterministic oracle with canned questions and a rule-based report.
///
/// Used for offline runs and for testing the state machine without any
/// network access or LLM binary. Question selection depends only on the
/// role and the question index, so replays are reproducible.
pub struct ScriptedOracle;

const INTRO_QUESTION: &str =
    "To get us started, tell me about your background and how you have used Excel in your work or studies.";

const DATA_ANALYST_QUESTIONS: &[&str] = &[
    "You receive a 50,000-row export with duplicate records and inconsistent casing. Walk me through cleaning it in Excel.",
    "How would you build a PivotTable to show monthly sales by region, and then add year-over-year growth?",
    "A VLOOKUP is returning #N/A for values you can see in the source sheet. How do you debug it?",
    "Describe how you would design a refreshable dashboard for a weekly KPI review.",
    "When would you reach for INDEX/MATCH over VLOOKUP, and why?",
    "How do you use conditional formatting to surface outliers in a large dataset?",
    "Explain how you would combine data from three differently-shaped sheets into one analysis.",
    "What is your approach to validating a formula-heavy workbook you inherited from someone else?",
    "How would you use COUNTIFS and SUMIFS to answer a segmentation question from a manager?",
];

const FINANCIAL_ANALYST_QUESTIONS: &[&str] = &[
    "Walk me through building a three-statement model skeleton in Excel. Which tabs and links do you set up first?",
    "How would you structure a sensitivity analysis on revenue growth and margin assumptions?",
    "A DCF output looks wrong. What are the first formula-level checks you run?",
    "How do you build a rolling 12-month forecast that updates when actuals land?",
    "Describe using Goal Seek or Data Tables to answer a what-if question from the CFO.",
    "How do you guard a financial model against hard-coded numbers buried in formulas?",
    "Explain how you would model a loan amortization schedule from scratch.",
    "What controls do you add so a shared model fails loudly instead of silently?",
    "How would you reconcile a variance between forecast and actuals using Excel alone?",
];

const OPERATIONS_ANALYST_QUESTIONS: &[&str] = &[
    "You get daily warehouse throughput data from four sites in different layouts. How do you normalize it?",
    "How would you build a scenario analysis comparing two shift-scheduling options in Excel?",
    "Describe setting up a reorder-point tracker with conditional alerts for inventory.",
    "A supplier lead-time dataset has gaps and obvious typos. Walk me through your cleanup.",
    "How would you model capacity utilization across a month with variable demand?",
    "Explain a time you used Excel to find a bottleneck in a process. What functions did it take?",
    "How do you build a schedule adherence report that a floor manager will actually read?",
    "What is your approach to forecasting weekly order volume with only Excel?",
    "How would you track and visualize on-time delivery performance by carrier?",
];

fn question_bank(role: JobRole) -> &'static [&'static str] {
    match role {
        JobRole::DataAnalyst => DATA_ANALYST_QUESTIONS,
        JobRole::FinancialAnalyst => FINANCIAL_ANALYST_QUESTIONS,
        JobRole::OperationsAnalyst => OPERATIONS_ANALYST_QUESTIONS,
    }
}

/// Phrases treated as an explicit refusal to begin (intro answer only)
fn is_refusal(answer: &str) -> bool {
    let lower = answer.trim().to_lowercase();
    lower == "no"
        || lower.contains("don't want")
        || lower.contains("do not want")
        || lower.contains("not interested")
        || lower.contains("no thanks")
        || lower.contains("stop the interview")
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ScriptedOracle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Oracle for ScriptedOracle {
    fn name(&self) -> &str {
        "Scripted"
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
        _config: &OracleConfig,
    ) -> Result<QuestionOutcome, OracleError> {
        if index == 0 {
            return Err(OracleError::ContractViolation(
                "question index is 1-based".to_string(),
            ));
        }

        // Q1 only: an explicit refusal in the intro answer ends the interview
        if index == 1 {
            if let Some(intro) = history.last() {
                if is_refusal(&intro.answer) {
                    return Ok(QuestionOutcome::Decline(
                        "No problem at all. Thanks for stopping by, and good luck with your search!"
                            .to_string(),
                    ));
                }
            }
            return Ok(QuestionOutcome::Question(INTRO_QUESTION.to_string()));
        }

        let bank = question_bank(role);
        let question = bank[(index - 2) % bank.len()];
        Ok(QuestionOutcome::Question(question.to_string()))
    }

    async fn evaluate(
        &self,
        role: JobRole,
        history: &[QaPair],
        _config: &OracleConfig,
    ) -> Result<String, OracleError> {
        if history.is_empty() {
            return Err(OracleError::ContractViolation(
                "cannot evaluate an empty interview".to_string(),
            ));
        }

        // Crude but deterministic: substantive answers score, one-liners do not
        let total = history.len();
        let substantive = history
            .iter()
            .filter(|qa| qa.answer.trim().len() >= 40)
            .count();
        let score = (substantive * 100) / total;
        let passed = score >= 60;

        let strengths: Vec<String> = history
            .iter()
            .filter(|qa| qa.answer.trim().len() >= 40)
            .map(|qa| format!("- Gave a worked answer to: {}", qa.question))
            .collect();
        let improvements: Vec<String> = history
            .iter()
            .filter(|qa| qa.answer.trim().len() < 40)
            .map(|qa| format!("- Expand on: {}", qa.question))
            .collect();

        let report = format!(
            r#"## Overall Decision: {decision}

## Score: {score}/100

## Key Strengths
{strengths}

## Areas for Improvement
{improvements}

## Tips
- Practice explaining each Excel step out loud, naming the exact functions used.
- Build one small workbook per week that exercises the areas above.

## Final Recommendation
{recommendation} for the {role} role."#,
            decision = if passed { "PASS" } else { "FAIL" },
            score = score,
            strengths = if strengths.is_empty() {
                "- None identified".to_string()
            } else {
                strengths.join("\n")
            },
            improvements = if improvements.is_empty() {
                "- None identified".to_string()
            } else {
                improvements.join("\n")
            },
            recommendation = if passed {
                "Recommended to proceed"
            } else {
                "Not recommended at this time"
            },
            role = role,
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> OracleConfig {
        OracleConfig::default()
    }

    #[tokio::test]
    async fn test_first_question_is_the_intro() {
        let oracle = ScriptedOracle::new();
        let history = vec![QaPair::new("Intro", "Hi, ready to go")];
        let outcome = oracle
            .next_question(JobRole::DataAnalyst, 1, &history, &config())
            .await
            .unwrap();
        assert_eq!(outcome, QuestionOutcome::Question(INTRO_QUESTION.into()));
    }

    #[tokio::test]
    async fn test_refusal_at_intro_declines() {
        let oracle = ScriptedOracle::new();
        let history = vec![QaPair::new("Intro", "No thanks, I don't want to do this")];
        let outcome = oracle
            .next_question(JobRole::DataAnalyst, 1, &history, &config())
            .await
            .unwrap();
        assert!(outcome.is_decline());
    }

    #[tokio::test]
    async fn test_negative_answer_after_intro_still_progresses() {
        let oracle = ScriptedOracle::new();
        let history = vec![
            QaPair::new("Intro", "Hi, ready"),
            QaPair::new("Tell me about Excel", "I don't know"),
        ];
        let outcome = oracle
            .next_question(JobRole::DataAnalyst, 3, &history, &config())
            .await
            .unwrap();
        assert!(!outcome.is_decline());
    }

    #[tokio::test]
    async fn test_questions_are_deterministic_and_progressing() {
        let oracle = ScriptedOracle::new();
        let history = vec![QaPair::new("Intro", "Ready")];
        let q2 = oracle
            .next_question(JobRole::FinancialAnalyst, 2, &history, &config())
            .await
            .unwrap();
        let q2_again = oracle
            .next_question(JobRole::FinancialAnalyst, 2, &history, &config())
            .await
            .unwrap();
        let q3 = oracle
            .next_question(JobRole::FinancialAnalyst, 3, &history, &config())
            .await
            .unwrap();
        assert_eq!(q2, q2_again);
        assert_ne!(q2.text(), q3.text());
    }

    #[tokio::test]
    async fn test_evaluation_contains_required_sections() {
        let oracle = ScriptedOracle::new();
        let history = vec![
            QaPair::new("Intro", "I have three years of reporting experience using Excel daily"),
            QaPair::new("PivotTables?", "idk"),
        ];
        let report = oracle
            .evaluate(JobRole::DataAnalyst, &history, &config())
            .await
            .unwrap();
        assert!(report.contains("Overall Decision"));
        assert!(report.contains("/100"));
        assert!(report.contains("Key Strengths"));
        assert!(report.contains("Areas for Improvement"));
        assert!(report.contains("Final Recommendation"));
    }

    #[tokio::test]
    async fn test_evaluate_empty_history_is_contract_violation() {
        let oracle = ScriptedOracle::new();
        let result = oracle.evaluate(JobRole::DataAnalyst, &[], &config()).await;
        assert!(matches!(result, Err(OracleError::ContractViolation(_))));
    }
}
