use serde::{Deserialize, Serialize};

/// Job roles the interviewer knows how to question for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobRole {
    #[serde(rename = "Data Analyst")]
    DataAnalyst,
    #[serde(rename = "Financial Analyst")]
    FinancialAnalyst,
    #[serde(rename = "Operations Analyst")]
    OperationsAnalyst,
}

impl JobRole {
    pub const ALL: [JobRole; 3] = [
        JobRole::DataAnalyst,
        JobRole::FinancialAnalyst,
        JobRole::OperationsAnalyst,
    ];

    /// Excel topics the question prompt steers toward for this role
    pub fn focus_areas(&self) -> &'static str {
        match self {
            JobRole::DataAnalyst => "PivotTables, data cleaning, dashboards, formulas",
            JobRole::FinancialAnalyst => {
                "financial modeling, forecasting, sensitivity analysis"
            }
            JobRole::OperationsAnalyst => {
                "supply chain data, scenario analysis, scheduling in Excel"
            }
        }
    }
}

impl std::fmt::Display for JobRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobRole::DataAnalyst => write!(f, "Data Analyst"),
            JobRole::FinancialAnalyst => write!(f, "Financial Analyst"),
            JobRole::OperationsAnalyst => write!(f, "Operations Analyst"),
        }
    }
}

impl std::str::FromStr for JobRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], " ").as_str() {
            "data analyst" | "data" => Ok(JobRole::DataAnalyst),
            "financial analyst" | "finance" | "financial" => Ok(JobRole::FinancialAnalyst),
            "operations analyst" | "operations" | "ops" => Ok(JobRole::OperationsAnalyst),
            _ => Err(format!("Unknown job role: {}", s)),
        }
    }
}

/// One completed question/answer exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

impl QaPair {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}
