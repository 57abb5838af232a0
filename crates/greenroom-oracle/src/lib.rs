mod claude;
mod opencode;
mod outcome;
mod prompts;
mod scripted;
mod spawner;
mod traits;
mod types;

pub use claude::ClaudeOracle;
pub use opencode::OpenCodeOracle;
pub use outcome::{OutcomeParseError, QuestionOutcome};
pub use prompts::InterviewPrompts;
pub use scripted::ScriptedOracle;
pub use spawner::{OracleOutput, ProcessSpawner};
pub use traits::{Oracle, OracleConfig, OracleError, OracleKind};
pub use types::{JobRole, QaPair};

/// Create an oracle by kind
pub fn create_oracle(kind: OracleKind) -> Box<dyn Oracle> {
    match kind {
        OracleKind::ClaudeCode => Box::new(ClaudeOracle::new()),
        OracleKind::OpenCode => Box::new(OpenCodeOracle::new()),
        OracleKind::Scripted => Box::new(ScriptedOracle::new()),
    }
}
