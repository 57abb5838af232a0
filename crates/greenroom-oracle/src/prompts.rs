use crate::{JobRole, QaPair};

/// Prompt templates for the interviewer
pub struct InterviewPrompts;

impl InterviewPrompts {
    /// Build the prompt that asks for interview question number `index`
    pub fn build_question_prompt(role: JobRole, index: usize, history: &[QaPair]) -> String {
        format!(
            r#"You are the co-founder of a fast-growing startup conducting a structured mock
Excel interview for the {role} role. You are asking interview question #{index}.

Previous conversation context:
{context}

Rules for asking questions:
1. For the first question only (Q1), check if the candidate is willing to start.
   - If the candidate explicitly says they do not want to continue, exit gracefully:
     respond with exactly one line of the form <decline>your short farewell message</decline>
     and nothing else.
   - If the candidate is willing, proceed.
2. From Q2 onward, always generate the next Excel question regardless of short or
   negative answers. Do NOT interpret "no" or "I don't know" as refusal to continue.
3. Q1 is an introductory question about the candidate's background and Excel usage
   experience. From Q2 onward, ask practical Excel questions relevant to {role}:
   {focus}.
4. Always test real-world Excel ability, not just theory. Adapt the follow-up based
   on the candidate's last response. Generate ONE clear, Excel-focused question.

Return ONLY the question text (or the decline block), nothing else."#,
            role = role,
            index = index,
            context = Self::format_history(history),
            focus = role.focus_areas(),
        )
    }

    /// Build the prompt that asks for the end-of-interview evaluation report
    pub fn build_evaluation_prompt(role: JobRole, history: &[QaPair]) -> String {
        format!(
            r#"Based on the full Excel interview conversation for the {role} role:

{context}

Provide a structured evaluation including:
1. Overall Decision (PASS/FAIL)
2. Score (0-100), based on correctness, clarity, efficiency, and practicality of answers
3. Key Strengths in Excel skills (formulas, PivotTables, data handling, analysis)
4. Areas for Improvement (specific Excel functions or concepts they struggled with)
5. Specific Tips for improving Excel proficiency for {role}
6. Final Recommendation on hiring suitability

Format the response clearly with headers and bullet points."#,
            role = role,
            context = Self::format_history(history),
        )
    }

    fn format_history(history: &[QaPair]) -> String {
        if history.is_empty() {
            return "No previous responses".to_string();
        }
        history
            .iter()
            .enumerate()
            .map(|(i, qa)| format!("Q{n}: {}\nA{n}: {}", qa.question, qa.answer, n = i + 1))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
