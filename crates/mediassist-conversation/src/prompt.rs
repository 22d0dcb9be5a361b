//! Prompt construction for question generation

use mediassist_domain::Turn;

/// Header that introduces the conversation history in the prompt
pub const HISTORY_HEADER: &str = "Conversation so far:";

/// Builds the prompt that asks for the next intake question
pub struct QuestionPromptBuilder<'a> {
    history: &'a [Turn],
}

impl<'a> QuestionPromptBuilder<'a> {
    /// Create a builder over the (already bounded) recent history
    pub fn new(history: &'a [Turn]) -> Self {
        Self { history }
    }

    /// Build the complete prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(QUESTION_INSTRUCTIONS);
        prompt.push_str("\n\n");

        prompt.push_str(HISTORY_HEADER);
        prompt.push('\n');
        for turn in self.history {
            prompt.push_str(&turn.render());
            prompt.push('\n');
        }
        prompt.push('\n');

        prompt.push_str(NEXT_QUESTION_REMINDER);
        prompt
    }
}

/// Fixed instruction listing the information to elicit
pub const QUESTION_INSTRUCTIONS: &str = r#"You are a friendly medical intake assistant talking to a patient before their appointment.
Gather the following information, one question at a time:

- Name and age
- Why they are here today
- When their symptoms started and whether they have gotten worse
- Their pain on a scale from 1 to 10
- Where they feel the pain and whether it spreads anywhere else
- Other symptoms such as nausea, dizziness, or difficulty breathing
- Any recent fever, chills, or cough
- Allergies to medications or foods
- Existing medical conditions such as diabetes, asthma, or heart problems
- Medications they are currently taking
- Recent contact with anyone who is sick or has similar symptoms

Be brief and empathetic. Do not diagnose or give medical advice."#;

const NEXT_QUESTION_REMINDER: &str =
    "Reply with only the next single question to ask the patient, and nothing else.";

#[cfg(test)]
mod tests {
    use super::*;
    use mediassist_domain::Speaker;

    #[test]
    fn test_prompt_includes_instructions() {
        let prompt = QuestionPromptBuilder::new(&[]).build();
        assert!(prompt.starts_with(QUESTION_INSTRUCTIONS));
        assert!(prompt.contains("scale from 1 to 10"));
        assert!(prompt.ends_with(NEXT_QUESTION_REMINDER));
    }

    #[test]
    fn test_empty_history_section() {
        let prompt = QuestionPromptBuilder::new(&[]).build();
        assert!(prompt.contains(&format!("{}\n\n{}", HISTORY_HEADER, NEXT_QUESTION_REMINDER)));
    }

    #[test]
    fn test_history_rendered_as_role_lines() {
        let history = vec![
            Turn::new(Speaker::Assistant, "What is your name?"),
            Turn::new(Speaker::User, "Jane"),
        ];
        let prompt = QuestionPromptBuilder::new(&history).build();
        assert!(
            prompt.contains("Conversation so far:\nassistant: What is your name?\nuser: Jane\n")
        );
    }
}
