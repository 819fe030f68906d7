//! Messages the workflow writes into the log

use sift_domain::{ExternalServiceError, Message, SchemaDescriptor};
use std::fmt::Display;

/// System instruction opening every run
pub const SYSTEM_INSTRUCTIONS: &str = "You are provided with TEXT. Your task is to extract information from TEXT \
and format as per FORMAT_INSTRUCTIONS provided.";

const NESTED_STRUCTURE_REMINDER: &str = "Make sure to process each item as per the instruction. Pay special \
attention to the nested structures and ensure your formatting follows instructions 100%.";

/// Builds the opening messages for one run
pub struct PromptBuilder<'a> {
    text: &'a str,
    format_instructions: String,
}

impl<'a> PromptBuilder<'a> {
    /// Create a builder for `text` and the target's format instructions
    pub fn new(text: &'a str, format_instructions: impl Into<String>) -> Self {
        Self {
            text,
            format_instructions: format_instructions.into(),
        }
    }

    /// Create a builder using the descriptor's generated instructions
    pub fn for_schema(text: &'a str, schema: &SchemaDescriptor) -> Self {
        Self::new(text, schema.format_instructions())
    }

    /// The system instruction and the user message carrying the text
    pub fn initial_messages(&self) -> [Message; 2] {
        [Message::system(SYSTEM_INSTRUCTIONS), Message::user(self.user_prompt())]
    }

    fn user_prompt(&self) -> String {
        format!(
            "TEXT:\n\n{}\n\n FORMAT_INSTRUCTIONS: {}\n{}",
            self.text, self.format_instructions, NESTED_STRUCTURE_REMINDER
        )
    }
}

/// Corrective message after a reply failed extraction or validation
pub fn correction(diagnostic: &dyn Display) -> Message {
    Message::user(format!("Error parsing JSON: {}\n Address these errors.", diagnostic))
}

/// Corrective message after the backend failed to answer
pub fn service_failure(error: &ExternalServiceError) -> Message {
    Message::user(format!(
        "The previous request failed ({}). Answer again following FORMAT_INSTRUCTIONS.",
        error
    ))
}

/// Request asking the reviewer to critique `parsed_json`
pub fn reflection_request(parsed_json: &str, reflection_instructions: &str) -> Message {
    Message::user(format!(
        "Review the parsed object: ```{}``` and provide your recommendations. Format your response \
         based on this format instructions: {}",
        parsed_json, reflection_instructions
    ))
}

/// Reviewer feedback handed back to the generator
pub fn reflection_feedback(review: &str, recommendations: &str) -> Message {
    Message::user(format!("Review:\n{}\nRecommendations: {}", review, recommendations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_domain::{FieldKind, FieldSpec, Role};

    fn schema() -> SchemaDescriptor {
        SchemaDescriptor::new("Person", "A person").field(FieldSpec::required("name", FieldKind::String, "Full name"))
    }

    #[test]
    fn test_initial_messages() {
        let [system, user] = PromptBuilder::for_schema("John Smith, 42", &schema()).initial_messages();
        assert_eq!(system.role(), Role::System);
        assert_eq!(system.content(), SYSTEM_INSTRUCTIONS);
        assert_eq!(user.role(), Role::User);
        assert!(user.content().starts_with("TEXT:\n\nJohn Smith, 42\n\n FORMAT_INSTRUCTIONS: "));
        assert!(user.content().contains("\"name\""));
        assert!(user.content().ends_with("follows instructions 100%."));
    }

    #[test]
    fn test_custom_format_instructions() {
        let [_, user] = PromptBuilder::new("text", "Return {\"name\": ...}").initial_messages();
        assert!(user.content().contains("FORMAT_INSTRUCTIONS: Return {\"name\": ...}"));
    }

    #[test]
    fn test_correction_text() {
        let msg = correction(&"field 'name' is missing");
        assert_eq!(msg.role(), Role::User);
        assert_eq!(msg.content(), "Error parsing JSON: field 'name' is missing\n Address these errors.");
    }

    #[test]
    fn test_service_failure_names_error() {
        let msg = service_failure(&ExternalServiceError::RateLimited);
        assert!(msg.content().contains("Rate limit exceeded"));
    }

    #[test]
    fn test_reflection_feedback_text() {
        let msg = reflection_feedback("Phone missing", "- add phone");
        assert_eq!(msg.content(), "Review:\nPhone missing\nRecommendations: - add phone");
    }
}
