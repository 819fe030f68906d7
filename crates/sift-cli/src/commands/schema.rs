//! Schema command implementation.

use crate::cli::{SchemaArgs, SchemaKind};
use crate::error::Result;
use sift_domain::Extractable;
use sift_extractor::records::{JobProfile, ReflectionRecord, ResumeContents};

/// Execute the schema command.
pub fn execute_schema(args: SchemaArgs) -> Result<()> {
    println!("{}", render_schema(args.kind, args.json)?);
    Ok(())
}

/// Format instructions, or the bare JSON schema, for `kind`.
pub fn render_schema(kind: SchemaKind, json: bool) -> Result<String> {
    match kind {
        SchemaKind::Resume => render::<ResumeContents>(json),
        SchemaKind::Job => render::<JobProfile>(json),
        SchemaKind::Reflection => render::<ReflectionRecord>(json),
    }
}

fn render<T: Extractable>(json: bool) -> Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(&T::schema().to_json_schema())?)
    } else {
        Ok(T::format_instructions())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_schema_is_valid_json() {
        let rendered = render_schema(SchemaKind::Job, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["title"], "JobProfile");
        assert!(value["properties"]["professional_experience_with_tools"].is_object());
    }

    #[test]
    fn test_instructions_wrap_schema() {
        let rendered = render_schema(SchemaKind::Reflection, false).unwrap();
        assert!(rendered.contains("```json"));
        assert!(rendered.contains("feedback"));
    }

    #[test]
    fn test_resume_lists_required_sections() {
        let rendered = render_schema(SchemaKind::Resume, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["required"].as_array().unwrap().len(), 8);
    }
}
