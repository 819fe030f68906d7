//! Critique record returned by the reflection pass

use super::text;
use serde::{Deserialize, Deserializer, Serialize};
use sift_domain::{Extractable, SchemaDescriptor};

const NOT_AVAILABLE: &str = "n/a";

/// Review of a parsed object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectionRecord {
    /// How well the object matches the expected format
    #[serde(default = "not_available", deserialize_with = "string_or_not_available")]
    pub review: String,

    /// Changes to make, as a bulleted list
    #[serde(default = "not_available", deserialize_with = "string_or_not_available")]
    pub recommendations: String,

    /// `perfect` or `needs work`
    #[serde(default = "not_available", deserialize_with = "string_or_not_available")]
    pub feedback: String,
}

impl Default for ReflectionRecord {
    fn default() -> Self {
        Self {
            review: not_available(),
            recommendations: not_available(),
            feedback: not_available(),
        }
    }
}

impl ReflectionRecord {
    /// Whether the reviewer asked for no changes
    pub fn is_perfect(&self) -> bool {
        self.feedback
            .trim()
            .trim_matches(|c: char| c == '\'' || c == '"' || c == '.' || c == '!')
            .eq_ignore_ascii_case("perfect")
    }
}

impl Extractable for ReflectionRecord {
    fn schema() -> SchemaDescriptor {
        SchemaDescriptor::new("ReflectionRecord", "Review of a parsed object")
            .field(text(
                "review",
                "Review of the parsed object as to how well it aligns with the expected format",
            ))
            .field(text(
                "recommendations",
                "Actionable recommendations formatted as a bulleted list for making necessary changes \
                 to align with the original formatting instructions, and improvements if needed for \
                 any attribute. Use examples as needed.",
            ))
            .field(text(
                "feedback",
                "'perfect' if no changes are required, or 'needs work' otherwise",
            ))
    }
}

fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

fn string_or_not_available<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(not_available))
}
