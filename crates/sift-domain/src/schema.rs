//! Schema descriptors for target record types
//!
//! A [`SchemaDescriptor`] names a record type, lists its fields and knows how to
//! render generator-facing format instructions. It also checks a parsed JSON
//! value against the declared fields and reports every offending path, which is
//! what lets the controller feed precise corrections back to the generator.

use serde_json::{json, Map, Value};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Errors for descriptors that cannot describe any record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Descriptor has no name
    #[error("Schema name is empty")]
    EmptyName,

    /// A field has no name
    #[error("Schema '{schema}' has a field with an empty name")]
    EmptyFieldName {
        /// Owning schema
        schema: String,
    },

    /// Two fields share a name
    #[error("Schema '{schema}' declares field '{field}' more than once")]
    DuplicateField {
        /// Owning schema
        schema: String,
        /// Repeated field name
        field: String,
    },
}

/// Semantic type of a field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// UTF-8 text
    String,
    /// Whole number
    Integer,
    /// Any JSON number
    Number,
    /// true / false
    Boolean,
    /// Nested record
    Object(Box<SchemaDescriptor>),
    /// Homogeneous list
    Array(Box<FieldKind>),
}

impl FieldKind {
    /// Nested record kind
    pub fn object(schema: SchemaDescriptor) -> Self {
        FieldKind::Object(Box::new(schema))
    }

    /// List kind
    pub fn array_of(item: FieldKind) -> Self {
        FieldKind::Array(Box::new(item))
    }

    /// JSON type name
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Integer => "integer",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Object(_) => "object",
            FieldKind::Array(_) => "array",
        }
    }

    fn to_json_schema(&self) -> Value {
        match self {
            FieldKind::Object(schema) => schema.to_json_schema(),
            FieldKind::Array(item) => json!({
                "type": "array",
                "items": item.to_json_schema(),
            }),
            other => json!({ "type": other.type_name() }),
        }
    }

    fn check(&self, value: &Value, path: &str, issues: &mut Vec<FieldIssue>) {
        match (self, value) {
            (FieldKind::String, Value::String(_)) => {}
            (FieldKind::Integer, Value::Number(n)) if n.is_i64() || n.is_u64() => {}
            (FieldKind::Number, Value::Number(_)) => {}
            (FieldKind::Boolean, Value::Bool(_)) => {}
            (FieldKind::Object(schema), Value::Object(map)) => schema.check_object(map, path, issues),
            (FieldKind::Array(item), Value::Array(items)) => {
                for (idx, element) in items.iter().enumerate() {
                    item.check(element, &format!("{}[{}]", path, idx), issues);
                }
            }
            _ => issues.push(FieldIssue::wrong_type(path, self.type_name(), value)),
        }
    }
}

/// A single declared field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Key in the JSON payload
    pub name: String,
    /// Semantic type
    pub kind: FieldKind,
    /// Whether the key must be present and non-null
    pub required: bool,
    /// Guidance shown to the generator
    pub description: String,
}

impl FieldSpec {
    /// A field that must be present
    pub fn required(name: impl Into<String>, kind: FieldKind, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
            description: description.into(),
        }
    }

    /// A field that may be absent or null
    pub fn optional(name: impl Into<String>, kind: FieldKind, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            description: description.into(),
        }
    }
}

/// One problem found while checking a payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// Dotted path of the offending field (empty for the root)
    pub path: String,
    /// What is wrong with it
    pub problem: String,
}

impl FieldIssue {
    fn missing(path: &str) -> Self {
        Self {
            path: path.to_string(),
            problem: "is missing".to_string(),
        }
    }

    fn null(path: &str) -> Self {
        Self {
            path: path.to_string(),
            problem: "is required but was null".to_string(),
        }
    }

    fn wrong_type(path: &str, expected: &str, found: &Value) -> Self {
        Self {
            path: path.to_string(),
            problem: format!("has wrong type: expected {}, found {}", expected, json_type_name(found)),
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "payload {}", self.problem)
        } else {
            write!(f, "field '{}' {}", self.path, self.problem)
        }
    }
}

/// Description of a target record type
///
/// # Examples
///
/// ```
/// use sift_domain::{FieldKind, FieldSpec, SchemaDescriptor};
///
/// let schema = SchemaDescriptor::new("Person", "A named person")
///     .field(FieldSpec::required("name", FieldKind::String, "Full name"))
///     .field(FieldSpec::optional("age", FieldKind::Integer, "Age in years"));
///
/// assert_eq!(schema.fields().len(), 2);
/// assert!(schema.check(&serde_json::json!({"name": "Ada"})).is_ok());
/// assert!(schema.check(&serde_json::json!({"age": 3})).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDescriptor {
    name: String,
    description: String,
    fields: Vec<FieldSpec>,
}

impl SchemaDescriptor {
    /// Start a descriptor with no fields
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field (builder style)
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Declared fields in order
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Reject descriptors that could never be satisfied unambiguously
    pub fn ensure_well_formed(&self) -> Result<(), SchemaError> {
        if self.name.trim().is_empty() {
            return Err(SchemaError::EmptyName);
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.trim().is_empty() {
                return Err(SchemaError::EmptyFieldName {
                    schema: self.name.clone(),
                });
            }
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    schema: self.name.clone(),
                    field: field.name.clone(),
                });
            }
            ensure_kind_well_formed(&field.kind)?;
        }
        Ok(())
    }

    /// JSON-schema rendering of the record
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for field in &self.fields {
            let mut property = field.kind.to_json_schema();
            if let Value::Object(map) = &mut property {
                map.insert("description".to_string(), Value::String(field.description.clone()));
            }
            properties.insert(field.name.clone(), property);
            if field.required {
                required.push(Value::String(field.name.clone()));
            }
        }

        json!({
            "title": self.name,
            "description": self.description,
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Guidance text a generator can follow to produce a matching payload
    pub fn format_instructions(&self) -> String {
        let schema = serde_json::to_string_pretty(&self.to_json_schema())
            .unwrap_or_else(|_| self.to_json_schema().to_string());

        format!(
            "Respond with a single JSON object that is an instance of the JSON schema below. \
Do not return the schema itself, return data that conforms to it.\n\
Fields listed under \"required\" must be present. Optional fields may be omitted or null.\n\
Nested objects and arrays must follow their own \"properties\" and \"items\" definitions.\n\n\
For example, given the schema {{\"properties\": {{\"tags\": {{\"type\": \"array\", \"items\": {{\"type\": \"string\"}}}}}}, \"required\": [\"tags\"]}}, \
the object {{\"tags\": [\"a\", \"b\"]}} is a valid answer, while {{\"properties\": {{\"tags\": [\"a\", \"b\"]}}}} is not.\n\n\
Output schema:\n```json\n{}\n```",
            schema
        )
    }

    /// Check a parsed payload against the declared fields
    ///
    /// Returns every issue found, not just the first.
    pub fn check(&self, value: &Value) -> Result<(), Vec<FieldIssue>> {
        let mut issues = Vec::new();
        match value {
            Value::Object(map) => self.check_object(map, "", &mut issues),
            other => issues.push(FieldIssue {
                path: String::new(),
                problem: format!("is not structured: expected a JSON object, found {}", json_type_name(other)),
            }),
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }

    fn check_object(&self, map: &Map<String, Value>, prefix: &str, issues: &mut Vec<FieldIssue>) {
        for field in &self.fields {
            let path = if prefix.is_empty() {
                field.name.clone()
            } else {
                format!("{}.{}", prefix, field.name)
            };

            match map.get(&field.name) {
                None if field.required => issues.push(FieldIssue::missing(&path)),
                Some(Value::Null) if field.required => issues.push(FieldIssue::null(&path)),
                None | Some(Value::Null) => {}
                Some(value) => field.kind.check(value, &path, issues),
            }
        }
    }
}

fn ensure_kind_well_formed(kind: &FieldKind) -> Result<(), SchemaError> {
    match kind {
        FieldKind::Object(schema) => schema.ensure_well_formed(),
        FieldKind::Array(item) => ensure_kind_well_formed(item),
        _ => Ok(()),
    }
}

/// JSON type name of a value, for diagnostics
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> SchemaDescriptor {
        SchemaDescriptor::new("Address", "Postal address")
            .field(FieldSpec::optional("city", FieldKind::String, "City"))
            .field(FieldSpec::optional("zipcode", FieldKind::String, "Zip code"))
    }

    fn person() -> SchemaDescriptor {
        SchemaDescriptor::new("Person", "A person")
            .field(FieldSpec::required("name", FieldKind::String, "Full name"))
            .field(FieldSpec::optional("age", FieldKind::Integer, "Age"))
            .field(FieldSpec::optional("address", FieldKind::object(address()), "Home address"))
            .field(FieldSpec::optional(
                "nicknames",
                FieldKind::array_of(FieldKind::String),
                "Other names",
            ))
    }

    #[test]
    fn test_fields_keep_declaration_order() {
        let schema = person();
        let names: Vec<_> = schema.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["name", "age", "address", "nicknames"]);
    }

    #[test]
    fn test_check_accepts_valid_payload() {
        let value = json!({
            "name": "Ada",
            "age": 36,
            "address": {"city": "London"},
            "nicknames": ["Countess"]
        });
        assert!(person().check(&value).is_ok());
    }

    #[test]
    fn test_check_reports_missing_required() {
        let issues = person().check(&json!({"age": 3})).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "name");
        assert_eq!(issues[0].to_string(), "field 'name' is missing");
    }

    #[test]
    fn test_check_reports_null_required() {
        let issues = person().check(&json!({"name": null})).unwrap_err();
        assert!(issues[0].problem.contains("null"));
    }

    #[test]
    fn test_check_reports_nested_paths() {
        let value = json!({
            "name": "Ada",
            "address": {"city": 12},
            "nicknames": ["ok", 5]
        });
        let issues = person().check(&value).unwrap_err();
        let paths: Vec<_> = issues.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["address.city", "nicknames[1]"]);
        assert!(issues[0].problem.contains("expected string, found integer"));
    }

    #[test]
    fn test_check_integer_rejects_float() {
        let issues = person().check(&json!({"name": "Ada", "age": 3.5})).unwrap_err();
        assert!(issues[0].problem.contains("expected integer, found number"));
    }

    #[test]
    fn test_check_rejects_non_object() {
        let issues = person().check(&json!("John Smith")).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].to_string().contains("not structured"));
    }

    #[test]
    fn test_optional_fields_may_be_null() {
        let value = json!({"name": "Ada", "age": null, "address": null});
        assert!(person().check(&value).is_ok());
    }

    #[test]
    fn test_json_schema_rendering() {
        let schema = person().to_json_schema();
        assert_eq!(schema["title"], "Person");
        assert_eq!(schema["required"], json!(["name"]));
        assert_eq!(schema["properties"]["age"]["type"], "integer");
        assert_eq!(schema["properties"]["address"]["properties"]["city"]["type"], "string");
        assert_eq!(schema["properties"]["nicknames"]["items"]["type"], "string");
        assert_eq!(schema["properties"]["name"]["description"], "Full name");
    }

    #[test]
    fn test_format_instructions_embed_schema() {
        let text = person().format_instructions();
        assert!(text.contains("JSON schema"));
        assert!(text.contains("\"title\": \"Person\""));
        assert!(text.contains("\"Address\""));
    }

    #[test]
    fn test_well_formed() {
        assert!(person().ensure_well_formed().is_ok());
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let schema = SchemaDescriptor::new("Dup", "")
            .field(FieldSpec::required("a", FieldKind::String, ""))
            .field(FieldSpec::optional("a", FieldKind::Integer, ""));
        assert_eq!(
            schema.ensure_well_formed(),
            Err(SchemaError::DuplicateField {
                schema: "Dup".to_string(),
                field: "a".to_string()
            })
        );
    }

    #[test]
    fn test_nested_malformed_rejected() {
        let inner = SchemaDescriptor::new("Inner", "").field(FieldSpec::optional("", FieldKind::String, ""));
        let outer = SchemaDescriptor::new("Outer", "")
            .field(FieldSpec::optional("items", FieldKind::array_of(FieldKind::object(inner)), ""));
        assert!(matches!(
            outer.ensure_well_formed(),
            Err(SchemaError::EmptyFieldName { .. })
        ));
    }

    #[test]
    fn test_empty_name_rejected() {
        assert_eq!(
            SchemaDescriptor::new(" ", "").ensure_well_formed(),
            Err(SchemaError::EmptyName)
        );
    }
}
