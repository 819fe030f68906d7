//! Turn a candidate payload into a typed record

use crate::error::{CandidateError, ValidationError};
use crate::payload::extract_payload;
use serde_json::Value;
use sift_domain::{Extractable, SchemaDescriptor};

/// Validate `payload` against `schema` and build a `T`
///
/// Three gates, each with its own diagnostic: the payload must parse as
/// JSON, satisfy the descriptor, and deserialize into `T`.
pub fn validate<T: Extractable>(payload: &str, schema: &SchemaDescriptor) -> Result<T, ValidationError> {
    let value: Value =
        serde_json::from_str(payload).map_err(|e| ValidationError::NotStructured(e.to_string()))?;

    schema.check(&value).map_err(ValidationError::Schema)?;

    T::construct(value).map_err(|e| ValidationError::Construct(e.to_string()))
}

/// Locate the payload in a generated message and validate it
pub fn parse_candidate<T: Extractable>(text: &str, schema: &SchemaDescriptor) -> Result<T, CandidateError> {
    let payload = extract_payload(text)?;
    Ok(validate(payload, schema)?)
}
