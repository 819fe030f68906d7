//! Sift Domain Layer
//!
//! This crate contains the vocabulary shared by every other Sift crate: the
//! conversational messages exchanged with a generator, the descriptors that
//! define what a record looks like, and the trait interfaces that the
//! infrastructure and application layers implement.
//!
//! ## Key Concepts
//!
//! - **Message Log**: ordered, append-only context passed to a generator
//! - **Schema Descriptor**: field set of a target record plus its format instructions
//! - **Generator Client**: a stateless text backend that continues a message log
//! - **Extractable**: a record type that can be built from a validated payload
//!
//! ## Architecture
//!
//! - Pure data and trait definitions only
//! - No network or filesystem access
//! - Backends live in `sift-llm`, the control loop lives in `sift-extractor`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod message;
pub mod schema;
pub mod traits;

// Re-exports for convenience
pub use message::{Message, MessageLog, Role};
pub use schema::{json_type_name, FieldIssue, FieldKind, FieldSpec, SchemaDescriptor, SchemaError};
pub use traits::{Extractable, ExternalServiceError, GeneratorClient};
