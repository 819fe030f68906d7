//! Sift Extractor
//!
//! Turns unstructured text into typed records with a generative backend.
//!
//! # Overview
//!
//! A run is a small state machine. The generator is asked for a record, the
//! reply is checked against the target's descriptor, and a valid record is
//! shown to a reviewer. Anything that goes wrong along the way is written
//! back into the conversation as a corrective message and the generator gets
//! another attempt, up to a fixed cap.
//!
//! # Architecture
//!
//! ```text
//! Text → INIT → GENERATE → VALIDATE → REFLECT → Record
//!                  ↑           │          │
//!                  └── retry ──┴──────────┘
//! ```
//!
//! # Key Features
//!
//! - **Self-correcting**: parse and schema errors are fed back verbatim
//! - **Bounded**: generation attempts never exceed the configured cap
//! - **Reviewed**: a critique pass decides whether a valid record is good enough
//! - **Best effort**: the last validated record survives later failures
//! - **Cancellable**: runs stop promptly when a [`CancellationToken`] fires
//!
//! # Example Usage
//!
//! ```no_run
//! use sift_extractor::records::ResumeContents;
//! use sift_extractor::{ExtractorConfig, Workflow};
//! use sift_llm::OllamaClient;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let generator = Arc::new(OllamaClient::default_endpoint("llama3")?);
//! let workflow = Workflow::<ResumeContents>::new(generator, ExtractorConfig::default())?;
//!
//! let report = workflow.run("Jane Doe, jane@example.com ...").await?;
//! println!("{} after {} attempts", report.outcome.label(), report.attempts);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod cancel;
mod config;
mod error;
mod payload;
mod prompt;
mod reflector;
mod state;
mod types;
mod validator;
mod workflow;

pub mod records;


pub use cancel::CancellationToken;
pub use config::ExtractorConfig;
pub use error::{CandidateError, ExtractionFailed, ExtractorError, ReflectionError, ValidationError};
pub use payload::extract_payload;
pub use prompt::{PromptBuilder, SYSTEM_INSTRUCTIONS};
pub use reflector::{ReflectionVerdict, Reflector, Verdict};
pub use state::{after_reflect, after_validate, next_step, ReflectionStatus, RunState, Step, ValidationStatus};
pub use types::{ExtractionOutcome, RunId, RunReport, Termination};
pub use validator::{parse_candidate, validate};
pub use workflow::{extract, Workflow};
