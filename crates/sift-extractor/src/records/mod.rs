//! Concrete record types
//!
//! Each top-level record implements `Extractable`; the nested sections expose
//! an inherent `schema()` so parents can embed them.

mod job;
mod reflection;
mod resume;

pub use job::{
    ClearanceRequirement, JobDescriptionSummary, JobProfile, JobTitle, MandatoryQualifications, Opportunity,
    OptionalQualifications, ProfessionalExperienceWithTools, Qualification, ToolExperience,
};
pub use reflection::ReflectionRecord;
pub use resume::{
    Address, Candidate, CandidateSkills, Certification, Certifications, Degree, Education, Experience,
    OverallResumeSummary, ProfessionalExperience, ProfessionalSummary, ProfessionalTraining, ResumeContents,
    Skill, SkillCategory, ToolUsed, Training,
};

use sift_domain::{FieldKind, FieldSpec, SchemaDescriptor};

fn text(name: &str, description: &str) -> FieldSpec {
    FieldSpec::optional(name, FieldKind::String, description)
}

fn section(name: &str, schema: SchemaDescriptor, description: &str) -> FieldSpec {
    FieldSpec::optional(name, FieldKind::object(schema), description)
}

fn required_section(name: &str, schema: SchemaDescriptor, description: &str) -> FieldSpec {
    FieldSpec::required(name, FieldKind::object(schema), description)
}

fn list_of(name: &str, item: SchemaDescriptor, description: &str) -> FieldSpec {
    FieldSpec::optional(name, FieldKind::array_of(FieldKind::object(item)), description)
}
