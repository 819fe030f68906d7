//! Job description record

use super::{list_of, section, text};
use serde::{Deserialize, Serialize};
use sift_domain::{Extractable, FieldKind, FieldSpec, SchemaDescriptor};

/// Title of the role
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobTitle {
    /// Job title
    pub jobtitle: Option<String>,
}

impl JobTitle {
    /// Descriptor for this section
    pub fn schema() -> SchemaDescriptor {
        SchemaDescriptor::new("JobTitle", "Title of the job or role").field(text("jobtitle", "Job title"))
    }
}

/// What the opportunity is
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opportunity {
    /// Description
    pub opportunity: Option<String>,
}

impl Opportunity {
    /// Descriptor for this section
    pub fn schema() -> SchemaDescriptor {
        SchemaDescriptor::new("Opportunity", "Description of the job opportunity")
            .field(text("opportunity", "Opportunity description"))
    }
}

/// A single qualification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Qualification {
    /// Qualification text
    pub qualification: Option<String>,
}

impl Qualification {
    /// Descriptor for this section
    pub fn schema() -> SchemaDescriptor {
        SchemaDescriptor::new("Qualification", "Qualification for the job opportunity")
            .field(text("qualification", "Qualification for the job"))
    }
}

/// Qualifications a candidate must have
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MandatoryQualifications {
    /// Qualifications
    pub mandatory_qualifications: Option<Vec<Qualification>>,
}

impl MandatoryQualifications {
    /// Descriptor for this section
    pub fn schema() -> SchemaDescriptor {
        SchemaDescriptor::new(
            "MandatoryQualifications",
            "Mandatory qualifications for the job opportunity. This is the list of all mandatory qualifications.",
        )
        .field(list_of(
            "mandatory_qualifications",
            Qualification::schema(),
            "List of mandatory qualifications",
        ))
    }
}

/// Nice-to-have qualifications
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionalQualifications {
    /// Qualifications
    pub optional_qualifications: Option<Vec<Qualification>>,
}

impl OptionalQualifications {
    /// Descriptor for this section
    pub fn schema() -> SchemaDescriptor {
        SchemaDescriptor::new(
            "OptionalQualifications",
            "Optional (nice to have) qualifications for the job opportunity. This is the list of all optional qualifications.",
        )
        .field(list_of(
            "optional_qualifications",
            Qualification::schema(),
            "List of optional qualifications",
        ))
    }
}

/// Security clearance needed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearanceRequirement {
    /// Clearance level
    pub clearance: Option<String>,
    /// Extra conditions such as a polygraph
    pub additional_attributes: Option<String>,
}

impl ClearanceRequirement {
    /// Descriptor for this section
    pub fn schema() -> SchemaDescriptor {
        SchemaDescriptor::new("ClearanceRequirement", "Security clearance requirement for the job")
            .field(text("clearance", "Name of clearance e.g. Secret, Top Secret, TS, SCI"))
            .field(text("additional_attributes", "Additional attributes like polygraph"))
    }
}

/// Experience required with one tool
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolExperience {
    /// Tool, language, database or framework
    pub tool: Option<String>,
    /// Tool version
    pub version: Option<String>,
    /// Years of experience required
    pub number_of_years: Option<i64>,
    /// Whether the experience is mandatory
    pub mandatory: Option<bool>,
}

impl ToolExperience {
    /// Descriptor for this section
    pub fn schema() -> SchemaDescriptor {
        SchemaDescriptor::new(
            "ToolExperience",
            "Experience required per tool. Tool can be a programming language, database, framework, etc.",
        )
        .field(text(
            "tool",
            "Name of the tool. e.g Java, SQL, Oracle, RedShift, EMR, or Airflow",
        ))
        .field(text("version", "Version of the tool"))
        .field(FieldSpec::optional(
            "number_of_years",
            FieldKind::Integer,
            "Number of years of experience required",
        ))
        .field(FieldSpec::optional("mandatory", FieldKind::Boolean, "True if mandatory else false"))
    }
}

/// Tool experience requirements
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfessionalExperienceWithTools {
    /// One entry per tool
    pub professional_tool_experiences: Option<Vec<ToolExperience>>,
}

impl ProfessionalExperienceWithTools {
    /// Descriptor for this section
    pub fn schema() -> SchemaDescriptor {
        SchemaDescriptor::new(
            "ProfessionalExperienceWithTools",
            "List of tools and required experience. If multiple tools are listed in a single line, \
             create one ToolExperience per tool.",
        )
        .field(list_of(
            "professional_tool_experiences",
            ToolExperience::schema(),
            "List of tools and experiences required",
        ))
    }
}

/// Third-person summary of the posting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDescriptionSummary {
    /// Summary text
    pub summary: Option<String>,
}

impl JobDescriptionSummary {
    /// Descriptor for this section
    pub fn schema() -> SchemaDescriptor {
        SchemaDescriptor::new(
            "JobDescriptionSummary",
            "Summary in third person and under 300 words, detailing the job description. Highlight \
             essential qualifications, including educational background, experience, certifications \
             required, and any necessary clearances.",
        )
        .field(text("summary", "Job description summary"))
    }
}

/// Everything extracted from a job description
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobProfile {
    /// Title
    pub jobtitle: Option<JobTitle>,
    /// Opportunity description
    pub opportunity: Option<Opportunity>,
    /// Must-have qualifications
    pub mandatory_qualifications: Option<MandatoryQualifications>,
    /// Nice-to-have qualifications
    pub optional_qualifications: Option<OptionalQualifications>,
    /// Tool experience requirements
    pub professional_experience_with_tools: Option<ProfessionalExperienceWithTools>,
    /// Clearance needed
    pub clearance_requirement: Option<ClearanceRequirement>,
    /// Summary
    pub job_description_summary: Option<JobDescriptionSummary>,
}

impl Extractable for JobProfile {
    fn schema() -> SchemaDescriptor {
        SchemaDescriptor::new(
            "JobProfile",
            "Complete job profile containing the job title, opportunity, mandatory and optional \
             qualifications, tool experience, clearance requirement and a summary",
        )
        .field(section("jobtitle", JobTitle::schema(), "Job title"))
        .field(section("opportunity", Opportunity::schema(), "Job opportunity"))
        .field(section(
            "mandatory_qualifications",
            MandatoryQualifications::schema(),
            "Mandatory qualifications",
        ))
        .field(section(
            "optional_qualifications",
            OptionalQualifications::schema(),
            "Optional qualifications",
        ))
        .field(section(
            "professional_experience_with_tools",
            ProfessionalExperienceWithTools::schema(),
            "Tool experience requirements",
        ))
        .field(section(
            "clearance_requirement",
            ClearanceRequirement::schema(),
            "Clearance requirement",
        ))
        .field(section(
            "job_description_summary",
            JobDescriptionSummary::schema(),
            "Job description summary",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::validate;

    #[test]
    fn test_job_schema_is_well_formed() {
        assert!(JobProfile::schema().ensure_well_formed().is_ok());
    }

    #[test]
    fn test_empty_profile_is_valid() {
        let profile: JobProfile = validate("{}", &JobProfile::schema()).unwrap();
        assert_eq!(profile, JobProfile::default());
    }

    #[test]
    fn test_tool_experience_years_must_be_integer() {
        let payload = r#"{"professional_experience_with_tools": {"professional_tool_experiences": [
            {"tool": "SQL", "number_of_years": 2.5}
        ]}}"#;
        let err = validate::<JobProfile>(payload, &JobProfile::schema()).unwrap_err();
        assert_eq!(
            err.issues()[0].path,
            "professional_experience_with_tools.professional_tool_experiences[0].number_of_years"
        );
    }

    #[test]
    fn test_full_profile() {
        let payload = r#"{
            "jobtitle": {"jobtitle": "Data Engineer"},
            "mandatory_qualifications": {"mandatory_qualifications": [{"qualification": "BS in CS"}]},
            "professional_experience_with_tools": {"professional_tool_experiences": [
                {"tool": "Airflow", "number_of_years": 3, "mandatory": true}
            ]},
            "clearance_requirement": {"clearance": "TS/SCI", "additional_attributes": "Polygraph"}
        }"#;
        let profile: JobProfile = validate(payload, &JobProfile::schema()).unwrap();
        let tools = profile
            .professional_experience_with_tools
            .and_then(|t| t.professional_tool_experiences)
            .unwrap();
        assert_eq!(tools[0].number_of_years, Some(3));
        assert_eq!(profile.jobtitle.unwrap().jobtitle.as_deref(), Some("Data Engineer"));
    }
}
