//! Resume record

use super::{list_of, required_section, section, text};
use serde::{Deserialize, Serialize};
use sift_domain::{Extractable, FieldKind, FieldSpec, SchemaDescriptor};

/// Postal address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Street line
    pub address_line1: Option<String>,
    /// Unit, suite, etc.
    pub address_line2: Option<String>,
    /// City name
    pub city: Option<String>,
    /// State abbreviation
    pub state: Option<String>,
    /// Zip code
    pub zipcode: Option<String>,
}

impl Address {
    /// Descriptor for this section
    pub fn schema() -> SchemaDescriptor {
        SchemaDescriptor::new("Address", "Address of a person")
            .field(text("address_line1", "Address line 1"))
            .field(text("address_line2", "Address line 2"))
            .field(text("city", "Name of the city"))
            .field(text("state", "Abbreviation for state"))
            .field(text("zipcode", "Zip code"))
    }
}

/// Name and contact information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Full name
    pub fullname: Option<String>,
    /// Email address
    pub email: Option<String>,
    /// Phone number
    pub phone: Option<String>,
    /// Postal address
    pub address: Option<Address>,
}

impl Candidate {
    /// Descriptor for this section
    pub fn schema() -> SchemaDescriptor {
        SchemaDescriptor::new("Candidate", "Candidate name and contact information")
            .field(text("fullname", "Name of the person"))
            .field(text("email", "Email address"))
            .field(text("phone", "Phone number"))
            .field(section("address", Address::schema(), "Candidate's address"))
    }
}

/// Summary as written by the candidate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfessionalSummary {
    /// Summary text
    pub summary: Option<String>,
}

impl ProfessionalSummary {
    /// Descriptor for this section
    pub fn schema() -> SchemaDescriptor {
        SchemaDescriptor::new(
            "ProfessionalSummary",
            "Professional summary as presented in the resume by the candidate. Appears as Summary, \
             Executive Summary, Abstract, or Professional Summary in the resume",
        )
        .field(text("summary", "Executive or professional summary"))
    }
}

/// One skill
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    /// Skill name
    pub skill: Option<String>,
}

impl Skill {
    /// Descriptor for this section
    pub fn schema() -> SchemaDescriptor {
        SchemaDescriptor::new("Skill", "Candidate skill").field(text("skill", "Candidate's skill"))
    }
}

/// Skills grouped under a category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCategory {
    /// Category name
    pub category: Option<String>,
    /// Skills in this category
    pub skills: Option<Vec<Skill>>,
}

impl SkillCategory {
    /// Descriptor for this section
    pub fn schema() -> SchemaDescriptor {
        SchemaDescriptor::new("SkillCategory", "List of candidate skills within a category")
            .field(text("category", "Skills category"))
            .field(list_of("skills", Skill::schema(), "Skills in this category"))
    }
}

/// All skills, by category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSkills {
    /// Categories
    pub candidate_skills: Option<Vec<SkillCategory>>,
}

impl CandidateSkills {
    /// Descriptor for this section
    pub fn schema() -> SchemaDescriptor {
        SchemaDescriptor::new("CandidateSkills", "List of candidate skills organized by category").field(list_of(
            "candidate_skills",
            SkillCategory::schema(),
            "Skill categories",
        ))
    }
}

/// A degree pursued or completed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Degree {
    /// School, college or university
    pub school: Option<String>,
    /// Degree name
    pub degree: Option<String>,
    /// Major or specialization
    pub specialization: Option<String>,
    /// Graduation year
    pub year_graduated: Option<String>,
    /// Graduation month
    pub month_graduated: Option<String>,
}

impl Degree {
    /// Descriptor for this section
    pub fn schema() -> SchemaDescriptor {
        SchemaDescriptor::new("Degree", "Degree pursued or completed")
            .field(text("school", "Name of school, college or university"))
            .field(text("degree", "Name of the degree"))
            .field(text("specialization", "Specialization"))
            .field(text("year_graduated", "Year graduated"))
            .field(text("month_graduated", "Month graduated"))
    }
}

/// Education history
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
    /// Degrees
    pub education: Option<Vec<Degree>>,
}

impl Education {
    /// Descriptor for this section
    pub fn schema() -> SchemaDescriptor {
        SchemaDescriptor::new("Education", "Degrees pursued or completed").field(list_of(
            "education",
            Degree::schema(),
            "List of degrees obtained",
        ))
    }
}

/// A tool used on the job
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolUsed {
    /// Tool name
    pub tool_name: Option<String>,
    /// Tool version
    pub tool_version: Option<String>,
}

impl ToolUsed {
    /// Descriptor for this section
    pub fn schema() -> SchemaDescriptor {
        SchemaDescriptor::new("ToolUsed", "Tool used at the work place")
            .field(text("tool_name", "Name of the tool used"))
            .field(text("tool_version", "Version number of the tool used"))
    }
}

/// One position held
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    /// Employer
    pub company: Option<String>,
    /// City, state and country
    pub location: Option<String>,
    /// Role or title
    pub role: Option<String>,
    /// Year started
    pub start_year: Option<String>,
    /// Month started
    pub start_month: Option<String>,
    /// Year ended
    pub end_year: Option<String>,
    /// Month ended
    pub end_month: Option<String>,
    /// Whether this is the current position
    pub current_job: Option<bool>,
    /// What the work involved
    pub experience_detail: Option<String>,
    /// Tools used in this position
    pub tools_used: Option<Vec<ToolUsed>>,
}

impl Experience {
    /// Descriptor for this section
    pub fn schema() -> SchemaDescriptor {
        SchemaDescriptor::new("Experience", "Professional experience in a company worked")
            .field(text("company", "Company name"))
            .field(text("location", "Company location city, state and country"))
            .field(text("role", "Role or designation"))
            .field(text("start_year", "Year started"))
            .field(text("start_month", "Month started"))
            .field(text("end_year", "Year ended"))
            .field(text("end_month", "Month ended"))
            .field(FieldSpec::optional(
                "current_job",
                FieldKind::Boolean,
                "True if experience is current else false",
            ))
            .field(text("experience_detail", "Work experience in this company"))
            .field(list_of("tools_used", ToolUsed::schema(), "Tools used at this company"))
    }
}

/// Work history
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfessionalExperience {
    /// Positions
    pub experiences: Option<Vec<Experience>>,
}

impl ProfessionalExperience {
    /// Descriptor for this section
    pub fn schema() -> SchemaDescriptor {
        SchemaDescriptor::new(
            "ProfessionalExperience",
            "List of all companies where the candidate worked along with experience in each",
        )
        .field(list_of("experiences", Experience::schema(), "Listing of all experiences"))
    }
}

/// A certification pursued or obtained
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certification {
    /// Certification name
    pub certification_name: Option<String>,
    /// Year certified
    pub year_certified: Option<String>,
    /// Month certified
    pub month_certified: Option<String>,
}

impl Certification {
    /// Descriptor for this section
    pub fn schema() -> SchemaDescriptor {
        SchemaDescriptor::new("Certification", "Professional certification pursued or obtained")
            .field(text("certification_name", "Certification name"))
            .field(text("year_certified", "Year certified"))
            .field(text("month_certified", "Month certified"))
    }
}

/// All certifications
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certifications {
    /// Certifications
    pub certifications: Option<Vec<Certification>>,
}

impl Certifications {
    /// Descriptor for this section
    pub fn schema() -> SchemaDescriptor {
        SchemaDescriptor::new(
            "Certifications",
            "List of all professional certifications pursued or obtained",
        )
        .field(list_of("certifications", Certification::schema(), "List of all certifications"))
    }
}

/// A training program completed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Training {
    /// School, institution or online program
    pub company: Option<String>,
    /// Program name
    pub training: Option<String>,
    /// Year completed
    pub year_completed: Option<String>,
    /// Month completed
    pub month_completed: Option<String>,
}

impl Training {
    /// Descriptor for this section
    pub fn schema() -> SchemaDescriptor {
        SchemaDescriptor::new("Training", "Professional training completed")
            .field(text("company", "Name of school, institution, or online academic program"))
            .field(text("training", "Name of the training program"))
            .field(text("year_completed", "Year completed"))
            .field(text("month_completed", "Month completed"))
    }
}

/// All training
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfessionalTraining {
    /// Programs
    pub trainings: Option<Vec<Training>>,
}

impl ProfessionalTraining {
    /// Descriptor for this section
    pub fn schema() -> SchemaDescriptor {
        SchemaDescriptor::new("ProfessionalTraining", "List of all professional training completed").field(
            list_of("trainings", Training::schema(), "Training programs completed"),
        )
    }
}

/// Third-person summary of the whole resume
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverallResumeSummary {
    /// Summary text
    pub summary: Option<String>,
}

impl OverallResumeSummary {
    /// Descriptor for this section
    pub fn schema() -> SchemaDescriptor {
        SchemaDescriptor::new(
            "OverallResumeSummary",
            "Generated summary in the style of a third person describing the candidate's name, \
             education, professional experience and accomplishments based on the resume. \
             Limit the summary to approximately 300 words.",
        )
        .field(text("summary", "Summary of the resume"))
    }
}

/// Everything extracted from a resume
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeContents {
    /// Name and contact details
    pub candidate: Candidate,
    /// Candidate's own summary
    pub candidate_summary: ProfessionalSummary,
    /// Degrees
    pub education: Education,
    /// Skills by category
    pub skills: CandidateSkills,
    /// Work history
    pub experience: ProfessionalExperience,
    /// Training programs
    pub training: ProfessionalTraining,
    /// Certifications
    pub certifications: Certifications,
    /// Third-person overview
    pub overall_summary: OverallResumeSummary,
}

impl Extractable for ResumeContents {
    fn schema() -> SchemaDescriptor {
        SchemaDescriptor::new(
            "ResumeContents",
            "All content in the resume: candidate name and contact information, professional \
             summary, education, skills, professional experience, professional training, \
             certifications and an overall resume summary",
        )
        .field(required_section("candidate", Candidate::schema(), "Candidate name and contact information"))
        .field(required_section(
            "candidate_summary",
            ProfessionalSummary::schema(),
            "Professional summary",
        ))
        .field(required_section("education", Education::schema(), "Education"))
        .field(required_section("skills", CandidateSkills::schema(), "Skills by category"))
        .field(required_section(
            "experience",
            ProfessionalExperience::schema(),
            "Professional experience",
        ))
        .field(required_section("training", ProfessionalTraining::schema(), "Professional training"))
        .field(required_section("certifications", Certifications::schema(), "Certifications"))
        .field(required_section(
            "overall_summary",
            OverallResumeSummary::schema(),
            "Overall resume summary",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::validate;
    use serde_json::json;

    fn minimal() -> serde_json::Value {
        json!({
            "candidate": {"fullname": "Jane Doe", "address": {"city": "Austin", "state": "TX"}},
            "candidate_summary": {},
            "education": {"education": [{"school": "UT Austin", "degree": "BS"}]},
            "skills": {"candidate_skills": [{"category": "Languages", "skills": [{"skill": "Rust"}]}]},
            "experience": {"experiences": [{"company": "Acme", "current_job": true}]},
            "training": {},
            "certifications": {"certifications": null},
            "overall_summary": {"summary": "Jane is an engineer."}
        })
    }

    #[test]
    fn test_resume_schema_is_well_formed() {
        assert!(ResumeContents::schema().ensure_well_formed().is_ok());
    }

    #[test]
    fn test_minimal_resume_validates() {
        let resume: ResumeContents = validate(&minimal().to_string(), &ResumeContents::schema()).unwrap();
        assert_eq!(resume.candidate.fullname.as_deref(), Some("Jane Doe"));
        assert_eq!(
            resume.candidate.address.and_then(|a| a.city).as_deref(),
            Some("Austin")
        );
        assert_eq!(resume.experience.experiences.unwrap()[0].current_job, Some(true));
    }

    #[test]
    fn test_missing_section_is_rejected() {
        let mut payload = minimal();
        payload.as_object_mut().unwrap().remove("education");
        let err = validate::<ResumeContents>(&payload.to_string(), &ResumeContents::schema()).unwrap_err();
        assert!(err.to_string().contains("'education' is missing"));
    }

    #[test]
    fn test_nested_type_error_has_path() {
        let mut payload = minimal();
        payload["experience"]["experiences"][0]["current_job"] = json!("yes");
        let err = validate::<ResumeContents>(&payload.to_string(), &ResumeContents::schema()).unwrap_err();
        assert_eq!(err.issues()[0].path, "experience.experiences[0].current_job");
    }

    #[test]
    fn test_format_instructions_mention_nested_fields() {
        let instructions = ResumeContents::format_instructions();
        assert!(instructions.contains("tools_used"));
        assert!(instructions.contains("zipcode"));
    }
}
