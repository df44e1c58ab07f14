use serde::{Deserialize, Serialize};

/// One role pulled out of a resume's work history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkHistoryItem {
    pub title: String,
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Structured view of a resume, produced fresh for every screening request.
/// Collections are always present so consumers never branch on absence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedResume {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub work_history: Vec<WorkHistoryItem>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub raw_text: String,
}

/// Read-only view of a job posting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobRequirements {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_skills: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_skills: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
}

/// The minimal candidate shape the skill matcher reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub skills: Vec<String>,
    pub experience: String,
    pub education: String,
    pub summary: String,
}

impl From<&ParsedResume> for CandidateProfile {
    fn from(resume: &ParsedResume) -> Self {
        Self {
            skills: resume.skills.clone(),
            experience: resume.experience.clone(),
            education: resume.education.clone(),
            summary: resume.summary.clone(),
        }
    }
}

/// Stored applicant data, used when no resume file can be read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicantProfile {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub years_of_experience: Option<u32>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

impl ApplicantProfile {
    pub fn into_parsed_resume(self) -> ParsedResume {
        ParsedResume {
            full_name: self.full_name,
            email: self.email,
            phone: None,
            skills: self
                .skills
                .iter()
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
            experience: self
                .years_of_experience
                .map(|years| format!("{years} years of experience"))
                .unwrap_or_default(),
            education: self.education.unwrap_or_default(),
            summary: self.bio.unwrap_or_default(),
            work_history: Vec::new(),
            certifications: Vec::new(),
            languages: Vec::new(),
            raw_text: String::new(),
        }
    }
}

/// Which strategy produced a skill match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Keyword overlap blended with the semantic assessment.
    AiAssisted,
    /// Keyword overlap only; the semantic matcher was unavailable.
    Basic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMatchResult {
    pub matched_skills: Vec<String>,
    /// Deduplicated, at most 10.
    pub missing_skills: Vec<String>,
    /// 0 – 100
    pub score: u32,
    pub justification: String,
    pub keyword_matches: usize,
    pub total_keywords: usize,
    pub mode: MatchMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub candidate_id: String,
    pub application_id: String,
    pub overall_score: u32,
    pub skill_match_score: u32,
    pub experience_score: u32,
    pub education_score: u32,
    pub match_percentage: u32,
    /// 1-based, assigned after sorting.
    pub rank: usize,
    pub skill_match: SkillMatchResult,
    pub justification: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingStats {
    pub total_candidates: usize,
    pub average_score: u32,
    pub top_score: u32,
    pub lowest_score: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_resume_collections_default_when_absent() {
        let resume: ParsedResume =
            serde_json::from_str(r#"{"experience": "3 years", "summary": "hi"}"#).unwrap();
        assert!(resume.skills.is_empty());
        assert!(resume.work_history.is_empty());
        assert!(resume.certifications.is_empty());
        assert!(resume.languages.is_empty());
    }

    #[test]
    fn test_profile_fallback_renders_years() {
        let profile = ApplicantProfile {
            full_name: Some("Abebe Kebede".to_string()),
            skills: vec!["React".to_string()],
            years_of_experience: Some(4),
            bio: Some("Frontend developer".to_string()),
            ..Default::default()
        };
        let resume = profile.into_parsed_resume();
        assert_eq!(resume.experience, "4 years of experience");
        assert_eq!(resume.summary, "Frontend developer");
        assert_eq!(resume.education, "");
        assert!(resume.raw_text.is_empty());
    }

    #[test]
    fn test_profile_fallback_lowercases_skills() {
        let profile = ApplicantProfile {
            skills: vec!["React".to_string(), " Node.JS ".to_string(), "  ".to_string()],
            ..Default::default()
        };
        let resume = profile.into_parsed_resume();
        assert_eq!(resume.skills, vec!["react", "node.js"]);
    }

    #[test]
    fn test_profile_fallback_without_years_is_empty_experience() {
        let resume = ApplicantProfile::default().into_parsed_resume();
        assert_eq!(resume.experience, "");
    }

    #[test]
    fn test_match_mode_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&MatchMode::AiAssisted).unwrap(),
            r#""ai_assisted""#
        );
        assert_eq!(serde_json::to_string(&MatchMode::Basic).unwrap(), r#""basic""#);
    }
}
