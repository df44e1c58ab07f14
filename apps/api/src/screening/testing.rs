//! Deterministic semantic matchers and fixtures shared by screening tests.

use async_trait::async_trait;

use crate::screening::error::CollaboratorError;
use crate::screening::models::{
    CandidateProfile, JobRequirements, MatchMode, ParsedResume, SkillMatchResult,
    WorkHistoryItem,
};
use crate::screening::skill_matcher::{AiAnalysis, SemanticMatcher};

/// Always returns the same assessment.
pub struct FixedSemanticMatcher {
    analysis: AiAnalysis,
}

impl FixedSemanticMatcher {
    pub fn new(score: u32, justification: &str) -> Self {
        Self {
            analysis: AiAnalysis {
                score,
                justification: justification.to_string(),
            },
        }
    }
}

#[async_trait]
impl SemanticMatcher for FixedSemanticMatcher {
    async fn assess(
        &self,
        _profile: &CandidateProfile,
        _job: &JobRequirements,
    ) -> Result<AiAnalysis, CollaboratorError> {
        Ok(self.analysis.clone())
    }
}

/// Behaves like a matcher with no API key configured.
pub struct UnavailableSemanticMatcher;

#[async_trait]
impl SemanticMatcher for UnavailableSemanticMatcher {
    async fn assess(
        &self,
        _profile: &CandidateProfile,
        _job: &JobRequirements,
    ) -> Result<AiAnalysis, CollaboratorError> {
        Err(CollaboratorError::NotConfigured)
    }
}

pub fn full_stack_job() -> JobRequirements {
    JobRequirements {
        title: "Senior Full Stack Developer".to_string(),
        description: "Develop web applications using React and Node.js.".to_string(),
        required_skills: Some(vec!["React".to_string(), "Node.js".to_string()]),
        education: Some("Bachelor's Degree in Computer Science".to_string()),
        experience: Some("5+ years of full-stack development experience".to_string()),
        ..Default::default()
    }
}

pub fn resume_with(experience: &str, education: &str, history: usize) -> ParsedResume {
    ParsedResume {
        skills: vec!["react".to_string(), "node.js".to_string()],
        experience: experience.to_string(),
        education: education.to_string(),
        summary: "Developer".to_string(),
        work_history: (0..history)
            .map(|i| WorkHistoryItem {
                title: format!("Role {i}"),
                company: format!("Company {i}"),
                duration: None,
                description: None,
            })
            .collect(),
        ..Default::default()
    }
}

pub fn skill_match(score: u32) -> SkillMatchResult {
    SkillMatchResult {
        matched_skills: vec!["react".to_string()],
        missing_skills: Vec::new(),
        score,
        justification: "fixture".to_string(),
        keyword_matches: 1,
        total_keywords: 1,
        mode: MatchMode::AiAssisted,
        fallback_reason: None,
    }
}
