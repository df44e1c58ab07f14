//! Screening pipeline: resolve a resume for each candidate, match it against the job,
//! and rank the batch.
//!
//! Resume resolution tries the uploaded file first and the applicant's profile second.
//! Per-candidate work in a batch runs concurrently up to a configured bound; ranking
//! starts only after every candidate has been matched.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{info, warn};

use crate::screening::error::ScreeningError;
use crate::screening::models::{
    ApplicantProfile, CandidateProfile, CandidateScore, JobRequirements, ParsedResume,
    RankingStats, SkillMatchResult,
};
use crate::screening::ranker::{rank_candidates, ranking_stats, CandidateData};
use crate::screening::resume_parser::parse_resume;
use crate::screening::skill_matcher::{match_skills, SemanticMatcher};

/// A resume file as received: raw bytes plus the declared content type.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub bytes: Bytes,
    pub mime_type: Option<String>,
}

/// Everything known about one candidate before screening.
#[derive(Debug, Clone)]
pub struct CandidateSubmission {
    pub candidate_id: String,
    pub application_id: String,
    pub resume: Option<ResumeUpload>,
    pub profile: Option<ApplicantProfile>,
}

/// Where the screened resume data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumeSource {
    UploadedResume,
    ApplicantProfile,
}

#[derive(Debug, Clone)]
pub struct ResolvedResume {
    pub resume: ParsedResume,
    pub source: ResumeSource,
}

/// The parsed fields a reviewer sees alongside a single screening.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeDigest {
    pub skills: Vec<String>,
    pub experience: String,
    pub education: String,
}

impl From<&ParsedResume> for ResumeDigest {
    fn from(resume: &ParsedResume) -> Self {
        ResumeDigest {
            skills: resume.skills.clone(),
            experience: resume.experience.clone(),
            education: resume.education.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationScreening {
    pub application_id: String,
    pub candidate_id: String,
    pub match_percentage: u32,
    pub recommendation: &'static str,
    pub skill_match: SkillMatchResult,
    pub parsed_resume: ResumeDigest,
    pub resume_source: ResumeSource,
    pub screened_at: DateTime<Utc>,
}

/// A candidate left out of a batch ranking, and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExcludedCandidate {
    pub candidate_id: String,
    pub application_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchScreening {
    pub rankings: Vec<CandidateScore>,
    pub statistics: RankingStats,
    pub total_candidates: usize,
    pub excluded: Vec<ExcludedCandidate>,
}

/// Recommendation label for a skill-match score.
pub fn recommendation(score: u32) -> &'static str {
    match score {
        90.. => "Highly Recommended",
        75..=89 => "Strong Match",
        60..=74 => "Good Match",
        40..=59 => "Moderate Match",
        _ => "Limited Match",
    }
}

/// Picks the resume data to screen: the uploaded file if it parses, else the profile.
pub async fn resolve_resume(
    submission: &CandidateSubmission,
) -> Result<ResolvedResume, ScreeningError> {
    if let Some(upload) = &submission.resume {
        match parse_upload(upload).await {
            Ok(resume) => {
                return Ok(ResolvedResume {
                    resume,
                    source: ResumeSource::UploadedResume,
                })
            }
            Err(e) => warn!(
                "Resume for candidate {} unusable, trying profile: {e}",
                submission.candidate_id
            ),
        }
    }

    match &submission.profile {
        Some(profile) => Ok(ResolvedResume {
            resume: profile.clone().into_parsed_resume(),
            source: ResumeSource::ApplicantProfile,
        }),
        None => Err(ScreeningError::InsufficientInput {
            candidate_id: submission.candidate_id.clone(),
        }),
    }
}

async fn parse_upload(upload: &ResumeUpload) -> Result<ParsedResume, ScreeningError> {
    let resume = parse_resume(upload.bytes.clone(), upload.mime_type.as_deref()).await?;
    if resume.raw_text.trim().is_empty() {
        return Err(ScreeningError::ParseFailure("resume is empty".to_string()));
    }
    Ok(resume)
}

/// Screens one application against `job`.
pub async fn screen_application(
    job: &JobRequirements,
    submission: &CandidateSubmission,
    matcher: &dyn SemanticMatcher,
) -> Result<ApplicationScreening, ScreeningError> {
    let resolved = resolve_resume(submission).await?;
    let skill_match = match_skills(&CandidateProfile::from(&resolved.resume), job, matcher).await;

    info!(
        "Screened application {} for '{}': {} ({:?})",
        submission.application_id, job.title, skill_match.score, skill_match.mode
    );

    Ok(ApplicationScreening {
        application_id: submission.application_id.clone(),
        candidate_id: submission.candidate_id.clone(),
        match_percentage: skill_match.score,
        recommendation: recommendation(skill_match.score),
        parsed_resume: ResumeDigest::from(&resolved.resume),
        resume_source: resolved.source,
        skill_match,
        screened_at: Utc::now(),
    })
}

async fn screen_candidate(
    job: &JobRequirements,
    submission: CandidateSubmission,
    matcher: &dyn SemanticMatcher,
) -> Result<CandidateData, ExcludedCandidate> {
    let resolved = match resolve_resume(&submission).await {
        Ok(resolved) => resolved,
        Err(e) => {
            warn!("Excluding candidate {}: {e}", submission.candidate_id);
            return Err(ExcludedCandidate {
                candidate_id: submission.candidate_id,
                application_id: submission.application_id,
                reason: e.to_string(),
            });
        }
    };

    let skill_match = match_skills(&CandidateProfile::from(&resolved.resume), job, matcher).await;

    Ok(CandidateData {
        candidate_id: submission.candidate_id,
        application_id: submission.application_id,
        resume: resolved.resume,
        skill_match,
    })
}

/// Screens and ranks every submission for one job.
///
/// At most `concurrency` candidates are parsed and matched at once. A candidate with
/// no usable resume or profile is reported in `excluded` and does not fail the batch.
pub async fn screen_batch(
    job: &JobRequirements,
    submissions: Vec<CandidateSubmission>,
    matcher: &dyn SemanticMatcher,
    concurrency: usize,
) -> BatchScreening {
    info!(
        "Screening {} candidates for '{}' (concurrency {concurrency})",
        submissions.len(),
        job.title
    );

    let outcomes: Vec<Result<CandidateData, ExcludedCandidate>> = stream::iter(submissions)
        .map(|submission| screen_candidate(job, submission, matcher))
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut screened = Vec::with_capacity(outcomes.len());
    let mut excluded = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(data) => screened.push(data),
            Err(skipped) => excluded.push(skipped),
        }
    }

    let rankings = rank_candidates(screened, job);
    let statistics = ranking_stats(&rankings);

    info!(
        "Ranked {} candidates for '{}' (top {}, avg {}, {} excluded)",
        rankings.len(),
        job.title,
        statistics.top_score,
        statistics.average_score,
        excluded.len()
    );

    BatchScreening {
        total_candidates: rankings.len(),
        rankings,
        statistics,
        excluded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::models::MatchMode;
    use crate::screening::testing::{
        full_stack_job, FixedSemanticMatcher, UnavailableSemanticMatcher,
    };

    const TEXT_RESUME: &str = "Jane Doe\n\
        jane@example.com\n\
        Summary: Full stack developer with 7 years of experience in React and Node.js.\n\
        \n\
        Skills: React, Node.js, TypeScript, PostgreSQL\n\
        Education: Bachelor of Science in Computer Science\n";

    fn text_upload(text: &str) -> Option<ResumeUpload> {
        Some(ResumeUpload {
            bytes: Bytes::from(text.to_string()),
            mime_type: Some("text/plain".to_string()),
        })
    }

    fn profile() -> ApplicantProfile {
        ApplicantProfile {
            full_name: Some("Sam Lee".to_string()),
            skills: vec!["React".to_string(), "Node.js".to_string()],
            years_of_experience: Some(6),
            education: Some("Bachelor's Degree".to_string()),
            bio: Some("Web developer".to_string()),
            ..Default::default()
        }
    }

    fn submission(
        id: &str,
        resume: Option<ResumeUpload>,
        profile: Option<ApplicantProfile>,
    ) -> CandidateSubmission {
        CandidateSubmission {
            candidate_id: id.to_string(),
            application_id: format!("app_{id}"),
            resume,
            profile,
        }
    }

    #[test]
    fn test_recommendation_boundaries() {
        assert_eq!(recommendation(100), "Highly Recommended");
        assert_eq!(recommendation(90), "Highly Recommended");
        assert_eq!(recommendation(89), "Strong Match");
        assert_eq!(recommendation(75), "Strong Match");
        assert_eq!(recommendation(74), "Good Match");
        assert_eq!(recommendation(60), "Good Match");
        assert_eq!(recommendation(59), "Moderate Match");
        assert_eq!(recommendation(40), "Moderate Match");
        assert_eq!(recommendation(39), "Limited Match");
        assert_eq!(recommendation(0), "Limited Match");
    }

    #[tokio::test]
    async fn test_resolve_prefers_uploaded_resume() {
        let resolved = resolve_resume(&submission("c1", text_upload(TEXT_RESUME), Some(profile())))
            .await
            .unwrap();
        assert_eq!(resolved.source, ResumeSource::UploadedResume);
        assert_eq!(resolved.resume.full_name.as_deref(), Some("Jane Doe"));
        assert!(resolved.resume.skills.contains(&"react".to_string()));
    }

    #[tokio::test]
    async fn test_resolve_falls_back_to_profile_on_parse_failure() {
        let broken_pdf = Some(ResumeUpload {
            bytes: Bytes::from_static(b"definitely not a pdf"),
            mime_type: Some("application/pdf".to_string()),
        });
        let resolved = resolve_resume(&submission("c1", broken_pdf, Some(profile())))
            .await
            .unwrap();
        assert_eq!(resolved.source, ResumeSource::ApplicantProfile);
        assert_eq!(resolved.resume.experience, "6 years of experience");
        assert_eq!(resolved.resume.summary, "Web developer");
    }

    #[tokio::test]
    async fn test_resolve_blank_upload_falls_back_to_profile() {
        let resolved = resolve_resume(&submission("c1", text_upload("  \n "), Some(profile())))
            .await
            .unwrap();
        assert_eq!(resolved.source, ResumeSource::ApplicantProfile);
    }

    #[tokio::test]
    async fn test_resolve_without_any_input_is_insufficient() {
        let err = resolve_resume(&submission("c9", None, None)).await.unwrap_err();
        assert!(matches!(
            err,
            ScreeningError::InsufficientInput { ref candidate_id } if candidate_id == "c9"
        ));

        let broken_pdf = Some(ResumeUpload {
            bytes: Bytes::from_static(b"%PDF-garbage"),
            mime_type: Some("application/pdf".to_string()),
        });
        let err = resolve_resume(&submission("c9", broken_pdf, None))
            .await
            .unwrap_err();
        assert!(matches!(err, ScreeningError::InsufficientInput { .. }));
    }

    #[tokio::test]
    async fn test_screen_application_reports_skill_score() {
        let matcher = FixedSemanticMatcher::new(90, "Great fit.");
        let screening = screen_application(
            &full_stack_job(),
            &submission("c1", text_upload(TEXT_RESUME), None),
            &matcher,
        )
        .await
        .unwrap();

        assert_eq!(screening.application_id, "app_c1");
        assert_eq!(screening.match_percentage, screening.skill_match.score);
        assert_eq!(screening.recommendation, recommendation(screening.match_percentage));
        assert_eq!(screening.skill_match.mode, MatchMode::AiAssisted);
        assert_eq!(screening.resume_source, ResumeSource::UploadedResume);
        assert!(screening.parsed_resume.skills.contains(&"node.js".to_string()));
    }

    #[tokio::test]
    async fn test_screen_application_degrades_to_basic_mode() {
        let screening = screen_application(
            &full_stack_job(),
            &submission("c1", None, Some(profile())),
            &UnavailableSemanticMatcher,
        )
        .await
        .unwrap();

        assert_eq!(screening.skill_match.mode, MatchMode::Basic);
        assert!(screening.skill_match.fallback_reason.is_some());
        assert_eq!(screening.resume_source, ResumeSource::ApplicantProfile);
    }

    #[tokio::test]
    async fn test_batch_excludes_candidates_without_input() {
        let batch = screen_batch(
            &full_stack_job(),
            vec![
                submission("c1", text_upload(TEXT_RESUME), None),
                submission("c2", None, None),
                submission("c3", None, Some(profile())),
            ],
            &UnavailableSemanticMatcher,
            2,
        )
        .await;

        assert_eq!(batch.rankings.len(), 2);
        assert_eq!(batch.total_candidates, 2);
        assert_eq!(batch.statistics.total_candidates, 2);
        assert_eq!(batch.excluded.len(), 1);
        assert_eq!(batch.excluded[0].candidate_id, "c2");
        assert_eq!(batch.excluded[0].application_id, "app_c2");
        assert!(batch.excluded[0].reason.contains("c2"));
    }

    #[tokio::test]
    async fn test_batch_result_independent_of_concurrency() {
        let job = full_stack_job();
        let submissions: Vec<CandidateSubmission> = (0..6)
            .map(|i| {
                let mut p = profile();
                p.years_of_experience = Some(i);
                submission(&format!("c{i}"), None, Some(p))
            })
            .collect();
        let matcher = FixedSemanticMatcher::new(70, "ok");

        let serial = screen_batch(&job, submissions.clone(), &matcher, 1).await;
        let parallel = screen_batch(&job, submissions, &matcher, 4).await;

        assert_eq!(serial.rankings, parallel.rankings);
        assert_eq!(serial.statistics, parallel.statistics);
    }

    #[tokio::test]
    async fn test_batch_of_nothing_has_zero_stats() {
        let batch = screen_batch(&full_stack_job(), Vec::new(), &UnavailableSemanticMatcher, 4).await;
        assert!(batch.rankings.is_empty());
        assert_eq!(batch.statistics, RankingStats::default());
    }
}
