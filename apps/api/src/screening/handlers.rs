//! Axum route handlers for the Screening API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::screening::demo::{mock_job, run_demo};
use crate::screening::models::{ApplicantProfile, JobRequirements};
use crate::screening::pipeline::{
    screen_application, screen_batch, ApplicationScreening, BatchScreening, CandidateSubmission,
    ResumeUpload,
};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// A candidate as submitted over JSON. A pasted resume is screened as plain text.
#[derive(Debug, Deserialize)]
pub struct CandidateRequest {
    pub candidate_id: String,
    pub application_id: String,
    #[serde(default)]
    pub resume_text: Option<String>,
    #[serde(default)]
    pub profile: Option<ApplicantProfile>,
}

impl From<CandidateRequest> for CandidateSubmission {
    fn from(req: CandidateRequest) -> Self {
        CandidateSubmission {
            candidate_id: req.candidate_id,
            application_id: req.application_id,
            resume: req.resume_text.map(|text| ResumeUpload {
                bytes: Bytes::from(text),
                mime_type: Some("text/plain".to_string()),
            }),
            profile: req.profile,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ScreenApplicationRequest {
    pub job: JobRequirements,
    pub candidate: CandidateRequest,
}

#[derive(Debug, Deserialize)]
pub struct RankCandidatesRequest {
    pub job: JobRequirements,
    pub candidates: Vec<CandidateRequest>,
}

#[derive(Debug, Serialize)]
pub struct DemoResponse {
    pub job: JobRequirements,
    #[serde(flatten)]
    pub screening: BatchScreening,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/screening/applications
///
/// Screens one candidate against one job and returns the match with a recommendation.
pub async fn handle_screen_application(
    State(state): State<AppState>,
    Json(request): Json<ScreenApplicationRequest>,
) -> Result<Json<ApplicationScreening>, AppError> {
    validate_job(&request.job)?;

    let submission = CandidateSubmission::from(request.candidate);
    let screening =
        screen_application(&request.job, &submission, state.semantic_matcher.as_ref()).await?;

    Ok(Json(screening))
}

/// POST /api/v1/screening/applications/upload
///
/// Multipart variant of the single screen. Fields: `job` (JSON), `candidate_id`,
/// `application_id`, optional `profile` (JSON), optional `resume` file.
pub async fn handle_screen_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ApplicationScreening>, AppError> {
    let mut job: Option<JobRequirements> = None;
    let mut candidate_id: Option<String> = None;
    let mut application_id: Option<String> = None;
    let mut profile: Option<ApplicantProfile> = None;
    let mut resume: Option<ResumeUpload> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "job" => job = Some(parse_json_field("job", &field.text().await?)?),
            "candidate_id" => candidate_id = Some(field.text().await?),
            "application_id" => application_id = Some(field.text().await?),
            "profile" => profile = Some(parse_json_field("profile", &field.text().await?)?),
            "resume" => {
                let mime_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                debug!("Received resume upload: {} bytes ({mime_type:?})", bytes.len());
                resume = Some(ResumeUpload { bytes, mime_type });
            }
            other => debug!("Ignoring multipart field '{other}'"),
        }
    }

    let job = job.ok_or_else(|| AppError::Validation("job field is required".to_string()))?;
    validate_job(&job)?;

    let submission = CandidateSubmission {
        candidate_id: required_text("candidate_id", candidate_id)?,
        application_id: required_text("application_id", application_id)?,
        resume,
        profile,
    };

    let screening = screen_application(&job, &submission, state.semantic_matcher.as_ref()).await?;

    Ok(Json(screening))
}

/// POST /api/v1/screening/jobs/rank
///
/// Screens every candidate concurrently and returns the ranked list with statistics.
/// Candidates with neither resume nor profile are listed under `excluded`.
pub async fn handle_rank_candidates(
    State(state): State<AppState>,
    Json(request): Json<RankCandidatesRequest>,
) -> Result<Json<BatchScreening>, AppError> {
    validate_job(&request.job)?;
    if request.candidates.is_empty() {
        return Err(AppError::Validation(
            "candidates cannot be empty".to_string(),
        ));
    }

    let submissions = request
        .candidates
        .into_iter()
        .map(CandidateSubmission::from)
        .collect();

    let batch = screen_batch(
        &request.job,
        submissions,
        state.semantic_matcher.as_ref(),
        state.config.screening_concurrency,
    )
    .await;

    if batch.rankings.is_empty() {
        return Err(AppError::Validation(
            "No valid candidate data found".to_string(),
        ));
    }

    Ok(Json(batch))
}

/// GET /api/v1/screening/demo
///
/// Ranks the built-in sample candidates against the sample job.
pub async fn handle_demo(State(state): State<AppState>) -> Json<DemoResponse> {
    let screening = run_demo(state.semantic_matcher.as_ref()).await;
    Json(DemoResponse {
        job: mock_job(),
        screening,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn validate_job(job: &JobRequirements) -> Result<(), AppError> {
    if job.title.trim().is_empty() {
        return Err(AppError::Validation("job title cannot be empty".to_string()));
    }
    if job.description.trim().is_empty() {
        return Err(AppError::Validation(
            "job description cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn parse_json_field<T: DeserializeOwned>(name: &str, raw: &str) -> Result<T, AppError> {
    serde_json::from_str(raw)
        .map_err(|e| AppError::Validation(format!("{name} field is not valid JSON: {e}")))
}

fn required_text(name: &str, value: Option<String>) -> Result<String, AppError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(format!("{name} field is required")))
}
