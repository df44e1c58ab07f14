use thiserror::Error;

use crate::llm_client::LlmError;

/// Outcomes that degrade a single candidate's screening. None of these abort a batch.
#[derive(Debug, Error)]
pub enum ScreeningError {
    /// Resume text extraction failed; the caller falls back to profile data.
    #[error("Resume parsing failed: {0}")]
    ParseFailure(String),

    /// The semantic matcher could not be used; matching degrades to keyword-only.
    #[error("AI analysis unavailable: {0}")]
    MatchCollaboratorUnavailable(#[from] CollaboratorError),

    /// Neither a usable resume nor profile data exists for the candidate.
    #[error("No resume or profile data available for candidate {candidate_id}")]
    InsufficientInput { candidate_id: String },
}

/// Why the semantic matcher did not produce an assessment.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("no API key configured")]
    NotConfigured,

    #[error("completion call failed: {0}")]
    Call(#[from] LlmError),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}
