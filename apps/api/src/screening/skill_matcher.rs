//! Skill matching: scores one candidate against one job.
//!
//! Two strategies, tried in order:
//! 1. AI-assisted: keyword overlap (40%) blended with a semantic score (60%) from a
//!    `SemanticMatcher`.
//! 2. Basic: keyword overlap only, used whenever the semantic matcher fails.
//!
//! The outcome records which strategy produced it (`MatchMode`). Matching holds no
//! shared mutable state and is safe to run concurrently for many candidates.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{CallOptions, LlmClient, LlmError};
use crate::screening::error::{CollaboratorError, ScreeningError};
use crate::screening::models::{CandidateProfile, JobRequirements, MatchMode, SkillMatchResult};
use crate::screening::prompts::{SKILL_MATCH_PROMPT_TEMPLATE, SKILL_MATCH_SYSTEM};
use crate::screening::vocabulary::{
    scan_vocabulary, terms_overlap, truncate_chars, JOB_KEYWORD_PATTERNS, SKILL_VOCABULARY,
};

const KEYWORD_WEIGHT: f64 = 0.4;
const SEMANTIC_WEIGHT: f64 = 0.6;
const MAX_MISSING_SKILLS: usize = 10;
const DEFAULT_SEMANTIC_SCORE: u32 = 50;
const DEFAULT_JUSTIFICATION: &str = "Match analysis completed.";
const PROMPT_EXPERIENCE_CHARS: usize = 500;
const PROMPT_SUMMARY_CHARS: usize = 300;

const SEMANTIC_CALL_OPTIONS: CallOptions = CallOptions {
    temperature: 0.3,
    max_tokens: 300,
};

/// A validated semantic assessment.
#[derive(Debug, Clone, PartialEq)]
pub struct AiAnalysis {
    /// 0 – 100
    pub score: u32,
    pub justification: String,
}

/// The semantic matcher seam. Implement this to swap the backend without touching
/// the matcher, pipeline or handlers.
///
/// Carried in `AppState` as `Arc<dyn SemanticMatcher>`.
#[async_trait]
pub trait SemanticMatcher: Send + Sync {
    async fn assess(
        &self,
        profile: &CandidateProfile,
        job: &JobRequirements,
    ) -> Result<AiAnalysis, CollaboratorError>;
}

/// Semantic matcher backed by the chat-completion API.
/// Constructed without a client when no API key is configured.
pub struct LlmSemanticMatcher {
    llm: Option<LlmClient>,
}

impl LlmSemanticMatcher {
    pub fn new(llm: Option<LlmClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl SemanticMatcher for LlmSemanticMatcher {
    async fn assess(
        &self,
        profile: &CandidateProfile,
        job: &JobRequirements,
    ) -> Result<AiAnalysis, CollaboratorError> {
        let llm = self.llm.as_ref().ok_or(CollaboratorError::NotConfigured)?;

        let prompt = build_skill_match_prompt(profile, job);
        let payload: Value = llm
            .call_json(&prompt, SKILL_MATCH_SYSTEM, SEMANTIC_CALL_OPTIONS)
            .await
            .map_err(|e| match e {
                LlmError::Parse(parse) => CollaboratorError::MalformedResponse(parse.to_string()),
                LlmError::EmptyContent => {
                    CollaboratorError::MalformedResponse("empty content".to_string())
                }
                other => CollaboratorError::Call(other),
            })?;

        analysis_from_payload(payload)
    }
}

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    #[serde(default)]
    score: Option<Value>,
    #[serde(default)]
    justification: Option<String>,
}

/// Validates the untrusted JSON payload.
///
/// A non-object payload is malformed. Inside an object, a missing or non-numeric score
/// falls back to the neutral default and out-of-range scores are clamped.
fn analysis_from_payload(payload: Value) -> Result<AiAnalysis, CollaboratorError> {
    if !payload.is_object() {
        return Err(CollaboratorError::MalformedResponse(format!(
            "expected a JSON object, got {payload}"
        )));
    }
    let raw: RawAnalysis = serde_json::from_value(payload)
        .map_err(|e| CollaboratorError::MalformedResponse(e.to_string()))?;

    let score = raw
        .score
        .as_ref()
        .and_then(score_from_value)
        .map(|s| s.clamp(0, 100) as u32)
        .unwrap_or(DEFAULT_SEMANTIC_SCORE);

    let justification = raw
        .justification
        .map(|j| j.trim().to_string())
        .filter(|j| !j.is_empty())
        .unwrap_or_else(|| DEFAULT_JUSTIFICATION.to_string());

    Ok(AiAnalysis {
        score,
        justification,
    })
}

/// Integer part of a numeric score, accepting numbers and numeric strings ("85", "85/100").
fn score_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            let sign_len = usize::from(s.starts_with('-') || s.starts_with('+'));
            let digits_end = s[sign_len..]
                .find(|c: char| !c.is_ascii_digit())
                .map(|i| i + sign_len)
                .unwrap_or(s.len());
            s[..digits_end].parse::<i64>().ok()
        }
        _ => None,
    }
}

fn build_skill_match_prompt(profile: &CandidateProfile, job: &JobRequirements) -> String {
    let required_skills = job
        .required_skills
        .as_ref()
        .filter(|skills| !skills.is_empty())
        .map(|skills| skills.join(", "))
        .unwrap_or_else(|| "Not specified".to_string());
    let candidate_skills = profile.skills.join(", ");

    fill_template(
        SKILL_MATCH_PROMPT_TEMPLATE,
        &[
            ("job_title", job.title.as_str()),
            ("job_description", job.description.as_str()),
            ("required_skills", required_skills.as_str()),
            (
                "job_education",
                job.education.as_deref().unwrap_or("Not specified"),
            ),
            (
                "job_experience",
                job.experience.as_deref().unwrap_or("Not specified"),
            ),
            ("candidate_skills", candidate_skills.as_str()),
            (
                "candidate_experience",
                truncate_chars(&profile.experience, PROMPT_EXPERIENCE_CHARS),
            ),
            ("candidate_education", profile.education.as_str()),
            (
                "candidate_summary",
                truncate_chars(&profile.summary, PROMPT_SUMMARY_CHARS),
            ),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    )
}

/// Replaces `{name}` placeholders in one pass over `template`.
/// Substituted values are never rescanned, so braces inside them stay literal.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let placeholder = values.iter().find(|(name, _)| {
            tail.strip_prefix(name)
                .is_some_and(|after| after.starts_with('}'))
        });
        match placeholder {
            Some((name, value)) => {
                out.push_str(value);
                rest = &tail[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Scores `profile` against `job`, degrading to keyword-only matching if the
/// semantic matcher fails. Never returns an error.
pub async fn match_skills(
    profile: &CandidateProfile,
    job: &JobRequirements,
    semantic: &dyn SemanticMatcher,
) -> SkillMatchResult {
    let job_keywords = extract_job_keywords(job);
    let candidate_skills = normalize_skills(&profile.skills);

    let keyword_matches = job_keywords
        .iter()
        .filter(|k| candidate_skills.iter().any(|s| terms_overlap(s, k)))
        .count();

    match semantic.assess(profile, job).await {
        Ok(analysis) => {
            debug!(
                "Semantic score {} for job '{}'",
                analysis.score, job.title
            );
            ai_assisted_match(job, &candidate_skills, &job_keywords, keyword_matches, analysis)
        }
        Err(e) => {
            let reason = ScreeningError::from(e);
            warn!("Falling back to basic skill matching: {reason}");
            basic_skill_match(&candidate_skills, &job_keywords, reason.to_string())
        }
    }
}

fn ai_assisted_match(
    job: &JobRequirements,
    candidate_skills: &[String],
    job_keywords: &[String],
    keyword_matches: usize,
    analysis: AiAnalysis,
) -> SkillMatchResult {
    let keyword_score = percentage(keyword_matches, job_keywords.len());
    let blended = keyword_score * KEYWORD_WEIGHT + f64::from(analysis.score) * SEMANTIC_WEIGHT;
    let score = blended.round().clamp(0.0, 100.0) as u32;

    let matched_skills = candidate_skills
        .iter()
        .filter(|s| job_keywords.iter().any(|k| terms_overlap(s, k)))
        .cloned()
        .collect();

    let declared = job
        .required_skills
        .iter()
        .flatten()
        .map(|s| s.trim().to_lowercase());
    let described = scan_vocabulary(&job.description, SKILL_VOCABULARY).into_iter();
    let missing_skills = dedup_preserving_order(
        declared
            .chain(described)
            .filter(|s| !s.is_empty())
            .filter(|s| !candidate_skills.iter().any(|c| terms_overlap(c, s))),
    )
    .into_iter()
    .take(MAX_MISSING_SKILLS)
    .collect();

    SkillMatchResult {
        matched_skills,
        missing_skills,
        score,
        justification: analysis.justification,
        keyword_matches,
        total_keywords: job_keywords.len(),
        mode: MatchMode::AiAssisted,
        fallback_reason: None,
    }
}

/// Keyword-only scoring. Matched and missing lists are job keywords.
fn basic_skill_match(
    candidate_skills: &[String],
    job_keywords: &[String],
    fallback_reason: String,
) -> SkillMatchResult {
    let (matched, missing): (Vec<String>, Vec<String>) = job_keywords
        .iter()
        .cloned()
        .partition(|k| candidate_skills.iter().any(|s| terms_overlap(s, k)));

    let score = percentage(matched.len(), job_keywords.len()).round() as u32;
    let justification = format!(
        "Matched {} out of {} required skills based on keyword analysis. AI analysis unavailable.",
        matched.len(),
        job_keywords.len()
    );

    SkillMatchResult {
        keyword_matches: matched.len(),
        total_keywords: job_keywords.len(),
        matched_skills: matched,
        missing_skills: missing.into_iter().take(MAX_MISSING_SKILLS).collect(),
        score: score.min(100),
        justification,
        mode: MatchMode::Basic,
        fallback_reason: Some(fallback_reason),
    }
}

/// Skill keywords found in the job's text fields, deduplicated in first-seen order:
/// regex families first, then the shared skill vocabulary.
pub fn extract_job_keywords(job: &JobRequirements) -> Vec<String> {
    let mut parts: Vec<&str> = vec![job.title.as_str(), job.description.as_str()];
    parts.extend(job.requirements.as_deref());
    parts.extend(job.experience.as_deref());
    parts.extend(job.required_skills.iter().flatten().map(String::as_str));
    parts.extend(job.preferred_skills.iter().flatten().map(String::as_str));

    let text = parts
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let from_patterns = JOB_KEYWORD_PATTERNS
        .iter()
        .flat_map(|pattern| pattern.find_iter(&text).map(|m| m.as_str().to_string()))
        .collect::<Vec<_>>();
    let from_vocabulary = scan_vocabulary(&text, SKILL_VOCABULARY);

    dedup_preserving_order(from_patterns.into_iter().chain(from_vocabulary))
}

fn normalize_skills(skills: &[String]) -> Vec<String> {
    dedup_preserving_order(
        skills
            .iter()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty()),
    )
}

fn dedup_preserving_order(items: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

fn percentage(part: usize, whole: usize) -> f64 {
    part as f64 / whole.max(1) as f64 * 100.0
}
