//! Candidate ranking: turns per-candidate (resume, skill match) pairs for one job into a
//! ranked `CandidateScore` list.
//!
//! Pure and deterministic; nothing here touches I/O or the clock.
//!
//! overall = round(skill × 0.5 + experience × 0.3 + education × 0.2)

use once_cell::sync::Lazy;
use regex::Regex;

use crate::screening::models::{
    CandidateScore, JobRequirements, MatchMode, ParsedResume, RankingStats, SkillMatchResult,
};
use crate::screening::vocabulary::{truncate_chars, DEGREE_HIERARCHY, DEGREE_TERMS};

const SKILL_WEIGHT: f64 = 0.5;
const EXPERIENCE_WEIGHT: f64 = 0.3;
const EDUCATION_WEIGHT: f64 = 0.2;
const MAX_STRENGTHS: usize = 5;
const MAX_WEAKNESSES: usize = 5;
const JOB_DESCRIPTION_PREFIX_CHARS: usize = 20;
/// Stated year counts above this are read as this.
const MAX_YEAR_COUNT: i64 = 100;

static CANDIDATE_YEARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([0-9]+)\s*(?:years?|yrs?)").expect("valid years regex"));

static REQUIRED_YEARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([0-9]+)\s*(?:years?|yrs?|\+)").expect("valid years regex"));

/// One screened candidate, ready to rank.
#[derive(Debug, Clone)]
pub struct CandidateData {
    pub candidate_id: String,
    pub application_id: String,
    pub resume: ParsedResume,
    pub skill_match: SkillMatchResult,
}

/// Scores every candidate, then sorts by overall score descending.
/// Equal scores keep their input order.
pub fn rank_candidates(candidates: Vec<CandidateData>, job: &JobRequirements) -> Vec<CandidateScore> {
    let mut scores: Vec<CandidateScore> = candidates
        .into_iter()
        .map(|candidate| score_candidate(candidate, job))
        .collect();

    // sort_by is stable
    scores.sort_by(|a, b| b.overall_score.cmp(&a.overall_score));

    for (index, score) in scores.iter_mut().enumerate() {
        score.rank = index + 1;
    }

    scores
}

fn score_candidate(candidate: CandidateData, job: &JobRequirements) -> CandidateScore {
    let skill_match_score = candidate.skill_match.score;
    let experience_score = calculate_experience_score(&candidate.resume, job);
    let education_score = calculate_education_score(&candidate.resume, job);
    let overall_score = composite_score(skill_match_score, experience_score, education_score);

    let strengths = identify_strengths(&candidate.resume, &candidate.skill_match);
    let weaknesses = identify_weaknesses(&candidate.resume, &candidate.skill_match, job);
    let justification = generate_justification(
        ScoreBreakdown {
            overall: overall_score,
            skill: skill_match_score,
            experience: experience_score,
            education: education_score,
        },
        candidate.skill_match.mode,
        &strengths,
        &weaknesses,
    );

    CandidateScore {
        candidate_id: candidate.candidate_id,
        application_id: candidate.application_id,
        overall_score,
        skill_match_score,
        experience_score,
        education_score,
        match_percentage: overall_score.min(100),
        rank: 0,
        skill_match: candidate.skill_match,
        justification,
        strengths,
        weaknesses,
    }
}

pub fn composite_score(skill: u32, experience: u32, education: u32) -> u32 {
    (f64::from(skill) * SKILL_WEIGHT
        + f64::from(experience) * EXPERIENCE_WEIGHT
        + f64::from(education) * EDUCATION_WEIGHT)
        .round() as u32
}

/// First "<N> years" style count in `text`, capped at `MAX_YEAR_COUNT`, or 0.
fn first_year_count(pattern: &Regex, text: &str) -> i64 {
    pattern
        .captures(text)
        .map(|c| {
            c[1].parse::<u32>()
                .map_or(MAX_YEAR_COUNT, |n| i64::from(n).min(MAX_YEAR_COUNT))
        })
        .unwrap_or(0)
}

pub fn calculate_experience_score(resume: &ParsedResume, job: &JobRequirements) -> u32 {
    let candidate_years = first_year_count(&CANDIDATE_YEARS, &resume.experience);
    let required_years = job
        .experience
        .as_deref()
        .map(|e| first_year_count(&REQUIRED_YEARS, e))
        .unwrap_or(0);

    let base = if required_years == 0 {
        70
    } else if candidate_years >= required_years {
        (70 + (candidate_years - required_years) * 5).min(100)
    } else {
        (70 - (required_years - candidate_years) * 10).max(20)
    };

    let title_key = job
        .title
        .split_whitespace()
        .next()
        .map(str::to_lowercase)
        .unwrap_or_default();
    let description_key = truncate_chars(&job.description, JOB_DESCRIPTION_PREFIX_CHARS).to_lowercase();

    let relevant_history = resume
        .work_history
        .iter()
        .filter(|item| {
            let title_match = !title_key.is_empty() && item.title.to_lowercase().contains(&title_key);
            let description_match = !description_key.is_empty()
                && item
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&description_key));
            title_match || description_match
        })
        .count() as i64;

    (base + relevant_history * 10).clamp(0, 100) as u32
}

/// Highest hierarchy position among the found degree terms; bare "degree" counts as bachelor.
fn highest_degree_level(found: &[&str]) -> i64 {
    found
        .iter()
        .filter_map(|term| DEGREE_HIERARCHY.iter().position(|level| term.contains(level)))
        .max()
        .unwrap_or(0) as i64
}

pub fn calculate_education_score(resume: &ParsedResume, job: &JobRequirements) -> u32 {
    let candidate_text = resume.education.to_lowercase();
    let job_text = job.education.as_deref().unwrap_or_default().to_lowercase();

    let candidate_degrees: Vec<&str> = DEGREE_TERMS
        .iter()
        .copied()
        .filter(|d| candidate_text.contains(d))
        .collect();
    let job_degrees: Vec<&str> = DEGREE_TERMS
        .iter()
        .copied()
        .filter(|d| job_text.contains(d))
        .collect();

    let mut score = if job_degrees.is_empty() {
        70
    } else if candidate_degrees.is_empty() {
        40
    } else {
        let candidate_level = highest_degree_level(&candidate_degrees);
        let job_level = highest_degree_level(&job_degrees);
        if candidate_level >= job_level {
            (80 + (candidate_level - job_level) * 5).min(100)
        } else {
            (80 - (job_level - candidate_level) * 15).max(30)
        }
    };

    if !resume.certifications.is_empty() {
        score = (score + 10).min(100);
    }

    score as u32
}

pub fn identify_strengths(resume: &ParsedResume, skill_match: &SkillMatchResult) -> Vec<String> {
    let mut strengths = Vec::new();

    if skill_match.score >= 80 {
        strengths.push("Excellent skill alignment with job requirements".to_string());
    }
    if skill_match.matched_skills.len() >= 5 {
        strengths.push(format!(
            "Strong in {} required skills",
            skill_match.matched_skills.len()
        ));
    }
    if resume.work_history.len() >= 3 {
        strengths.push("Extensive relevant work experience".to_string());
    }
    if !resume.certifications.is_empty() {
        strengths.push(format!(
            "Has {} relevant certification(s)",
            resume.certifications.len()
        ));
    }
    if resume.summary.chars().count() > 200 {
        strengths.push("Comprehensive professional profile".to_string());
    }
    if skill_match.score >= 90 {
        strengths.push("Near-perfect match for position".to_string());
    }

    strengths.truncate(MAX_STRENGTHS);
    strengths
}

pub fn identify_weaknesses(
    resume: &ParsedResume,
    skill_match: &SkillMatchResult,
    job: &JobRequirements,
) -> Vec<String> {
    let mut weaknesses = Vec::new();

    if !skill_match.missing_skills.is_empty() {
        let preview: Vec<&str> = skill_match
            .missing_skills
            .iter()
            .take(3)
            .map(String::as_str)
            .collect();
        weaknesses.push(format!(
            "Missing {} key skill(s): {}",
            skill_match.missing_skills.len(),
            preview.join(", ")
        ));
    }
    if skill_match.score < 50 {
        weaknesses.push("Limited alignment with required skills".to_string());
    }
    if resume.work_history.len() < 2 {
        weaknesses.push("Limited work experience".to_string());
    }
    if resume.summary.chars().count() < 100 {
        weaknesses.push("Brief professional summary".to_string());
    }
    if resume.certifications.is_empty() && job.description.to_lowercase().contains("certified") {
        weaknesses.push("No relevant certifications listed".to_string());
    }

    weaknesses.truncate(MAX_WEAKNESSES);
    weaknesses
}

struct ScoreBreakdown {
    overall: u32,
    skill: u32,
    experience: u32,
    education: u32,
}

fn generate_justification(
    scores: ScoreBreakdown,
    mode: MatchMode,
    strengths: &[String],
    weaknesses: &[String],
) -> String {
    let mut parts = vec![
        format!("Overall match score: {}/100.", scores.overall),
        format!(
            "Skill match: {}/100, Experience: {}/100, Education: {}/100.",
            scores.skill, scores.experience, scores.education
        ),
    ];

    if mode == MatchMode::Basic {
        parts.push("Skill match is keyword-only (AI analysis unavailable).".to_string());
    }
    if !strengths.is_empty() {
        parts.push(format!("Strengths: {}.", top_two(strengths)));
    }
    if !weaknesses.is_empty() && scores.overall < 70 {
        parts.push(format!("Areas for improvement: {}.", top_two(weaknesses)));
    }

    parts.push(
        match scores.overall {
            80.. => "Highly recommended candidate.",
            60..=79 => "Good candidate with potential.",
            40..=59 => "Moderate match, may require additional training.",
            _ => "Limited match, consider for future opportunities.",
        }
        .to_string(),
    );

    parts.join(" ")
}

fn top_two(items: &[String]) -> String {
    items.iter().take(2).cloned().collect::<Vec<_>>().join("; ")
}

/// Aggregate statistics over a ranked list. All zero for an empty list.
pub fn ranking_stats(scores: &[CandidateScore]) -> RankingStats {
    if scores.is_empty() {
        return RankingStats::default();
    }

    let total: u64 = scores.iter().map(|s| u64::from(s.overall_score)).sum();
    let average = (total as f64 / scores.len() as f64).round() as u32;

    RankingStats {
        total_candidates: scores.len(),
        average_score: average,
        top_score: scores.iter().map(|s| s.overall_score).max().unwrap_or(0),
        lowest_score: scores.iter().map(|s| s.overall_score).min().unwrap_or(0),
    }
}
