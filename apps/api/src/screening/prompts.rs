// Prompt constants for the semantic skill match.
// Reuses the JSON-only fragment from llm_client::prompts.

/// System role for the semantic skill match.
pub const SKILL_MATCH_SYSTEM: &str = "You are an expert recruiter. \
    Analyze candidate-job matches objectively and provide scores with clear justifications.";

/// Skill match prompt template.
/// Replace: {job_title}, {job_description}, {required_skills}, {job_education},
///          {job_experience}, {candidate_skills}, {candidate_experience},
///          {candidate_education}, {candidate_summary}, {json_only}
pub const SKILL_MATCH_PROMPT_TEMPLATE: &str = r#"You are an AI recruiter assistant. Analyze how well a candidate matches a job position.

Job Position:
Title: {job_title}
Description: {job_description}
Required Skills: {required_skills}
Education: {job_education}
Experience Required: {job_experience}

Candidate Profile:
Skills: {candidate_skills}
Experience: {candidate_experience}
Education: {candidate_education}
Summary: {candidate_summary}

Provide:
1. A match score from 0-100 based on skills, experience, education, and overall fit
2. A brief justification (2-3 sentences) explaining why this score was given

Respond in JSON format:
{
  "score": <number 0-100>,
  "justification": "<brief explanation>"
}

{json_only}"#;
