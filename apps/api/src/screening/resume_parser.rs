//! Resume parsing: turns an uploaded resume (PDF or plain text) into a `ParsedResume`.
//!
//! Text-to-structure extraction is pattern matching only: no model calls, no randomness.
//! The same text always yields the same `ParsedResume`.

use bytes::Bytes;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::screening::error::ScreeningError;
use crate::screening::models::{ParsedResume, WorkHistoryItem};
use crate::screening::vocabulary::{
    contains_term, scan_vocabulary, truncate_chars, CERTIFICATION_KEYWORDS, EDUCATION_KEYWORDS,
    LANGUAGE_VOCABULARY, ROLE_KEYWORDS, SECTION_HEADINGS, SKILL_VOCABULARY, SUMMARY_HEADINGS,
};

const MAX_WORK_HISTORY: usize = 5;
const MAX_CERTIFICATIONS: usize = 10;
const MAX_EDUCATION_LINES: usize = 3;
const MAX_DESCRIPTION_CHARS: usize = 200;
const MAX_SUMMARY_CHARS: usize = 500;
const FALLBACK_SUMMARY_CHARS: usize = 300;
const FALLBACK_EXPERIENCE_CHARS: usize = 1000;
/// A role line without a separator counts as a title only if it is this short.
const MAX_BARE_TITLE_WORDS: usize = 6;
/// A heading label never runs longer than this.
const MAX_HEADING_WORDS: usize = 3;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("valid email regex")
});

static PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}|\d{10}")
        .expect("valid phone regex")
});

static FULL_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][a-z]+\s+[A-Z][a-z]+").expect("valid name regex"));

static TITLE_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(.+?)(?:\s+[-–]\s+|\s+at\s+)").expect("valid title regex"));

static COMPANY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:at\s+)?(.+?)(?:\s*[-–|]|\s+\d{4}|$)").expect("valid company regex")
});

static DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b((?:19|20)\d{2})\s*[-–]\s*((?:19|20)\d{2}|present|current|now)\b")
        .expect("valid duration regex")
});

/// Parses a resume buffer, choosing the extraction path from the declared MIME type.
pub async fn parse_resume(
    bytes: Bytes,
    mime_type: Option<&str>,
) -> Result<ParsedResume, ScreeningError> {
    let is_pdf = mime_type
        .map(|m| m.to_ascii_lowercase().contains("pdf"))
        .unwrap_or(false);

    if is_pdf {
        parse_pdf_resume(bytes).await
    } else {
        Ok(parse_resume_text(&String::from_utf8_lossy(&bytes)))
    }
}

/// Extracts embedded PDF text on the blocking pool, then parses it.
///
/// `pdf-extract` may panic on malformed input; the panic surfaces as a join error
/// and is reported the same way as an extraction error.
pub async fn parse_pdf_resume(bytes: Bytes) -> Result<ParsedResume, ScreeningError> {
    let extracted = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| ScreeningError::ParseFailure(format!("PDF extraction aborted: {e}")))?
        .map_err(|e| ScreeningError::ParseFailure(format!("PDF extraction failed: {e:?}")))?;

    if extracted.trim().is_empty() {
        warn!("PDF contained no extractable text");
        return Err(ScreeningError::ParseFailure(
            "PDF contains no extractable text".to_string(),
        ));
    }

    debug!("Extracted {} chars of PDF text", extracted.len());
    Ok(parse_resume_text(&extracted))
}

/// Extracts structured fields from resume text.
pub fn parse_resume_text(text: &str) -> ParsedResume {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let work_history = extract_work_history(&lines);
    let experience = if work_history.is_empty() {
        truncate_chars(text, FALLBACK_EXPERIENCE_CHARS).to_string()
    } else {
        render_experience(&work_history)
    };

    ParsedResume {
        full_name: extract_full_name(&lines),
        email: EMAIL.find(text).map(|m| m.as_str().to_string()),
        phone: PHONE.find(text).map(|m| m.as_str().trim().to_string()),
        skills: scan_vocabulary(text, SKILL_VOCABULARY),
        experience,
        education: extract_education(&lines),
        summary: extract_summary(text),
        work_history,
        certifications: extract_certifications(&lines),
        languages: scan_vocabulary(text, LANGUAGE_VOCABULARY),
        raw_text: text.to_string(),
    }
}

fn extract_full_name(lines: &[&str]) -> Option<String> {
    lines
        .first()
        .filter(|first| FULL_NAME.is_match(first))
        .map(|first| first.to_string())
}

fn extract_education(lines: &[&str]) -> String {
    lines
        .iter()
        .filter(|line| {
            let lower = line.to_lowercase();
            EDUCATION_KEYWORDS.iter().any(|k| lower.contains(k))
        })
        .take(MAX_EDUCATION_LINES)
        .copied()
        .collect::<Vec<_>>()
        .join(" | ")
}

fn extract_certifications(lines: &[&str]) -> Vec<String> {
    lines
        .iter()
        .filter(|line| !is_section_heading(line))
        .filter(|line| {
            let lower = line.to_lowercase();
            CERTIFICATION_KEYWORDS.iter().any(|k| lower.contains(k))
        })
        .take(MAX_CERTIFICATIONS)
        .map(|line| line.to_string())
        .collect()
}

/// Title line, then company line, then description line. Scans every line, so a
/// description that itself names a role also starts an entry.
fn extract_work_history(lines: &[&str]) -> Vec<WorkHistoryItem> {
    let mut history = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        if history.len() == MAX_WORK_HISTORY {
            break;
        }
        let Some(title) = title_from_line(line) else {
            continue;
        };

        let company_line = lines.get(i + 1).copied().unwrap_or(line);
        let company = COMPANY
            .captures(company_line)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| company_line.to_string());

        let duration = DURATION
            .captures(company_line)
            .or_else(|| DURATION.captures(line))
            .map(|c| format!("{} - {}", &c[1], &c[2]));

        let description = lines
            .get(i + 2)
            .map(|d| truncate_chars(d, MAX_DESCRIPTION_CHARS).to_string());

        history.push(WorkHistoryItem {
            title,
            company,
            duration,
            description,
        });
    }

    history
}

fn title_from_line(line: &str) -> Option<String> {
    let lower = line.to_lowercase();
    if !ROLE_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return None;
    }
    if let Some(caps) = TITLE_SEPARATOR.captures(line) {
        return Some(caps[1].trim().to_string());
    }
    if line.split_whitespace().count() <= MAX_BARE_TITLE_WORDS {
        return Some(line.to_string());
    }
    None
}

fn render_experience(history: &[WorkHistoryItem]) -> String {
    history
        .iter()
        .map(|item| match &item.description {
            Some(desc) => format!("{} at {}: {}", item.title, item.company, desc),
            None => format!("{} at {}", item.title, item.company),
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Text under the first summary-style heading, up to a blank line or the next section.
/// Without such a heading, the opening characters of the document.
fn extract_summary(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();

    for (i, line) in lines.iter().enumerate() {
        let Some(inline) = heading_remainder(line, SUMMARY_HEADINGS) else {
            continue;
        };

        let mut parts: Vec<&str> = Vec::new();
        if !inline.is_empty() {
            parts.push(inline);
        }
        for next in &lines[i + 1..] {
            let next = next.trim();
            if next.is_empty() {
                if parts.is_empty() {
                    continue;
                }
                break;
            }
            if is_section_heading(next) {
                break;
            }
            parts.push(next);
        }

        let summary = parts.join(" ");
        if !summary.is_empty() {
            return truncate_chars(&summary, MAX_SUMMARY_CHARS).to_string();
        }
    }

    truncate_chars(text, FALLBACK_SUMMARY_CHARS).to_string()
}

fn is_section_heading(line: &str) -> bool {
    heading_remainder(line, SECTION_HEADINGS).is_some()
}

/// If `line` is a short heading label naming one of `headings` ("Professional Summary",
/// "About me:", "Objective: ..."), returns whatever follows the colon.
fn heading_remainder<'a>(line: &'a str, headings: &[&str]) -> Option<&'a str> {
    let line = line.trim();
    let (label, rest) = match line.split_once(':') {
        Some((label, rest)) => (label, rest.trim()),
        None => (line, ""),
    };
    if label.split_whitespace().count() > MAX_HEADING_WORDS {
        return None;
    }
    let label = label.to_lowercase();
    headings
        .iter()
        .any(|h| contains_term(&label, h))
        .then_some(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RESUME: &str = "Jane Doe
jane.doe@example.com | +1 (555) 123-4567
Addis Ababa

Summary
Full stack developer with 7 years of experience building web platforms in React and Node.js.

Experience
Senior Software Engineer - Full Stack
Acme Corp 2019 - Present
Led migration of the hiring platform to TypeScript and PostgreSQL.
Frontend Developer at Beta Labs
Beta Labs
Built dashboards in React.

Education
Bachelor of Science in Computer Science, Addis Ababa University

Certifications
AWS Certified Solutions Architect

Languages
English, Amharic
";

    #[test]
    fn test_contact_fields() {
        let parsed = parse_resume_text(SAMPLE_RESUME);
        assert_eq!(parsed.full_name.as_deref(), Some("Jane Doe"));
        assert_eq!(parsed.email.as_deref(), Some("jane.doe@example.com"));
        assert_eq!(parsed.phone.as_deref(), Some("+1 (555) 123-4567"));
    }

    #[test]
    fn test_skills_follow_vocabulary_with_word_edges() {
        let parsed = parse_resume_text(SAMPLE_RESUME);
        assert!(parsed.skills.contains(&"react".to_string()));
        assert!(parsed.skills.contains(&"node.js".to_string()));
        assert!(parsed.skills.contains(&"postgresql".to_string()));
        assert!(parsed.skills.contains(&"full stack".to_string()));
        // "sql" only appears inside "postgresql"
        assert!(!parsed.skills.contains(&"sql".to_string()));
        assert!(!parsed.skills.contains(&"java".to_string()));
        let react = parsed.skills.iter().position(|s| s == "react").unwrap();
        let aws = parsed.skills.iter().position(|s| s == "aws").unwrap();
        assert!(react < aws);
    }

    #[test]
    fn test_work_history_entries() {
        let parsed = parse_resume_text(SAMPLE_RESUME);
        assert_eq!(parsed.work_history.len(), 2);

        let first = &parsed.work_history[0];
        assert_eq!(first.title, "Senior Software Engineer");
        assert_eq!(first.company, "Acme Corp");
        assert_eq!(first.duration.as_deref(), Some("2019 - Present"));
        assert_eq!(
            first.description.as_deref(),
            Some("Led migration of the hiring platform to TypeScript and PostgreSQL.")
        );

        let second = &parsed.work_history[1];
        assert_eq!(second.title, "Frontend Developer");
        assert_eq!(second.company, "Beta Labs");
        assert_eq!(second.duration, None);
    }

    #[test]
    fn test_experience_renders_work_history() {
        let parsed = parse_resume_text(SAMPLE_RESUME);
        assert!(parsed
            .experience
            .starts_with("Senior Software Engineer at Acme Corp: Led migration"));
        assert!(parsed.experience.contains(" | Frontend Developer at Beta Labs"));
    }

    #[test]
    fn test_summary_under_heading() {
        let parsed = parse_resume_text(SAMPLE_RESUME);
        assert_eq!(
            parsed.summary,
            "Full stack developer with 7 years of experience building web platforms in React and Node.js."
        );
    }

    #[test]
    fn test_summary_inline_after_colon_stops_at_section() {
        let text = "Objective: Grow into a data engineering role.\nSkills\nPython";
        assert_eq!(
            parse_resume_text(text).summary,
            "Grow into a data engineering role."
        );
    }

    #[test]
    fn test_summary_fallback_is_not_padded() {
        let text = "Seeking entry level roles in logistics and supply.";
        assert_eq!(text.chars().count(), 50);
        let parsed = parse_resume_text(text);
        assert_eq!(parsed.summary, text);
    }

    #[test]
    fn test_summary_fallback_truncates_to_300_chars() {
        let text = "x".repeat(450);
        assert_eq!(parse_resume_text(&text).summary.chars().count(), 300);
    }

    #[test]
    fn test_education_certifications_languages() {
        let parsed = parse_resume_text(SAMPLE_RESUME);
        assert_eq!(
            parsed.education,
            "Bachelor of Science in Computer Science, Addis Ababa University"
        );
        assert_eq!(parsed.certifications, vec!["AWS Certified Solutions Architect"]);
        assert_eq!(parsed.languages, vec!["english", "amharic"]);
    }

    #[test]
    fn test_education_keeps_first_three_lines() {
        let text = "BSc degree one\nMaster two\nPhD three\nDiploma four";
        assert_eq!(
            parse_resume_text(text).education,
            "BSc degree one | Master two | PhD three"
        );
    }

    #[test]
    fn test_work_history_capped_at_five() {
        let text = (1..=8)
            .map(|i| format!("Engineer {i} - Team\nCompany {i}\nDid things {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let parsed = parse_resume_text(&text);
        assert_eq!(parsed.work_history.len(), 5);
        assert_eq!(parsed.work_history[0].title, "Engineer 1");
    }

    #[test]
    fn test_long_sentence_with_role_word_is_not_a_title() {
        let text = "I am a developer who enjoys building tools for many different teams";
        assert!(parse_resume_text(text).work_history.is_empty());
    }

    #[test]
    fn test_certifications_capped_at_ten() {
        let text = (0..15)
            .map(|i| format!("Certified thing {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(parse_resume_text(&text).certifications.len(), 10);
    }

    #[test]
    fn test_no_matches_still_fully_populated() {
        let parsed = parse_resume_text("");
        assert!(parsed.full_name.is_none());
        assert!(parsed.skills.is_empty());
        assert!(parsed.work_history.is_empty());
        assert!(parsed.certifications.is_empty());
        assert!(parsed.languages.is_empty());
        assert_eq!(parsed.summary, "");
    }

    #[test]
    fn test_lowercase_first_line_is_not_a_name() {
        let parsed = parse_resume_text("jane doe\nDeveloper");
        assert!(parsed.full_name.is_none());
    }

    #[test]
    fn test_parsing_is_deterministic() {
        assert_eq!(parse_resume_text(SAMPLE_RESUME), parse_resume_text(SAMPLE_RESUME));
    }

    #[tokio::test]
    async fn test_plain_text_mime_reads_utf8() {
        let parsed = parse_resume(Bytes::from(SAMPLE_RESUME), Some("text/plain"))
            .await
            .unwrap();
        assert_eq!(parsed.email.as_deref(), Some("jane.doe@example.com"));
    }

    #[tokio::test]
    async fn test_missing_mime_is_treated_as_text() {
        let parsed = parse_resume(Bytes::from_static(b"Python and Docker"), None)
            .await
            .unwrap();
        assert_eq!(parsed.skills, vec!["python", "docker"]);
    }

    #[tokio::test]
    async fn test_invalid_pdf_is_parse_failure() {
        let result = parse_resume(
            Bytes::from_static(b"definitely not a pdf"),
            Some("application/pdf"),
        )
        .await;
        assert!(matches!(result, Err(ScreeningError::ParseFailure(_))));
    }
}
