//! Fixed vocabularies shared by the parser, matcher and ranker.
//!
//! Everything here is immutable process-lifetime data. Regex tables are compiled
//! once on first use.

use once_cell::sync::Lazy;
use regex::Regex;

/// Skill terms recognized by containment in resumes and job text. Scan results keep this order.
pub const SKILL_VOCABULARY: &[&str] = &[
    "javascript",
    "typescript",
    "react",
    "node.js",
    "python",
    "java",
    "c++",
    "c#",
    "sql",
    "mongodb",
    "postgresql",
    "aws",
    "azure",
    "docker",
    "kubernetes",
    "git",
    "agile",
    "scrum",
    "machine learning",
    "ai",
    "data science",
    "html",
    "css",
    "angular",
    "vue",
    "express",
    "django",
    "flask",
    "project management",
    "leadership",
    "communication",
    "teamwork",
    "testing",
    "qa",
    "devops",
    "frontend",
    "backend",
    "full stack",
];

/// Spoken languages detected in resumes.
pub const LANGUAGE_VOCABULARY: &[&str] = &["english", "amharic", "french", "spanish", "arabic"];

/// A line containing any of these is an education line.
pub const EDUCATION_KEYWORDS: &[&str] = &[
    "bachelor",
    "master",
    "phd",
    "degree",
    "university",
    "college",
    "diploma",
];

/// A line containing any of these starts a work-history entry.
pub const ROLE_KEYWORDS: &[&str] = &[
    "developer",
    "engineer",
    "manager",
    "analyst",
    "designer",
    "consultant",
];

pub const CERTIFICATION_KEYWORDS: &[&str] = &["certified", "certification", "certificate", "license"];

pub const SUMMARY_HEADINGS: &[&str] = &["summary", "about", "objective", "profile"];

/// Headings that close a summary block.
pub const SECTION_HEADINGS: &[&str] = &[
    "experience",
    "work history",
    "employment",
    "education",
    "skills",
    "certifications",
    "languages",
    "projects",
];

/// Degree terms searched in education text, matched by plain containment.
pub const DEGREE_TERMS: &[&str] = &["phd", "doctorate", "master", "mba", "bachelor", "degree"];

/// Degree seniority by list position. `mba` sits below `phd`/`doctorate` positionally;
/// scores depend on this exact order.
pub const DEGREE_HIERARCHY: &[&str] = &["bachelor", "master", "mba", "phd", "doctorate"];

/// Regex families used to pull skill keywords out of lowercase job text.
/// Order: languages/frameworks, data stores, cloud/devops, frontend, methodology,
/// ml/ai, version control, api styles, soft skills, testing.
pub static JOB_KEYWORD_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\b(javascript|typescript|react|angular|vue|node\.?js|python|java|c\+\+|c#|php|ruby|go|rust|swift|kotlin)\b",
        r"\b(sql|mongodb|postgresql|mysql|redis|elasticsearch|dynamodb)\b",
        r"\b(aws|azure|gcp|docker|kubernetes|jenkins|ci/cd|terraform)\b",
        r"\b(html|css|sass|less|bootstrap|tailwind|material-ui)\b",
        r"\b(agile|scrum|kanban|jira|confluence)\b",
        r"\b(machine learning|ml|ai|artificial intelligence|data science|nlp|deep learning)\b",
        r"\b(git|github|gitlab|bitbucket|version control)\b",
        r"\b(rest|graphql|api|microservices|serverless)\b",
        r"\b(project management|leadership|teamwork|communication|problem solving)\b",
        r"\b(testing|jest|mocha|cypress|selenium|tdd|unit testing)\b",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("job keyword pattern is a valid regex"))
    .collect()
});

/// True if `term` occurs in `haystack` with no letter or digit directly on either side.
///
/// Both arguments are expected lowercase. An empty term never matches.
pub fn contains_term(haystack: &str, term: &str) -> bool {
    if term.is_empty() {
        return false;
    }
    haystack.match_indices(term).any(|(start, matched)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + matched.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// Two skill strings overlap if either contains the other as a bounded term.
pub fn terms_overlap(a: &str, b: &str) -> bool {
    contains_term(a, b) || contains_term(b, a)
}

/// Every vocabulary term present in `text`, in vocabulary order.
pub fn scan_vocabulary(text: &str, vocabulary: &[&str]) -> Vec<String> {
    let lower = text.to_lowercase();
    vocabulary
        .iter()
        .filter(|term| contains_term(&lower, term))
        .map(|term| term.to_string())
        .collect()
}

/// Truncates to at most `max` characters without splitting a code point.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
