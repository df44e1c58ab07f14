//! Built-in sample job and candidates for trying the engine without real data.

use futures::future::join_all;

use crate::screening::models::{CandidateProfile, JobRequirements, ParsedResume};
use crate::screening::pipeline::BatchScreening;
use crate::screening::ranker::{rank_candidates, ranking_stats, CandidateData};
use crate::screening::skill_matcher::{match_skills, SemanticMatcher};

pub fn mock_job() -> JobRequirements {
    JobRequirements {
        title: "Senior Full Stack Developer".to_string(),
        description: "We are looking for an experienced Full Stack Developer to join our team.

Key Responsibilities:
- Develop and maintain web applications using React and Node.js
- Design and implement RESTful APIs
- Work with databases (PostgreSQL, MongoDB)
- Collaborate with cross-functional teams
- Write clean, maintainable code

Requirements:
- 5+ years of experience in full-stack development
- Strong proficiency in JavaScript/TypeScript
- Experience with React, Node.js, Express
- Knowledge of SQL and NoSQL databases
- Experience with AWS or cloud platforms
- Understanding of Git and version control
- Bachelor's degree in Computer Science or related field"
            .to_string(),
        required_skills: Some(
            [
                "JavaScript",
                "TypeScript",
                "React",
                "Node.js",
                "Express",
                "PostgreSQL",
                "MongoDB",
                "Git",
                "AWS",
            ]
            .map(String::from)
            .to_vec(),
        ),
        education: Some("Bachelor's Degree in Computer Science".to_string()),
        experience: Some("5+ years of full-stack development experience".to_string()),
        ..Default::default()
    }
}

fn mock_resume(skills: &[&str], experience: &str, education: &str, summary: &str) -> ParsedResume {
    ParsedResume {
        skills: skills.iter().map(|s| s.to_string()).collect(),
        experience: experience.to_string(),
        education: education.to_string(),
        summary: summary.to_string(),
        ..Default::default()
    }
}

/// Three sample candidates: a strong full-stack fit, a mid-level frontend developer,
/// and a Java backend specialist.
pub fn mock_candidates() -> Vec<ParsedResume> {
    vec![
        mock_resume(
            &[
                "JavaScript", "TypeScript", "React", "Node.js", "Express", "PostgreSQL",
                "MongoDB", "Git", "AWS", "Docker",
            ],
            "7 years of experience as a Full Stack Developer. Built multiple web applications \
             from scratch. Led a team of 3 developers. Experienced with microservices architecture.",
            "Bachelor's Degree in Computer Science from University of Technology",
            "Experienced Full Stack Developer with 7+ years in web development. Expert in React, \
             Node.js, and cloud technologies. Strong problem-solving skills and passion for clean code.",
        ),
        mock_resume(
            &["JavaScript", "React", "Python", "Django", "MySQL", "Git"],
            "3 years of experience in web development. Worked on e-commerce platforms and RESTful APIs.",
            "Bachelor's Degree in Software Engineering",
            "Junior to mid-level developer with strong frontend skills and some backend experience. \
             Quick learner and team player.",
        ),
        mock_resume(
            &["Java", "Spring Boot", "MySQL", "Git", "Maven"],
            "4 years of experience as a Java Backend Developer. Built enterprise applications. \
             Limited frontend experience.",
            "Master's Degree in Computer Science",
            "Backend specialist with strong Java skills. Looking to transition to full-stack development.",
        ),
    ]
}

/// Matches and ranks the sample candidates against the sample job.
pub async fn run_demo(matcher: &dyn SemanticMatcher) -> BatchScreening {
    let job = mock_job();
    let resumes = mock_candidates();

    let profiles: Vec<CandidateProfile> = resumes.iter().map(CandidateProfile::from).collect();
    let matches = join_all(
        profiles
            .iter()
            .map(|profile| match_skills(profile, &job, matcher)),
    )
    .await;

    let candidates = resumes
        .into_iter()
        .zip(matches)
        .enumerate()
        .map(|(index, (resume, skill_match))| CandidateData {
            candidate_id: format!("mock_candidate_{}", index + 1),
            application_id: format!("mock_application_{}", index + 1),
            resume,
            skill_match,
        })
        .collect();

    let rankings = rank_candidates(candidates, &job);
    let statistics = ranking_stats(&rankings);

    BatchScreening {
        total_candidates: rankings.len(),
        rankings,
        statistics,
        excluded: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::models::MatchMode;
    use crate::screening::testing::UnavailableSemanticMatcher;

    #[tokio::test]
    async fn test_demo_ranks_full_stack_candidate_first() {
        let batch = run_demo(&UnavailableSemanticMatcher).await;

        assert_eq!(batch.rankings.len(), 3);
        assert_eq!(batch.total_candidates, 3);
        assert_eq!(batch.rankings[0].candidate_id, "mock_candidate_1");
        assert_eq!(batch.rankings[0].rank, 1);
        assert!(batch.excluded.is_empty());
        assert!(batch
            .rankings
            .iter()
            .all(|s| s.skill_match.mode == MatchMode::Basic));
    }

    #[tokio::test]
    async fn test_demo_java_candidate_gets_no_credit_for_javascript() {
        let batch = run_demo(&UnavailableSemanticMatcher).await;
        let java = batch
            .rankings
            .iter()
            .find(|s| s.candidate_id == "mock_candidate_3")
            .unwrap();
        assert!(!java.skill_match.matched_skills.contains(&"javascript".to_string()));
        assert_eq!(java.rank, 3);
    }

    #[test]
    fn test_mock_job_requires_five_years() {
        let job = mock_job();
        assert_eq!(job.required_skills.as_ref().map(Vec::len), Some(9));
        assert!(job.experience.as_deref().unwrap_or_default().starts_with("5+"));
    }
}
