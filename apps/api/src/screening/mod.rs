//! Candidate screening: resume parsing, skill matching and ranking.

pub mod demo;
pub mod error;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod ranker;
pub mod resume_parser;
pub mod skill_matcher;
pub mod vocabulary;

#[cfg(test)]
pub(crate) mod testing;
