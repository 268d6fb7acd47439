// Candidate-facing feedback: per-stage and overall analyzers plus report storage.

pub mod analyzer;
pub mod handlers;
pub mod prompts;
pub mod reports;
