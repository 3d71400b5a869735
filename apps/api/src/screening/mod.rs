// Resume screening core: scoring adapter, ranking, question generation,
// pipeline orchestration and output validation.
// All LLM calls go through the oracle traits, never the HTTP client directly.

pub mod handlers;
pub mod models;
pub mod oracle;
pub mod pipeline;
pub mod prompts;
pub mod questions;
pub mod ranking;
pub mod scoring;
pub mod validation;

#[cfg(test)]
pub mod testing;

pub use models::{AnalysisResult, ResumeDocument};
pub use pipeline::{Analyzer, PipelineError};
