//! Oracle seams: the two external LLM calls the pipeline depends on.
//!
//! The pipeline holds `Arc<dyn ScoringOracle>` and `Arc<dyn QuestionOracle>`, so tests
//! substitute deterministic fakes. Implementations only transport text: truncation,
//! parsing and fallbacks live in `scoring` and `questions`.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{LlmClient, LlmError};
use crate::screening::prompts::{
    build_questions_prompt, build_scoring_prompt, QUESTIONS_SYSTEM, QUESTIONS_TEMPERATURE,
    SCORING_SYSTEM, SCORING_TEMPERATURE,
};

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("no reply within {0:?}")]
    TimedOut(Duration),
}

/// Scores one resume. Returns the oracle's raw reply.
#[async_trait]
pub trait ScoringOracle: Send + Sync {
    async fn score(&self, job_text: &str, resume_text: &str) -> Result<String, OracleError>;
}

/// Generates screening questions for the top candidate. Returns the oracle's raw reply.
#[async_trait]
pub trait QuestionOracle: Send + Sync {
    async fn questions(
        &self,
        job_text: &str,
        resume_text: &str,
        candidate_name: &str,
    ) -> Result<String, OracleError>;
}

/// Runs one oracle call under a deadline. Expiry is reported like any other failure.
pub async fn bounded<F>(limit: Duration, call: F) -> Result<String, OracleError>
where
    F: Future<Output = Result<String, OracleError>>,
{
    tokio::time::timeout(limit, call)
        .await
        .unwrap_or(Err(OracleError::TimedOut(limit)))
}

/// Scoring via Claude.
pub struct LlmScoringOracle(pub LlmClient);

#[async_trait]
impl ScoringOracle for LlmScoringOracle {
    async fn score(&self, job_text: &str, resume_text: &str) -> Result<String, OracleError> {
        let system = format!("{SCORING_SYSTEM}\n\n{JSON_ONLY_INSTRUCTION}");
        let prompt = build_scoring_prompt(job_text, resume_text);
        Ok(self
            .0
            .call_text(&prompt, &system, SCORING_TEMPERATURE)
            .await?)
    }
}

/// Question generation via Claude.
pub struct LlmQuestionOracle(pub LlmClient);

#[async_trait]
impl QuestionOracle for LlmQuestionOracle {
    async fn questions(
        &self,
        job_text: &str,
        resume_text: &str,
        candidate_name: &str,
    ) -> Result<String, OracleError> {
        let system = format!("{QUESTIONS_SYSTEM}\n\n{JSON_ONLY_INSTRUCTION}");
        let prompt = build_questions_prompt(job_text, resume_text, candidate_name);
        Ok(self
            .0
            .call_text(&prompt, &system, QUESTIONS_TEMPERATURE)
            .await?)
    }
}
