//! Analysis pipeline: orchestrates one screening run.
//!
//! Flow: score every resume concurrently (barrier) → rank → questions for the
//! top candidate → pad questions → assemble.
//!
//! Per-resume and per-question failures never abort the run. The only fatal
//! condition is an empty resume set.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::screening::models::{AnalysisResult, ResumeDocument, ScoreVerdict};
use crate::screening::oracle::{QuestionOracle, ScoringOracle};
use crate::screening::questions::{generate_questions, normalize_questions};
use crate::screening::ranking::rank_candidates;
use crate::screening::scoring::request_verdict;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("at least one resume is required")]
    NoResumes,
}

/// Holds the injected oracles and the per-call deadline.
#[derive(Clone)]
pub struct Analyzer {
    scoring: Arc<dyn ScoringOracle>,
    questions: Arc<dyn QuestionOracle>,
    oracle_timeout: Duration,
}

impl Analyzer {
    pub fn new(
        scoring: Arc<dyn ScoringOracle>,
        questions: Arc<dyn QuestionOracle>,
        oracle_timeout: Duration,
    ) -> Self {
        Self {
            scoring,
            questions,
            oracle_timeout,
        }
    }

    /// Runs the full pipeline over resumes given in upload order.
    pub async fn analyze(
        &self,
        resumes: &[ResumeDocument],
        job_text: &str,
    ) -> Result<AnalysisResult, PipelineError> {
        if resumes.is_empty() {
            return Err(PipelineError::NoResumes);
        }

        // Step 1: concurrent scoring, joined before anything else runs
        let (verdicts, failed) = self.score_all(resumes, job_text).await;
        if failed == verdicts.len() {
            warn!(
                "Scoring failed for all {} resumes; continuing with zero scores",
                verdicts.len()
            );
        } else if failed > 0 {
            warn!("Scoring failed for {failed} of {} resumes", verdicts.len());
        }

        // Step 2: rank
        let candidates = rank_candidates(&verdicts);
        let top = &candidates[0];
        info!(
            "Ranked {} candidates; top is '{}' ({}/100)",
            candidates.len(),
            top.candidate_name,
            top.score
        );

        // Step 3: the top candidate's resume, located by upload position
        let top_resume = &resumes[top.upload_index];

        // Step 4 + 5: questions, then pad/cut to exactly three each
        let raw_questions = generate_questions(
            self.questions.as_ref(),
            job_text,
            &top_resume.text,
            &top.candidate_name,
            self.oracle_timeout,
        )
        .await;
        let questions = normalize_questions(raw_questions);

        // Step 6: assemble
        let top_candidate_name = top.candidate_name.clone();
        Ok(AnalysisResult {
            candidates,
            generic_questions: questions.generic_questions,
            specific_questions: questions.specific_questions,
            top_candidate_name,
            email_sent: None,
        })
    }

    /// Scores every resume on its own task and returns verdicts in upload order,
    /// plus how many of them are failure sentinels.
    /// A task that dies without reporting still yields the failure sentinel.
    async fn score_all(
        &self,
        resumes: &[ResumeDocument],
        job_text: &str,
    ) -> (Vec<ScoreVerdict>, usize) {
        let job_text: Arc<str> = Arc::from(job_text);
        let mut join_set = JoinSet::new();

        for (index, resume) in resumes.iter().enumerate() {
            let oracle = Arc::clone(&self.scoring);
            let job_text = Arc::clone(&job_text);
            let resume = resume.clone();
            let limit = self.oracle_timeout;
            join_set.spawn(async move {
                let verdict = request_verdict(oracle.as_ref(), &job_text, &resume, limit).await;
                (index, verdict.ok())
            });
        }

        let mut slots: Vec<Option<ScoreVerdict>> = vec![None; resumes.len()];
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, verdict)) => slots[index] = verdict,
                Err(e) => warn!("Scoring task did not complete: {e}"),
            }
        }

        let failed = slots.iter().filter(|slot| slot.is_none()).count();
        let verdicts = slots
            .into_iter()
            .zip(resumes)
            .map(|(slot, resume)| slot.unwrap_or_else(|| ScoreVerdict::failed(&resume.file_name)))
            .collect();
        (verdicts, failed)
    }
}
