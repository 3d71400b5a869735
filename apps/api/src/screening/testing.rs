//! Deterministic oracle fakes shared by the screening and route tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::llm_client::LlmError;
use crate::screening::oracle::{OracleError, QuestionOracle, ScoringOracle};

/// Replies per resume, matched by a marker substring of the resume text.
/// Resumes with no matching marker fail like an unreachable oracle.
#[derive(Default)]
pub struct ScriptedScoring {
    replies: Vec<(String, String)>,
    delays: HashMap<String, Duration>,
    calls: AtomicUsize,
    seen_lengths: Mutex<Vec<(usize, usize)>>,
}

impl ScriptedScoring {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, marker: &str, reply: &str) -> Self {
        self.replies.push((marker.to_string(), reply.to_string()));
        self
    }

    /// Scores `marker` with a well-formed reply.
    pub fn verdict(self, marker: &str, name: &str, score: i64) -> Self {
        let reply = format!(
            r#"{{"candidateName": "{name}", "score": {score}, "reasoning": "{name} fits"}}"#
        );
        self.reply(marker, &reply)
    }

    pub fn delay(mut self, marker: &str, delay: Duration) -> Self {
        self.delays.insert(marker.to_string(), delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Character counts of (job text, resume text) as received, per call.
    pub fn seen_lengths(&self) -> Vec<(usize, usize)> {
        self.seen_lengths.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScoringOracle for ScriptedScoring {
    async fn score(&self, job_text: &str, resume_text: &str) -> Result<String, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_lengths
            .lock()
            .unwrap()
            .push((job_text.chars().count(), resume_text.chars().count()));

        if let Some((_, delay)) = self
            .delays
            .iter()
            .find(|(marker, _)| resume_text.contains(marker.as_str()))
        {
            tokio::time::sleep(*delay).await;
        }

        self.replies
            .iter()
            .find(|(marker, _)| resume_text.contains(marker.as_str()))
            .map(|(_, reply)| reply.clone())
            .ok_or(OracleError::Llm(LlmError::Api {
                status: 503,
                message: "overloaded".to_string(),
            }))
    }
}

/// Returns one fixed reply (or failure) and records what it was asked.
pub struct ScriptedQuestions {
    reply: Option<String>,
    calls: AtomicUsize,
    last_request: Mutex<Option<(String, String, String)>>,
}

impl ScriptedQuestions {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn three_each() -> Self {
        Self::replying(
            r#"{"genericQuestions": ["G1", "G2", "G3"], "specificQuestions": ["S1", "S2", "S3"]}"#,
        )
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// (job text, resume text, candidate name) of the most recent call.
    pub fn last_request(&self) -> Option<(String, String, String)> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuestionOracle for ScriptedQuestions {
    async fn questions(
        &self,
        job_text: &str,
        resume_text: &str,
        candidate_name: &str,
    ) -> Result<String, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some((
            job_text.to_string(),
            resume_text.to_string(),
            candidate_name.to_string(),
        ));
        self.reply
            .clone()
            .ok_or(OracleError::Llm(LlmError::EmptyContent))
    }
}
