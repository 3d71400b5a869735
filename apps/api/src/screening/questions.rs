//! Screening questions: one best-effort oracle call for the top candidate, then
//! padding so the output always carries exactly three questions of each kind.

use std::time::Duration;

use serde_json::Value;
use tracing::warn;

use crate::llm_client::strip_json_fences;
use crate::screening::models::ScreeningQuestionSet;
use crate::screening::oracle::{bounded, QuestionOracle};
use crate::screening::scoring::{truncate_chars, MAX_PROMPT_CHARS};

pub const QUESTIONS_PER_KIND: usize = 3;

pub const GENERIC_FILLER: &str = "Tell me about your experience relevant to this role.";
pub const SPECIFIC_FILLER: &str = "Can you elaborate on your background mentioned in your resume?";

/// Best-effort question generation. Any failure yields two empty lists.
pub async fn generate_questions(
    oracle: &dyn QuestionOracle,
    job_text: &str,
    top_resume_text: &str,
    top_candidate_name: &str,
    limit: Duration,
) -> ScreeningQuestionSet {
    let job_text = truncate_chars(job_text, MAX_PROMPT_CHARS);
    let resume_text = truncate_chars(top_resume_text, MAX_PROMPT_CHARS);

    match bounded(
        limit,
        oracle.questions(job_text, resume_text, top_candidate_name),
    )
    .await
    {
        Ok(reply) => parse_questions(&reply),
        Err(e) => {
            warn!(error = %e, "screening question generation failed");
            ScreeningQuestionSet::default()
        }
    }
}

/// Lenient parse: a field that is not an array of strings counts as empty;
/// over-long lists are cut to three.
pub fn parse_questions(reply: &str) -> ScreeningQuestionSet {
    let value = match serde_json::from_str::<Value>(strip_json_fences(reply)) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "question reply is not valid JSON");
            return ScreeningQuestionSet::default();
        }
    };

    ScreeningQuestionSet {
        generic_questions: string_list(value.get("genericQuestions")),
        specific_questions: string_list(value.get("specificQuestions")),
    }
}

fn string_list(field: Option<&Value>) -> Vec<String> {
    let Some(items) = field.and_then(Value::as_array) else {
        return Vec::new();
    };
    let strings: Option<Vec<String>> = items
        .iter()
        .map(|item| item.as_str().map(String::from))
        .collect();
    let mut strings = strings.unwrap_or_default();
    strings.truncate(QUESTIONS_PER_KIND);
    strings
}

/// Pads each list with its filler question, then cuts it to exactly three.
pub fn normalize_questions(set: ScreeningQuestionSet) -> ScreeningQuestionSet {
    ScreeningQuestionSet {
        generic_questions: pad_to_three(set.generic_questions, GENERIC_FILLER),
        specific_questions: pad_to_three(set.specific_questions, SPECIFIC_FILLER),
    }
}

fn pad_to_three(mut questions: Vec<String>, filler: &str) -> Vec<String> {
    questions.retain(|q| !q.trim().is_empty());
    questions.resize(QUESTIONS_PER_KIND.max(questions.len()), filler.to_string());
    questions.truncate(QUESTIONS_PER_KIND);
    questions
}
