//! Scoring adapter: turns one oracle call into exactly one `ScoreVerdict`.
//!
//! Unparseable replies yield the neutral verdict (score 50). Transport failures and
//! timeouts are reported to the pipeline, which substitutes the "Analysis failed"
//! sentinel (score 0).

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::llm_client::strip_json_fences;
use crate::screening::models::{ResumeDocument, ScoreVerdict, UNKNOWN_CANDIDATE};
use crate::screening::oracle::{bounded, OracleError, ScoringOracle};

/// Both texts are cut to this many characters before submission.
pub const MAX_PROMPT_CHARS: usize = 5000;

/// Score used when the reply parses but carries no usable score.
const NEUTRAL_SCORE: u8 = 50;

/// Returns the longest prefix of `text` holding at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Scores a single resume. One outbound call, no retry.
///
/// A failed or timed-out call is returned as `Err`; the caller substitutes
/// [`ScoreVerdict::failed`], so a reply that merely looks like the sentinel is
/// never counted as a failure.
pub async fn request_verdict(
    oracle: &dyn ScoringOracle,
    job_text: &str,
    resume: &ResumeDocument,
    limit: Duration,
) -> Result<ScoreVerdict, OracleError> {
    let job_text = truncate_chars(job_text, MAX_PROMPT_CHARS);
    let resume_text = truncate_chars(&resume.text, MAX_PROMPT_CHARS);

    match bounded(limit, oracle.score(job_text, resume_text)).await {
        Ok(reply) => Ok(parse_verdict(&reply, &resume.file_name)),
        Err(e) => {
            warn!(file_name = %resume.file_name, error = %e, "resume scoring failed");
            Err(e)
        }
    }
}

/// Parses the oracle's `{candidateName, score, reasoning}` reply.
pub fn parse_verdict(reply: &str, file_name: &str) -> ScoreVerdict {
    let parsed = serde_json::from_str::<Value>(strip_json_fences(reply));
    let fields = match parsed {
        Ok(Value::Object(fields)) => fields,
        Ok(other) => {
            warn!(file_name, "scoring reply is not a JSON object: {other}");
            return ScoreVerdict::unparseable(file_name);
        }
        Err(e) => {
            warn!(file_name, error = %e, "scoring reply is not valid JSON");
            return ScoreVerdict::unparseable(file_name);
        }
    };

    let candidate_name = fields
        .get("candidateName")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_CANDIDATE)
        .to_string();

    let score = match fields.get("score").and_then(score_value) {
        Some(raw) => clamp_score(raw),
        None => {
            debug!(file_name, "scoring reply has no numeric score");
            NEUTRAL_SCORE
        }
    };

    let reasoning = fields
        .get("reasoning")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string();

    ScoreVerdict {
        candidate_name,
        file_name: file_name.to_string(),
        score,
        reasoning,
    }
}

/// Accepts JSON numbers and numeric strings ("85").
fn score_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

/// Fractions are dropped, never rounded up, so 79.6 stays below the interview line.
fn clamp_score(raw: f64) -> u8 {
    raw.clamp(0.0, 100.0).floor() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::models::Category;
    use crate::screening::ranking::categorize;
    use crate::screening::testing::ScriptedScoring;

    const LIMIT: Duration = Duration::from_secs(30);

    #[test]
    fn test_parse_well_formed_reply() {
        let verdict = parse_verdict(
            r#"{"candidateName": "Alice Smith", "score": 92, "reasoning": "Strong Rust background"}"#,
            "alice.pdf",
        );
        assert_eq!(
            verdict,
            ScoreVerdict {
                candidate_name: "Alice Smith".to_string(),
                file_name: "alice.pdf".to_string(),
                score: 92,
                reasoning: "Strong Rust background".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_fenced_reply() {
        let verdict = parse_verdict(
            "```json\n{\"candidateName\": \"Bob\", \"score\": 65, \"reasoning\": \"ok\"}\n```",
            "bob.docx",
        );
        assert_eq!(verdict.candidate_name, "Bob");
        assert_eq!(verdict.score, 65);
    }

    #[test]
    fn test_parse_garbage_yields_neutral_verdict() {
        let verdict = parse_verdict("I think this candidate is great!", "x.pdf");
        assert_eq!(verdict, ScoreVerdict::unparseable("x.pdf"));
    }

    #[test]
    fn test_parse_non_object_yields_neutral_verdict() {
        assert_eq!(parse_verdict("[1, 2]", "x.pdf").score, 50);
        assert_eq!(parse_verdict("87", "x.pdf").reasoning, "Unable to parse analysis");
    }

    #[test]
    fn test_out_of_range_scores_are_clamped() {
        assert_eq!(parse_verdict(r#"{"score": 140}"#, "a.pdf").score, 100);
        assert_eq!(parse_verdict(r#"{"score": -12}"#, "a.pdf").score, 0);
        assert_eq!(parse_verdict(r#"{"score": 100.4}"#, "a.pdf").score, 100);
    }

    #[test]
    fn test_fractional_scores_keep_their_category() {
        let just_below_interview = parse_verdict(r#"{"score": 79.6}"#, "a.pdf");
        assert_eq!(just_below_interview.score, 79);
        assert_eq!(categorize(just_below_interview.score), Category::Backup);

        let just_below_backup = parse_verdict(r#"{"score": "59.99"}"#, "a.pdf");
        assert_eq!(just_below_backup.score, 59);
        assert_eq!(categorize(just_below_backup.score), Category::Eliminate);

        assert_eq!(parse_verdict(r#"{"score": 80.0}"#, "a.pdf").score, 80);
    }

    #[test]
    fn test_numeric_string_score_is_accepted() {
        assert_eq!(parse_verdict(r#"{"score": " 71 "}"#, "a.pdf").score, 71);
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let verdict = parse_verdict(r#"{"reasoning": "no score given"}"#, "a.pdf");
        assert_eq!(verdict.candidate_name, "Candidate");
        assert_eq!(verdict.score, 50);
        assert_eq!(verdict.reasoning, "no score given");

        let blank_name = parse_verdict(r#"{"candidateName": "  ", "score": "n/a"}"#, "a.pdf");
        assert_eq!(blank_name.candidate_name, "Candidate");
        assert_eq!(blank_name.score, 50);
        assert_eq!(blank_name.reasoning, "");
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("", 3), "");
        assert_eq!(truncate_chars("ééé", 3), "ééé");
    }

    #[tokio::test]
    async fn test_inputs_are_truncated_before_submission() {
        let oracle = ScriptedScoring::new().verdict("marker", "Long", 70);
        let job_text = "j".repeat(12_000);
        let resume = ResumeDocument::new("long.pdf", format!("marker {}", "é".repeat(9_000)));

        let verdict = request_verdict(&oracle, &job_text, &resume, LIMIT).await.unwrap();

        assert_eq!(verdict.score, 70);
        assert_eq!(oracle.seen_lengths(), vec![(MAX_PROMPT_CHARS, MAX_PROMPT_CHARS)]);
    }

    #[tokio::test]
    async fn test_oracle_failure_is_reported() {
        let oracle = ScriptedScoring::new();
        let resume = ResumeDocument::new("bob.pdf", "Bob's resume");

        let outcome = request_verdict(&oracle, "job", &resume, LIMIT).await;

        assert!(matches!(outcome, Err(OracleError::Llm(_))));
        assert_eq!(oracle.calls(), 1);
    }

    #[tokio::test]
    async fn test_request_verdict_separates_failure_from_lookalike_reply() {
        let oracle = ScriptedScoring::new().reply(
            "mimic",
            r#"{"candidateName": "Candidate", "score": 0, "reasoning": "Analysis failed"}"#,
        );
        let mimic = ResumeDocument::new("mimic.pdf", "mimic resume");
        let silent = ResumeDocument::new("silent.pdf", "no marker here");

        let reply = request_verdict(&oracle, "job", &mimic, LIMIT).await;
        assert_eq!(reply.unwrap(), ScoreVerdict::failed("mimic.pdf"));
        assert!(request_verdict(&oracle, "job", &silent, LIMIT).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_oracle_times_out() {
        let oracle = ScriptedScoring::new()
            .verdict("slow", "Slow", 99)
            .delay("slow", Duration::from_secs(120));
        let resume = ResumeDocument::new("slow.pdf", "slow resume");

        let outcome = request_verdict(&oracle, "job", &resume, Duration::from_secs(5)).await;

        assert!(matches!(outcome, Err(OracleError::TimedOut(_))));
    }
}
