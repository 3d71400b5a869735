//! Output contract checks for `AnalysisResult`.
//!
//! Violations are logged and the result is still returned: scores and ranks are
//! usually correct even when an edge case breaks a strict shape rule.

use std::fmt;

use tracing::warn;

use crate::screening::models::AnalysisResult;
use crate::screening::questions::QUESTIONS_PER_KIND;
use crate::screening::ranking::categorize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeViolation {
    NoCandidates,
    QuestionCount { kind: &'static str, found: usize },
    BlankQuestion { kind: &'static str, index: usize },
    ScoreOutOfRange { file_name: String, score: u8 },
    CategoryMismatch { file_name: String },
    RankSequence { position: usize, rank: u32 },
    TopCandidateMismatch { expected: String, found: String },
}

impl fmt::Display for ShapeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeViolation::NoCandidates => write!(f, "result has no candidates"),
            ShapeViolation::QuestionCount { kind, found } => {
                write!(f, "expected {QUESTIONS_PER_KIND} {kind} questions, found {found}")
            }
            ShapeViolation::BlankQuestion { kind, index } => {
                write!(f, "{kind} question #{index} is blank")
            }
            ShapeViolation::ScoreOutOfRange { file_name, score } => {
                write!(f, "score {score} for '{file_name}' is outside 0..=100")
            }
            ShapeViolation::CategoryMismatch { file_name } => {
                write!(f, "category of '{file_name}' does not match its score")
            }
            ShapeViolation::RankSequence { position, rank } => {
                write!(f, "candidate at position {position} has rank {rank}")
            }
            ShapeViolation::TopCandidateMismatch { expected, found } => {
                write!(f, "top candidate is '{found}' but rank 1 is '{expected}'")
            }
        }
    }
}

/// Lists every way `result` departs from the declared output shape.
pub fn check_result(result: &AnalysisResult) -> Vec<ShapeViolation> {
    let mut violations = Vec::new();

    if result.candidates.is_empty() {
        violations.push(ShapeViolation::NoCandidates);
    }

    for (kind, questions) in [
        ("generic", &result.generic_questions),
        ("specific", &result.specific_questions),
    ] {
        if questions.len() != QUESTIONS_PER_KIND {
            violations.push(ShapeViolation::QuestionCount {
                kind,
                found: questions.len(),
            });
        }
        for (index, question) in questions.iter().enumerate() {
            if question.trim().is_empty() {
                violations.push(ShapeViolation::BlankQuestion { kind, index });
            }
        }
    }

    for (position, candidate) in result.candidates.iter().enumerate() {
        if candidate.score > 100 {
            violations.push(ShapeViolation::ScoreOutOfRange {
                file_name: candidate.file_name.clone(),
                score: candidate.score,
            });
        }
        if categorize(candidate.score) != candidate.category {
            violations.push(ShapeViolation::CategoryMismatch {
                file_name: candidate.file_name.clone(),
            });
        }
        if candidate.rank as usize != position + 1 {
            violations.push(ShapeViolation::RankSequence {
                position,
                rank: candidate.rank,
            });
        }
    }

    if let Some(top) = result.candidates.first() {
        if top.candidate_name != result.top_candidate_name {
            violations.push(ShapeViolation::TopCandidateMismatch {
                expected: top.candidate_name.clone(),
                found: result.top_candidate_name.clone(),
            });
        }
    }

    violations
}

/// Checks the result, logs each discrepancy, and hands the result back unchanged.
pub fn validate_and_pass_through(result: AnalysisResult) -> AnalysisResult {
    let violations = check_result(&result);
    if !violations.is_empty() {
        warn!(
            count = violations.len(),
            "analysis result failed shape validation; returning partial result"
        );
        for violation in &violations {
            warn!("  {violation}");
        }
    }
    result
}
