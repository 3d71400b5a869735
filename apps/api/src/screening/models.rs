use serde::{Deserialize, Serialize};

/// Name substituted when the oracle cannot identify the candidate.
pub const UNKNOWN_CANDIDATE: &str = "Candidate";

/// A resume after text extraction. Scoped to a single analysis request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeDocument {
    pub file_name: String,
    pub text: String,
}

impl ResumeDocument {
    pub fn new(file_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            text: text.into(),
        }
    }
}

/// One scoring outcome per uploaded resume, real or fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreVerdict {
    pub candidate_name: String,
    pub file_name: String,
    /// Always within 0..=100.
    pub score: u8,
    pub reasoning: String,
}

impl ScoreVerdict {
    /// Substituted when the scoring call itself fails.
    pub fn failed(file_name: impl Into<String>) -> Self {
        Self {
            candidate_name: UNKNOWN_CANDIDATE.to_string(),
            file_name: file_name.into(),
            score: 0,
            reasoning: "Analysis failed".to_string(),
        }
    }

    /// Substituted when the oracle replied but the reply could not be parsed.
    pub fn unparseable(file_name: impl Into<String>) -> Self {
        Self {
            candidate_name: UNKNOWN_CANDIDATE.to_string(),
            file_name: file_name.into(),
            score: 50,
            reasoning: "Unable to parse analysis".to_string(),
        }
    }
}

/// Screening bucket, a pure function of score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Interview,
    Backup,
    Eliminate,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::Interview => "interview",
            Category::Backup => "backup",
            Category::Eliminate => "eliminate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCandidate {
    pub candidate_name: String,
    pub file_name: String,
    pub score: u8,
    pub reasoning: String,
    pub category: Category,
    /// 1-based, dense, unique within one analysis.
    pub rank: u32,
    /// Position of the source resume in the upload. Used to find the resume text
    /// without relying on file names being unique.
    #[serde(skip)]
    pub upload_index: usize,
}

impl RankedCandidate {
    /// Drops the derived fields, giving back the verdict the ranking started from.
    pub fn to_verdict(&self) -> ScoreVerdict {
        ScoreVerdict {
            candidate_name: self.candidate_name.clone(),
            file_name: self.file_name.clone(),
            score: self.score,
            reasoning: self.reasoning.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreeningQuestionSet {
    pub generic_questions: Vec<String>,
    pub specific_questions: Vec<String>,
}

/// Terminal artifact of one analysis. Serialized as-is at the HTTP boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub candidates: Vec<RankedCandidate>,
    pub generic_questions: Vec<String>,
    pub specific_questions: Vec<String>,
    pub top_candidate_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_sent: Option<bool>,
}

impl AnalysisResult {
    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &RankedCandidate> {
        self.candidates
            .iter()
            .filter(move |c| c.category == category)
    }

    pub fn with_email_sent(self, sent: bool) -> Self {
        Self {
            email_sent: Some(sent),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, score: u8, category: Category, rank: u32) -> RankedCandidate {
        RankedCandidate {
            candidate_name: name.to_string(),
            file_name: format!("{name}.pdf"),
            score,
            reasoning: "ok".to_string(),
            category,
            rank,
            upload_index: 0,
        }
    }

    #[test]
    fn test_result_serializes_with_camel_case_fields() {
        let result = AnalysisResult {
            candidates: vec![candidate("Alice", 92, Category::Interview, 1)],
            generic_questions: vec!["g".to_string(); 3],
            specific_questions: vec!["s".to_string(); 3],
            top_candidate_name: "Alice".to_string(),
            email_sent: None,
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["topCandidateName"], "Alice");
        assert_eq!(value["candidates"][0]["candidateName"], "Alice");
        assert_eq!(value["candidates"][0]["fileName"], "Alice.pdf");
        assert_eq!(value["candidates"][0]["category"], "interview");
        assert_eq!(value["candidates"][0]["rank"], 1);
        assert!(value["candidates"][0].get("uploadIndex").is_none());
        assert!(value.get("emailSent").is_none());
    }

    #[test]
    fn test_email_flag_is_serialized_once_set() {
        let result = AnalysisResult {
            candidates: vec![],
            generic_questions: vec![],
            specific_questions: vec![],
            top_candidate_name: String::new(),
            email_sent: None,
        }
        .with_email_sent(false);

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["emailSent"], false);
    }

    #[test]
    fn test_sentinel_verdicts() {
        let failed = ScoreVerdict::failed("a.pdf");
        assert_eq!(failed.candidate_name, "Candidate");
        assert_eq!(failed.score, 0);
        assert_eq!(failed.reasoning, "Analysis failed");

        let neutral = ScoreVerdict::unparseable("a.pdf");
        assert_eq!(neutral.score, 50);
        assert_eq!(neutral.reasoning, "Unable to parse analysis");
    }

    #[test]
    fn test_in_category_filters() {
        let result = AnalysisResult {
            candidates: vec![
                candidate("A", 90, Category::Interview, 1),
                candidate("B", 70, Category::Backup, 2),
                candidate("C", 65, Category::Backup, 3),
            ],
            generic_questions: vec![],
            specific_questions: vec![],
            top_candidate_name: "A".to_string(),
            email_sent: None,
        };
        assert_eq!(result.in_category(Category::Backup).count(), 2);
        assert_eq!(result.in_category(Category::Eliminate).count(), 0);
    }
}
