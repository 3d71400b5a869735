// All LLM prompt constants for the screening module.

/// System prompt for scoring one resume against a job description.
pub const SCORING_SYSTEM: &str = "You are an expert recruiter analyzing resumes against job descriptions.
Your task is to:
1. Extract the candidate's name from the resume (if not found, use \"Candidate\")
2. Score the resume from 0-100 based on how well it matches the job requirements
3. Provide brief reasoning for the score

Return ONLY valid JSON in this exact format:
{
  \"candidateName\": \"Full Name\",
  \"score\": 85,
  \"reasoning\": \"Brief explanation\"
}";

/// System prompt for phone-screen question generation.
pub const QUESTIONS_SYSTEM: &str = "You are an expert recruiter creating phone screening questions.
Generate exactly 6 questions:
- 3 generic questions applicable to all candidates for this role
- 3 specific questions tailored to the top candidate's experience

Return ONLY valid JSON in this exact format:
{
  \"genericQuestions\": [\"question 1\", \"question 2\", \"question 3\"],
  \"specificQuestions\": [\"question 1\", \"question 2\", \"question 3\"]
}";

/// Low temperature keeps scores stable across runs.
pub const SCORING_TEMPERATURE: f32 = 0.3;
pub const QUESTIONS_TEMPERATURE: f32 = 0.7;

/// Scoring user prompt. Inputs are inserted verbatim; braces in them are not placeholders.
pub fn build_scoring_prompt(job_text: &str, resume_text: &str) -> String {
    format!("Job Description:\n{job_text}\n\nResume:\n{resume_text}")
}

/// Question user prompt for the top candidate.
pub fn build_questions_prompt(job_text: &str, resume_text: &str, candidate_name: &str) -> String {
    format!(
        "Job Description:\n{job_text}\n\n\
         Top Candidate: {candidate_name}\n\
         Top Candidate Resume:\n{resume_text}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoring_prompt_places_both_texts() {
        let prompt = build_scoring_prompt("Rust engineer", "Jane Doe, 8 years Rust");
        assert!(prompt.starts_with("Job Description:\nRust engineer"));
        assert!(prompt.ends_with("Resume:\nJane Doe, 8 years Rust"));
    }

    #[test]
    fn test_questions_prompt_names_candidate() {
        let prompt = build_questions_prompt("JD", "resume body", "Jane Doe");
        assert!(prompt.contains("Top Candidate: Jane Doe"));
        assert!(prompt.contains("Top Candidate Resume:\nresume body"));
    }

    #[test]
    fn test_placeholder_text_in_inputs_is_left_alone() {
        let prompt = build_scoring_prompt("Apply at {resume_text} today", "RESUME_BODY");
        assert_eq!(
            prompt,
            "Job Description:\nApply at {resume_text} today\n\nResume:\nRESUME_BODY"
        );

        let prompt = build_questions_prompt("JD {candidate_name}", "resume body", "{resume_text}");
        assert_eq!(
            prompt,
            "Job Description:\nJD {candidate_name}\n\nTop Candidate: {resume_text}\nTop Candidate Resume:\nresume body"
        );
    }
}
