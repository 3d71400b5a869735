//! HTML rendering of an analysis summary email.

use std::fmt::Write;

use html_escape::encode_text;

use crate::screening::models::{AnalysisResult, Category, RankedCandidate};

const STYLE: &str = "
    body { font-family: -apple-system, 'Segoe UI', Roboto, Arial, sans-serif; line-height: 1.6; color: #333; max-width: 800px; margin: 0 auto; padding: 20px; background-color: #f5f5f5; }
    .email-container { background-color: #ffffff; border-radius: 8px; padding: 40px; }
    h1 { color: #2563eb; font-size: 28px; }
    h2 { color: #1e40af; font-size: 22px; margin-top: 30px; border-bottom: 2px solid #e5e7eb; padding-bottom: 8px; }
    .summary { background-color: #eff6ff; border-left: 4px solid #2563eb; padding: 15px 20px; margin: 20px 0; }
    .summary-stat { display: inline-block; margin-right: 30px; }
    .candidate-card { background-color: #f9fafb; border: 1px solid #e5e7eb; border-radius: 6px; padding: 15px; margin-bottom: 12px; }
    .candidate-rank { font-weight: bold; margin-right: 12px; }
    .candidate-name { font-weight: 600; font-size: 18px; }
    .candidate-file { font-size: 14px; color: #6b7280; }
    .candidate-score { font-size: 24px; font-weight: bold; float: right; }
    .score-interview { color: #059669; }
    .score-backup { color: #d97706; }
    .score-eliminate { color: #dc2626; }
    .question-list li { border-left: 3px solid #2563eb; padding: 12px 16px; margin-bottom: 10px; list-style: none; }
    .empty { color: #6b7280; }
    .footer { margin-top: 40px; text-align: center; color: #6b7280; font-size: 14px; }
";

pub fn subject(result: &AnalysisResult) -> String {
    format!(
        "Resume Analysis Complete - {} Candidates Reviewed",
        result.candidates.len()
    )
}

fn section_heading(category: Category) -> &'static str {
    match category {
        Category::Interview => "Interview List (Score: 80+)",
        Category::Backup => "Backup List (Score: 60-79)",
        Category::Eliminate => "Eliminate List (Score: &lt;60)",
    }
}

pub fn render_html(result: &AnalysisResult) -> String {
    let mut html = String::new();
    let count = |category| result.in_category(category).count();

    // writing to a String cannot fail
    let _ = write!(
        html,
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><style>{STYLE}</style></head><body>\
         <div class=\"email-container\">\
         <h1>Resume Analysis Results</h1>\
         <p>Your candidate analysis is complete. Here are the results:</p>\
         <div class=\"summary\">\
         <div class=\"summary-stat\"><strong>{}</strong><br>Total Candidates</div>\
         <div class=\"summary-stat\"><strong>{}</strong><br>Interview Ready</div>\
         <div class=\"summary-stat\"><strong>{}</strong><br>Backup Options</div>\
         <div class=\"summary-stat\"><strong>{}</strong><br>Not Recommended</div>\
         </div>",
        result.candidates.len(),
        count(Category::Interview),
        count(Category::Backup),
        count(Category::Eliminate),
    );

    for category in [Category::Interview, Category::Backup, Category::Eliminate] {
        let _ = write!(html, "<h2>{}</h2>", section_heading(category));
        let mut any = false;
        for candidate in result.in_category(category) {
            any = true;
            html.push_str(&candidate_card(candidate));
        }
        if !any {
            html.push_str("<p class=\"empty\">No candidates in this category</p>");
        }
    }

    html.push_str("<h2>Phone Screening Questions</h2><h3>Generic Questions (All Candidates)</h3>");
    html.push_str(&question_list(&result.generic_questions));
    let _ = write!(
        html,
        "<h3>Specific Questions for {}</h3>",
        encode_text(&result.top_candidate_name)
    );
    html.push_str(&question_list(&result.specific_questions));

    html.push_str(
        "<div class=\"footer\"><p>Generated by Resume Screener</p></div></div></body></html>",
    );
    html
}

fn candidate_card(candidate: &RankedCandidate) -> String {
    format!(
        "<div class=\"candidate-card\">\
         <span class=\"candidate-score score-{category}\">{score}</span>\
         <span class=\"candidate-rank\">#{rank}</span>\
         <span class=\"candidate-name\">{name}</span>\
         <div class=\"candidate-file\">{file}</div>\
         </div>",
        category = candidate.category.label(),
        score = candidate.score,
        rank = candidate.rank,
        name = encode_text(&candidate.candidate_name),
        file = encode_text(&candidate.file_name),
    )
}

fn question_list(questions: &[String]) -> String {
    let items: String = questions
        .iter()
        .map(|q| format!("<li>{}</li>", encode_text(q)))
        .collect();
    format!("<ul class=\"question-list\">{items}</ul>")
}
