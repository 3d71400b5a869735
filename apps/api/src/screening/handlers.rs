//! Axum route handlers for the Screening API.

use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::intake::{extract_all, read_submission};
use crate::notify::{deliver, recipients};
use crate::screening::validation::validate_and_pass_through;
use crate::state::AppState;
use crate::store::StoredAnalysis;

/// POST /api/analyze
///
/// Full screening run: intake → job fetch → text extraction → pipeline → email →
/// validation → cache. Input problems are rejected before any LLM call.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let submission = read_submission(multipart).await?;
    info!(
        "Analysis requested: {} resume(s), job {}",
        submission.files.len(),
        submission.job_url
    );

    let job_text = state
        .job_source
        .fetch_job_text(&submission.job_url)
        .await?;

    let resumes = extract_all(submission.files).await?;

    let result = state.analyzer.analyze(&resumes, &job_text).await?;

    let to = recipients(
        state.default_recipient.as_deref(),
        submission.notify_email.as_deref(),
    );
    let email_sent = !to.is_empty()
        && deliver(state.notifier.as_ref(), &to, &result, state.notify_timeout).await;

    let result = validate_and_pass_through(result.with_email_sent(email_sent));
    let id = state.store.save(result.clone());
    info!("Analysis {id} complete; top candidate '{}'", result.top_candidate_name);

    Ok((
        [(header::LOCATION, format!("/api/analyses/{id}"))],
        Json(result),
    ))
}

/// GET /api/analyses/:id
///
/// Returns a cached analysis while it is still held in memory.
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StoredAnalysis>, AppError> {
    let stored = state
        .store
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("Analysis {id} not found")))?;
    Ok(Json(stored.as_ref().clone()))
}
