//! Notifier: emails the finished analysis. Never blocks or fails the analysis:
//! the outcome only sets `emailSent`.

pub mod email;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::screening::AnalysisResult;

const RESEND_API_URL: &str = "https://api.resend.com/emails";

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("email delivery is not configured")]
    Disabled,

    #[error("no recipients")]
    NoRecipients,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("email API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("no response from email API within {0:?}")]
    TimedOut(Duration),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_analysis(
        &self,
        recipients: &[String],
        result: &AnalysisResult,
    ) -> Result<(), NotifyError>;
}

/// Sends the result and reports success as a flag. Failures are logged, never raised,
/// and a send that outlives `limit` is abandoned.
pub async fn deliver(
    notifier: &dyn Notifier,
    recipients: &[String],
    result: &AnalysisResult,
    limit: Duration,
) -> bool {
    let outcome = tokio::time::timeout(limit, notifier.send_analysis(recipients, result))
        .await
        .unwrap_or(Err(NotifyError::TimedOut(limit)));

    match outcome {
        Ok(()) => {
            info!("Analysis email sent to {} recipient(s)", recipients.len());
            true
        }
        Err(NotifyError::Disabled) => false,
        Err(e) => {
            warn!(error = %e, "analysis email not sent");
            false
        }
    }
}

/// The configured default recipient plus the requester's address, without duplicates.
pub fn recipients(default_recipient: Option<&str>, requested: Option<&str>) -> Vec<String> {
    let mut list: Vec<String> = Vec::new();
    for address in [default_recipient, requested].into_iter().flatten() {
        let address = address.trim();
        if !address.is_empty() && !list.iter().any(|a| a.eq_ignore_ascii_case(address)) {
            list.push(address.to_string());
        }
    }
    list
}

/// Used when no email provider is configured.
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    async fn send_analysis(
        &self,
        _recipients: &[String],
        _result: &AnalysisResult,
    ) -> Result<(), NotifyError> {
        Err(NotifyError::Disabled)
    }
}

#[derive(Debug, Serialize)]
struct ResendEmail<'a> {
    from: &'a str,
    to: &'a [String],
    subject: String,
    html: String,
}

/// Delivery through the Resend HTTP API.
pub struct ResendNotifier {
    client: Client,
    api_key: String,
    from: String,
}

impl ResendNotifier {
    pub fn new(client: Client, api_key: String, from: String) -> Self {
        Self {
            client,
            api_key,
            from,
        }
    }
}

#[async_trait]
impl Notifier for ResendNotifier {
    async fn send_analysis(
        &self,
        recipients: &[String],
        result: &AnalysisResult,
    ) -> Result<(), NotifyError> {
        if recipients.is_empty() {
            return Err(NotifyError::NoRecipients);
        }

        let body = ResendEmail {
            from: &self.from,
            to: recipients,
            subject: email::subject(result),
            html: email::render_html(result),
        };

        let response = self
            .client
            .post(RESEND_API_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(NotifyError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}
