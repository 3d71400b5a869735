//! Multipart intake for `POST /api/analyze`.
//!
//! Enforces file count, per-file size and MIME type before any network or LLM work.

use std::sync::LazyLock;

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use bytes::{Bytes, BytesMut};
use regex::Regex;
use reqwest::Url;
use thiserror::Error;
use tracing::debug;

pub const MAX_FILES: usize = 5;
pub const MAX_FILE_BYTES: usize = 10 * 1024 * 1024;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const DOC_MIME: &str = "application/msword";
const ALLOWED_MIME_TYPES: [&str; 3] = [PDF_MIME, DOCX_MIME, DOC_MIME];

const FILES_FIELD: &str = "resumes";
const JOB_URL_FIELD: &str = "jobUrl";
const EMAIL_FIELD: &str = "hiringManagerEmail";

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Job URL is required and must be a valid URL")]
    InvalidJobUrl,

    #[error("Hiring manager email must be a valid email address")]
    InvalidEmail,

    #[error("Please upload at least one resume file")]
    NoFiles,

    #[error("Maximum {MAX_FILES} resumes allowed")]
    TooManyFiles,

    #[error("Invalid file type. Only PDF, DOCX, and DOC files are allowed.")]
    UnsupportedType { file_name: String },

    #[error("File '{file_name}' exceeds the 10 MB limit")]
    FileTooLarge { file_name: String },

    #[error("Malformed upload: {0}")]
    Multipart(#[from] MultipartError),
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

/// A validated analysis request, ready for job fetch and text extraction.
#[derive(Debug)]
pub struct Submission {
    pub job_url: Url,
    pub notify_email: Option<String>,
    pub files: Vec<UploadedFile>,
}

/// Accumulates form fields in arrival order and validates them.
#[derive(Debug, Default)]
pub struct SubmissionBuilder {
    job_url: Option<String>,
    notify_email: Option<String>,
    files: Vec<UploadedFile>,
}

impl SubmissionBuilder {
    pub fn set_text(&mut self, name: &str, value: String) {
        match name {
            JOB_URL_FIELD => self.job_url = Some(value),
            EMAIL_FIELD => self.notify_email = Some(value),
            other => debug!("Ignoring unknown form field '{other}'"),
        }
    }

    /// Fails once the file limit has been reached, before the file body is read.
    pub fn reserve_file_slot(&self) -> Result<(), IntakeError> {
        if self.files.len() >= MAX_FILES {
            return Err(IntakeError::TooManyFiles);
        }
        Ok(())
    }

    /// Checks the declared type and names the file; the body is attached later.
    pub fn admit_file(
        &self,
        file_name: Option<&str>,
        content_type: Option<&str>,
    ) -> Result<(String, String), IntakeError> {
        self.reserve_file_slot()?;

        let file_name = file_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .unwrap_or_else(|| format!("resume-{}", self.files.len() + 1));

        let content_type = content_type
            .map(|ct| ct.split(';').next().unwrap_or_default().trim().to_ascii_lowercase())
            .filter(|ct| ALLOWED_MIME_TYPES.contains(&ct.as_str()))
            .ok_or_else(|| IntakeError::UnsupportedType {
                file_name: file_name.clone(),
            })?;

        Ok((file_name, content_type))
    }

    pub fn push_file(&mut self, file: UploadedFile) -> Result<(), IntakeError> {
        self.reserve_file_slot()?;
        if file.data.len() > MAX_FILE_BYTES {
            return Err(IntakeError::FileTooLarge {
                file_name: file.file_name,
            });
        }
        self.files.push(file);
        Ok(())
    }

    pub fn finish(self) -> Result<Submission, IntakeError> {
        let job_url = self
            .job_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .and_then(|url| Url::parse(url).ok())
            .ok_or(IntakeError::InvalidJobUrl)?;

        let notify_email = match self.notify_email.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(email) if EMAIL_PATTERN.is_match(email) => Some(email.to_string()),
            Some(_) => return Err(IntakeError::InvalidEmail),
        };

        if self.files.is_empty() {
            return Err(IntakeError::NoFiles);
        }

        Ok(Submission {
            job_url,
            notify_email,
            files: self.files,
        })
    }
}

/// Reads the whole multipart form. Stops at the first violation.
pub async fn read_submission(mut multipart: Multipart) -> Result<Submission, IntakeError> {
    let mut builder = SubmissionBuilder::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        if name == FILES_FIELD || field.file_name().is_some() {
            let (file_name, content_type) =
                builder.admit_file(field.file_name(), field.content_type())?;
            let data = read_capped(field, &file_name).await?;
            builder.push_file(UploadedFile {
                file_name,
                content_type,
                data,
            })?;
        } else {
            let value = field.text().await?;
            builder.set_text(&name, value);
        }
    }

    builder.finish()
}

async fn read_capped(mut field: Field<'_>, file_name: &str) -> Result<Bytes, IntakeError> {
    let mut buffer = BytesMut::new();
    while let Some(chunk) = field.chunk().await? {
        if buffer.len() + chunk.len() > MAX_FILE_BYTES {
            return Err(IntakeError::FileTooLarge {
                file_name: file_name.to_string(),
            });
        }
        buffer.extend_from_slice(&chunk);
    }
    Ok(buffer.freeze())
}
