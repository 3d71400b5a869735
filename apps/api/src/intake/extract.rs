//! Document text extraction for uploaded resumes (PDF, DOCX).
//!
//! Extraction is CPU-bound and pdf-extract may panic on malformed input, so every
//! file is decoded inside `tokio::task::spawn_blocking`.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;
use tokio::task::JoinError;
use tracing::warn;

use crate::intake::upload::{UploadedFile, DOCX_MIME, DOC_MIME, PDF_MIME};
use crate::screening::ResumeDocument;

const DOCX_BODY_PART: &str = "word/document.xml";

/// Upper bound on the decompressed `word/document.xml`. Uploads are capped
/// compressed, so this stops a small archive from inflating without limit.
pub const MAX_DOCX_BODY_BYTES: u64 = 32 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file type: {0}")]
    Unsupported(String),

    #[error("Could not read PDF '{file_name}': {message}")]
    Pdf { file_name: String, message: String },

    #[error("Could not read Word document '{file_name}': {message}")]
    Word { file_name: String, message: String },

    #[error("Text extraction did not complete: {0}")]
    Task(#[from] JoinError),
}

/// Extracts every file concurrently. Output order matches upload order.
pub async fn extract_all(files: Vec<UploadedFile>) -> Result<Vec<ResumeDocument>, ExtractError> {
    let handles: Vec<_> = files
        .into_iter()
        .map(|file| tokio::task::spawn_blocking(move || extract_document(&file)))
        .collect();

    let mut documents = Vec::with_capacity(handles.len());
    for handle in handles {
        documents.push(handle.await??);
    }
    Ok(documents)
}

/// Synchronous extraction of one uploaded file.
pub fn extract_document(file: &UploadedFile) -> Result<ResumeDocument, ExtractError> {
    let text = match file.content_type.as_str() {
        PDF_MIME => pdf_extract::extract_text_from_mem(&file.data).map_err(|e| ExtractError::Pdf {
            file_name: file.file_name.clone(),
            message: e.to_string(),
        })?,
        // Legacy .doc is only readable when it is really an OOXML package.
        DOCX_MIME | DOC_MIME => extract_docx_text(&file.data).map_err(|message| {
            ExtractError::Word {
                file_name: file.file_name.clone(),
                message,
            }
        })?,
        other => return Err(ExtractError::Unsupported(other.to_string())),
    };

    if text.trim().is_empty() {
        warn!(file_name = %file.file_name, "no text extracted from resume");
    }

    Ok(ResumeDocument::new(file.file_name.clone(), text))
}

/// Reads the paragraphs of a DOCX package's main document part.
pub fn extract_docx_text(data: &[u8]) -> Result<String, String> {
    let xml = read_docx_body(data, MAX_DOCX_BODY_BYTES)?;
    docx_xml_text(&xml)
}

/// Decompresses the main document part, refusing more than `max_bytes`.
/// The declared size is checked first; the read itself is capped too since
/// the header can understate it.
fn read_docx_body(data: &[u8], max_bytes: u64) -> Result<String, String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data)).map_err(|e| e.to_string())?;
    let part = archive.by_name(DOCX_BODY_PART).map_err(|e| e.to_string())?;
    if part.size() > max_bytes {
        return Err(format!(
            "{DOCX_BODY_PART} declares {} bytes, limit is {max_bytes}",
            part.size()
        ));
    }

    let mut xml = String::new();
    part.take(max_bytes + 1)
        .read_to_string(&mut xml)
        .map_err(|e| e.to_string())?;
    if xml.len() as u64 > max_bytes {
        return Err(format!("{DOCX_BODY_PART} exceeds {max_bytes} bytes"));
    }
    Ok(xml)
}

fn docx_xml_text(xml: &str) -> Result<String, String> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_run_text = true,
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_run_text = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => text.push('\t'),
                b"w:br" | b"w:cr" | b"w:p" => text.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_run_text => {
                text.push_str(&t.unescape().map_err(|e| e.to_string())?);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text.trim_end().to_string())
}
