// Request intake: multipart upload validation, resume text extraction,
// and job posting retrieval. Everything here runs before the screening pipeline.

pub mod extract;
pub mod job_fetch;
pub mod upload;

pub use extract::{extract_all, ExtractError};
pub use job_fetch::{HttpJobFetcher, JobFetchError, JobTextSource};
pub use upload::{read_submission, IntakeError, Submission};
