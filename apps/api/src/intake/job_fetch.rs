//! Job posting fetcher: SSRF-checked GET of a public URL, reduced to plain text.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use reqwest::redirect::Policy;
use reqwest::{Client, Response, Url};
use scraper::{Html, Selector};
use thiserror::Error;
use tracing::{info, warn};

use crate::screening::scoring::truncate_chars;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; ResumeScreener/1.0)";
const MAX_REDIRECTS: usize = 5;
/// Pages with less text than this are assumed not to hold a job description.
const MIN_JOB_TEXT_CHARS: usize = 50;
pub const MAX_JOB_TEXT_CHARS: usize = 10_000;
/// Bytes of HTML read from a job page; anything past this is never downloaded.
pub const MAX_JOB_PAGE_BYTES: usize = 2 * 1024 * 1024;

/// Subtrees dropped before collecting page text.
const SKIPPED_ELEMENTS: [&str; 6] = ["script", "style", "nav", "header", "footer", "noscript"];

#[derive(Debug, Error)]
pub enum JobFetchError {
    #[error("Invalid or unsafe URL. Please provide a valid public job posting URL.")]
    UnsafeUrl,

    #[error("Request timeout. The job description URL took too long to respond.")]
    Timeout,

    #[error("Failed to fetch job description: HTTP {0}")]
    Status(u16),

    #[error("Failed to fetch job description from URL: {0}")]
    Http(reqwest::Error),

    #[error("Could not extract meaningful content from the URL. Please ensure the URL contains a job description.")]
    NoContent,
}

impl From<reqwest::Error> for JobFetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            JobFetchError::Timeout
        } else {
            JobFetchError::Http(e)
        }
    }
}

/// Resolves a job posting URL to plain job text.
#[async_trait]
pub trait JobTextSource: Send + Sync {
    async fn fetch_job_text(&self, url: &Url) -> Result<String, JobFetchError>;
}

pub struct HttpJobFetcher {
    client: Client,
}

impl HttpJobFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let redirects = Policy::custom(|attempt| {
            if attempt.previous().len() >= MAX_REDIRECTS {
                attempt.error("too many redirects")
            } else if is_public_url(attempt.url()) {
                attempt.follow()
            } else {
                attempt.error("redirect to a non-public address")
            }
        });

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .redirect(redirects)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl JobTextSource for HttpJobFetcher {
    async fn fetch_job_text(&self, url: &Url) -> Result<String, JobFetchError> {
        if !is_public_url(url) || !resolves_publicly(url).await {
            return Err(JobFetchError::UnsafeUrl);
        }

        info!("Fetching job posting: {url}");
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(JobFetchError::Status(status.as_u16()));
        }

        let html = read_page(response, MAX_JOB_PAGE_BYTES).await?;
        let text = page_text(&html);
        if text.chars().count() < MIN_JOB_TEXT_CHARS {
            return Err(JobFetchError::NoContent);
        }

        Ok(truncate_chars(&text, MAX_JOB_TEXT_CHARS).to_string())
    }
}

/// Reads at most `max_bytes` of the body, chunk by chunk. A longer page is cut
/// short rather than rejected; only its leading text is used anyway.
async fn read_page(mut response: Response, max_bytes: usize) -> Result<String, JobFetchError> {
    if response.content_length().is_some_and(|len| len > max_bytes as u64) {
        warn!(url = %response.url(), "job page is larger than {max_bytes} bytes; reading a prefix");
    }

    let mut buffer = BytesMut::new();
    while let Some(chunk) = response.chunk().await? {
        let room = max_bytes - buffer.len();
        if chunk.len() >= room {
            buffer.extend_from_slice(&chunk[..room]);
            break;
        }
        buffer.extend_from_slice(&chunk);
    }
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Static URL check: http(s) only, no localhost, loopback, private,
/// link-local, unique-local or unspecified literal addresses.
pub fn is_public_url(url: &Url) -> bool {
    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }
    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host
        .trim_start_matches('[')
        .trim_end_matches(']')
        .to_ascii_lowercase();

    if host == "localhost" || host.ends_with(".localhost") {
        return false;
    }

    match host.parse::<IpAddr>() {
        Ok(ip) => is_public_ip(ip),
        Err(_) => true,
    }
}

pub fn is_public_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            !(v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local()
                || v4.is_unspecified()
                || v4.is_broadcast()
                || v4.octets()[0] == 0)
        }
        IpAddr::V6(v6) => {
            if let Some(mapped) = v6.to_ipv4_mapped() {
                return is_public_ip(IpAddr::V4(mapped));
            }
            let first = v6.segments()[0];
            !(v6.is_loopback()
                || v6.is_unspecified()
                || (first & 0xfe00) == 0xfc00
                || (first & 0xffc0) == 0xfe80)
        }
    }
}

/// Every address the host name resolves to must be public.
async fn resolves_publicly(url: &Url) -> bool {
    let (Some(host), Some(port)) = (url.host_str(), url.port_or_known_default()) else {
        return false;
    };
    let host = host.trim_start_matches('[').trim_end_matches(']');

    match tokio::net::lookup_host((host, port)).await {
        Ok(addrs) => {
            let addrs: Vec<_> = addrs.collect();
            !addrs.is_empty() && addrs.iter().all(|addr| is_public_ip(addr.ip()))
        }
        // unresolvable hosts fail later with a transport error
        Err(_) => true,
    }
}

/// Visible text of `<body>` with boilerplate subtrees removed and whitespace collapsed.
pub fn page_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let root = Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next())
        .unwrap_or_else(|| document.root_element());

    let mut raw = String::new();
    for node in root.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let skipped = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| SKIPPED_ELEMENTS.contains(&el.name()))
        });
        if !skipped {
            raw.push_str(text);
            raw.push(' ');
        }
    }

    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
