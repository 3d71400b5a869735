use std::sync::Arc;
use std::time::Duration;

use crate::intake::JobTextSource;
use crate::notify::Notifier;
use crate::screening::Analyzer;
use crate::store::AnalysisStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Screening pipeline with its injected scoring and question oracles.
    pub analyzer: Analyzer,
    pub job_source: Arc<dyn JobTextSource>,
    pub notifier: Arc<dyn Notifier>,
    /// Deadline for one analysis email; the response waits at most this long on it.
    pub notify_timeout: Duration,
    pub store: AnalysisStore,
    /// Always copied on analysis emails when set.
    pub default_recipient: Option<String>,
}
