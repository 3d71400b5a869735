mod config;
mod errors;
mod intake;
mod llm_client;
mod notify;
mod routes;
mod screening;
mod state;
mod store;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::intake::HttpJobFetcher;
use crate::llm_client::LlmClient;
use crate::notify::{DisabledNotifier, Notifier, ResendNotifier};
use crate::routes::build_router;
use crate::screening::oracle::{LlmQuestionOracle, LlmScoringOracle};
use crate::screening::Analyzer;
use crate::state::AppState;
use crate::store::AnalysisStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Screener API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client; both oracles share its connection pool
    let llm = LlmClient::new(config.anthropic_api_key.clone(), config.llm_timeout)
        .context("Failed to build LLM client")?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let analyzer = Analyzer::new(
        Arc::new(LlmScoringOracle(llm.clone())),
        Arc::new(LlmQuestionOracle(llm)),
        config.llm_timeout,
    );

    let job_source = HttpJobFetcher::new(config.job_fetch_timeout)
        .context("Failed to build job posting fetcher")?;

    let notifier: Arc<dyn Notifier> = match &config.email {
        Some(email) => {
            info!("Email notifications enabled (from: {})", email.from);
            let client = reqwest::Client::builder()
                .timeout(config.notify_timeout)
                .build()
                .context("Failed to build email client")?;
            Arc::new(ResendNotifier::new(
                client,
                email.resend_api_key.clone(),
                email.from.clone(),
            ))
        }
        None => {
            info!("Email notifications disabled: RESEND_API_KEY / NOTIFY_FROM_EMAIL not set");
            Arc::new(DisabledNotifier)
        }
    };

    // Build app state
    let state = AppState {
        analyzer,
        job_source: Arc::new(job_source),
        notifier,
        notify_timeout: config.notify_timeout,
        store: AnalysisStore::new(config.result_ttl),
        default_recipient: config.default_recipient.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
