// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `herald serve` command implementation.
//!
//! Loads the content store, connects the Gemini provider, wires the
//! orchestrator into the gateway and serves until SIGINT or SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use herald_agent::shutdown;
use herald_agent::{Orchestrator, OrchestratorSettings, PromptBuilder};
use herald_config::HeraldConfig;
use herald_config::model::ObservabilityConfig;
use herald_content::ContentStore;
use herald_core::{HeraldError, PluginAdapter};
use herald_gateway::{GatewayState, build_router, serve};
use herald_gemini::GeminiProvider;
use tracing::{info, warn};

/// How long open streams may run after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// Runs the `herald serve` command.
pub async fn run_serve(config: HeraldConfig) -> Result<(), HeraldError> {
    init_tracing(&config.observability);

    info!(
        port = config.server.port,
        environment = %config.server.environment,
        build_sha = %config.server.build_sha,
        "starting herald"
    );

    let content = Arc::new(ContentStore::open(&config.content.dir)?);

    let provider = Arc::new(GeminiProvider::new(
        &config.provider,
        config.stream.request_timeout(),
    )?);

    let orchestrator = Orchestrator::new(
        provider.clone(),
        content.clone(),
        PromptBuilder::new(config.subject.clone()),
        OrchestratorSettings::from(&config.stream),
    );

    let state = GatewayState::new(Arc::new(orchestrator), content, &config);
    let router = build_router(state, &config)?;

    let cancel = shutdown::install_signal_handler();
    let serving = serve(&config.server, router, cancel.clone());
    tokio::pin!(serving);

    tokio::select! {
        result = &mut serving => result?,
        _ = grace_elapsed(cancel) => {
            warn!(grace_secs = SHUTDOWN_GRACE.as_secs(), "shutdown grace elapsed, dropping open streams");
        }
    }

    provider.shutdown().await?;
    info!("herald shutdown complete");
    Ok(())
}

async fn grace_elapsed(cancel: tokio_util::sync::CancellationToken) {
    cancel.cancelled().await;
    tokio::time::sleep(SHUTDOWN_GRACE).await;
}

/// Initializes the tracing subscriber. `RUST_LOG` overrides the configured level.
fn init_tracing(config: &ObservabilityConfig) {
    use tracing_subscriber::EnvFilter;

    let level = &config.log_level;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("herald={level},tower_http={level},warn")));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false);

    if config.json {
        builder.json().flatten_event(true).init();
    } else {
        builder.init();
    }
}
