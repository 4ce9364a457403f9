//! Scaling control loop sidecar.
//!
//! Translates manual API calls, CloudWatch alarms, and Prometheus
//! Alertmanager alerts into declarative stack config updates and drives a
//! targeted re-convergence of the affected resource.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use sc_config::RuleLoader;
use sc_engine::{intent_bus, Engine};
use sc_orchestrator::{PulumiCliOrchestrator, StateManager};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Scaling control loop sidecar
#[derive(Parser, Debug)]
#[command(name = "sc-server")]
#[command(about = "Translates scaling webhooks into targeted Pulumi stack convergences")]
struct Args {
    /// Pulumi stack name to read rules from and apply convergences against
    #[arg(long, env = "SCALE_STACK", default_value = "dev")]
    stack: String,

    /// Working directory containing the Pulumi project
    #[arg(long, env = "SCALE_WORKDIR", default_value = ".")]
    workdir: String,

    /// HTTP port to listen on
    #[arg(long, env = "SCALE_PORT", default_value = "8080")]
    port: u16,

    /// Enable debug-level logging
    #[arg(long, env = "SCALE_DEBUG")]
    debug: bool,

    /// Bearer token webhook callers must present. When unset, webhook
    /// routes are unauthenticated.
    #[arg(long, env = "SCALE_AUTH_TOKEN")]
    auth_token: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let default_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .init();

    info!(stack = %args.stack, workdir = %args.workdir, port = args.port, "starting scale-sidecar");

    let orchestrator = PulumiCliOrchestrator::new(args.stack.clone(), args.workdir.clone());
    let rules = Arc::new(RuleLoader::new(&orchestrator).load_rules_or_warn().await);
    info!(rule_count = rules.len(), "loaded scaling rules");

    let state_manager = StateManager::new(orchestrator);
    let (intent_tx, intent_rx) = intent_bus();
    let cancel = CancellationToken::new();

    let mut engine = Engine::new(rules, state_manager, intent_rx, cancel.clone());
    let engine_handle = tokio::spawn(async move { engine.run().await });

    let app_state = sc_api::AppState::new(intent_tx, args.auth_token);
    let app = sc_api::create_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    let server_cancel = cancel.clone();
    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { server_cancel.cancelled().await })
            .await
            .expect("server error");
    });

    shutdown_signal().await;
    info!("shutdown signal received, draining");

    cancel.cancel();
    // with_graceful_shutdown stops accepting new connections and lets
    // in-flight ones finish; cap the wait the same way the Go original
    // bounds srv.Shutdown with a 5s context.
    let _ = tokio::time::timeout(Duration::from_secs(5), server_handle).await;
    let _ = tokio::time::timeout(Duration::from_secs(5), engine_handle).await;

    info!("scale-sidecar shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
