//! # RBAC Authorization Webhook Server
//!
//! HTTP server answering Kubernetes `SubjectAccessReview` requests from a
//! JSON policy file.
//!
//! ## Endpoints
//!
//! - `POST /authorize` - Authorization check
//! - `GET /health` - Health check
//!
//! ## Configuration
//!
//! Command-line flags override the TOML config file, which overrides the
//! built-in defaults. Environment variables:
//! - `RBAC_CONFIG` - Path to the TOML config file
//! - `RBAC_POLICY_FILE` - Policy document (default: rbac-policy.json)
//! - `LISTEN_ADDR` - Listen address (default: 0.0.0.0:4000)
//! - `RUST_LOG` - Log filter (default: from config, `info`)

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rbac_authz::{
    webhook::{create_router, AppState},
    Authorizer, FilePolicyStore, ServerConfig,
};
use rbac_core::PolicyDocument;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "rbac-webhook")]
#[command(about = "Kubernetes RBAC authorization webhook", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "RBAC_CONFIG")]
    config: Option<PathBuf>,

    /// Policy document path
    #[arg(short, long, env = "RBAC_POLICY_FILE")]
    policy_file: Option<PathBuf>,

    /// Listen address
    #[arg(short, long, env = "LISTEN_ADDR")]
    listen: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the authorization webhook (default)
    Serve,

    /// Check a policy document for invalid entries and dangling references
    ValidatePolicy {
        /// Policy document to check; defaults to the configured one
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => ServerConfig::default(),
    };

    if let Some(policy_file) = &cli.policy_file {
        config.policy.file = policy_file.clone();
    }
    if let Some(listen) = &cli.listen {
        config.server.listen_addr = listen.clone();
    }
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }

    init_tracing(&config.logging.level);

    config.validate().context("Invalid configuration")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::ValidatePolicy { file } => {
            validate_policy(file.unwrap_or(config.policy.file)).await
        }
    }
}

fn init_tracing(default_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn serve(config: ServerConfig) -> Result<()> {
    info!("Starting RBAC Authorization Webhook v{}", rbac_authz::VERSION);

    let store = FilePolicyStore::create(&config.policy.file)
        .await
        .with_context(|| format!("Failed to open policy file {}", config.policy.file.display()))?;

    match store.load().await.map(|doc| doc.validate()) {
        Ok(Ok(())) => info!("Loaded policy from {}", config.policy.file.display()),
        Ok(Err(e)) => warn!("Policy file {} has problems: {}", config.policy.file.display(), e),
        Err(e) => return Err(e).context("Failed to read policy file"),
    }

    let authorizer = Authorizer::new(Arc::new(store));
    let app = create_router(AppState::new(authorizer));

    let addr = config.listen_addr()?;
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        error!("Failed to bind HTTP server: {}", e);
        e
    })?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn validate_policy(path: PathBuf) -> Result<()> {
    let data = tokio::fs::read(&path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let document: PolicyDocument = serde_json::from_slice(&data)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    document
        .validate()
        .with_context(|| format!("Policy {} is invalid", path.display()))?;

    println!(
        "✓ {} is valid: {} roles, {} role bindings, {} cluster roles, {} cluster role bindings",
        path.display(),
        document.roles.len(),
        document.role_bindings.len(),
        document.cluster_roles.len(),
        document.cluster_role_bindings.len()
    );

    Ok(())
}

/// Graceful shutdown handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received SIGTERM signal");
        }
    }

    info!("Starting graceful shutdown");
}
