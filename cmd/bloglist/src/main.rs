//! # bloglist
//!
//! Entry point: loads configuration, wires adapters into the HTTP app and
//! serves it until SIGINT/SIGTERM.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::AppState;
use auth_adapters::{Argon2CredentialHasher, JwtTokenService};
use configs::{AppConfig, LogConfig, LogFormat, StorageBackend};
use domains::{BlogRepository, UserRepository};
use secrecy::ExposeSecret;
use storage_adapters::MemoryStore;
use tracing_subscriber::EnvFilter;

fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}

type Repositories = (Arc<dyn BlogRepository>, Arc<dyn UserRepository>);

fn repositories(config: &AppConfig) -> anyhow::Result<Repositories> {
    match config.storage.backend()? {
        StorageBackend::Memory => {
            let store = Arc::new(MemoryStore::new());
            tracing::warn!("using the in-memory store; data is lost on restart");
            let blogs: Arc<dyn BlogRepository> = store.clone();
            let users: Arc<dyn UserRepository> = store;
            Ok((blogs, users))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_file = configs::load_env_file();
    let config = AppConfig::load().context("loading configuration")?;
    init_tracing(&config.log);
    match env_file {
        Ok(Some(path)) => tracing::debug!(path = %path.display(), "loaded .env"),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "ignoring unreadable .env"),
    }

    let (blog_repo, user_repo) = repositories(&config)?;
    let ttl = config
        .auth
        .token_ttl_secs
        .map(|secs| {
            i64::try_from(secs)
                .ok()
                .and_then(chrono::Duration::try_seconds)
                .context("token TTL out of range")
        })
        .transpose()?;
    let tokens = JwtTokenService::new(config.auth.token_secret.expose_secret().as_bytes(), ttl);

    let state = AppState::new(
        blog_repo,
        user_repo,
        Arc::new(Argon2CredentialHasher::default()),
        Arc::new(tokens),
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "bloglist listening");

    axum::serve(listener, api_adapters::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}
