//! HTTP server for bootswitchd

use crate::routes;
use anyhow::{Context, Result};
use axum::Router;
use bootswitch_common::{BootSwitch, CommandRunner, OverrideStore};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Application state shared across handlers
pub struct AppState<R, S> {
    pub switch: BootSwitch<R, S>,
    pub start_time: Instant,
}

impl<R: CommandRunner, S: OverrideStore> AppState<R, S> {
    pub fn new(switch: BootSwitch<R, S>) -> Self {
        Self {
            switch,
            start_time: Instant::now(),
        }
    }
}

/// Placeholder served until the operator drops in a real icon.
pub const FAVICON_PLACEHOLDER: &[u8] =
    b"bootswitch icon placeholder - replace favicon.ico with your own .ico";

/// Create the static asset directory and a placeholder favicon if missing.
pub fn prepare_public_dir(public_dir: &Path) -> io::Result<()> {
    fs::create_dir_all(public_dir)?;
    let favicon = public_dir.join("favicon.ico");
    if !favicon.exists() {
        fs::write(&favicon, FAVICON_PLACEHOLDER)?;
        info!("Created placeholder {}", favicon.display());
    }
    Ok(())
}

/// Full router: actions plus static assets from `public_dir`.
pub fn app<R, S>(state: AppState<R, S>, public_dir: &Path) -> Router
where
    R: CommandRunner + 'static,
    S: OverrideStore + 'static,
{
    routes::boot_routes::<R, S>()
        .merge(routes::health_routes::<R, S>())
        .fallback_service(ServeDir::new(PathBuf::from(public_dir)))
        .with_state(Arc::new(state))
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server until Ctrl-C.
pub async fn run<R, S>(state: AppState<R, S>, addr: &str, public_dir: &Path) -> Result<()>
where
    R: CommandRunner + 'static,
    S: OverrideStore + 'static,
{
    let platform = state.switch.platform();
    let app = app(state, public_dir);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) if e.kind() == io::ErrorKind::AddrInUse => {
            // A second launch (e.g. from a scheduler) is not a failure
            warn!("Port {} already in use. Not starting a second instance.", addr);
            return Ok(());
        }
        Err(e) => return Err(e).with_context(|| format!("Failed to bind {}", addr)),
    };
    info!("  Boot switch ({}) listening on http://{}", platform, addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down gracefully");
}
