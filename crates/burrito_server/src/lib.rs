//! HTTP surface for the Burrito fractal store.
//!
//! # Responsibility
//! - Map the three public routes onto `burrito_core` use cases.
//! - Own the process lifecycle: connect the store, serve, close the store.

use std::sync::Arc;

use anyhow::Context;
use burrito_core::{core_version, FractalStore};
use log::{info, warn};
use tokio::net::TcpListener;

pub mod config;
pub mod form;
pub mod http;

use config::ServerConfig;
use http::{create_router, AppState};

/// Connects the store and serves HTTP until Ctrl-C or SIGTERM.
///
/// # Errors
/// - Returns an error when the database cannot be opened or migrated.
/// - Returns an error when the listen address cannot be bound.
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let store = FractalStore::connect(&config.database_url)
        .with_context(|| format!("failed to open database `{}`", config.database_url))?;
    let store = Arc::new(store);

    let addr = config.socket_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind `{addr}`"))?;
    info!(
        "event=server_start module=server status=ok addr={} debug={} database={} version={}",
        listener.local_addr()?,
        config.debug,
        store.location(),
        core_version()
    );

    let router = create_router(AppState::new(Arc::clone(&store), config.debug));
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server failed")?;
    info!("event=server_stop module=server status=ok");

    match Arc::try_unwrap(store) {
        Ok(store) => store.close().context("failed to close database")?,
        Err(_) => warn!("event=store_close module=server status=skipped reason=store_still_shared"),
    }

    Ok(())
}

/// Resolves on Ctrl-C or, on unix, SIGTERM.
///
/// A listener that cannot be installed is logged and never resolves, so the
/// other one still works.
async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate_listener =
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate());

    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(
                "event=server_stop module=server status=signal_error signal=ctrl_c error={}",
                err
            );
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async move {
        match terminate_listener {
            Ok(mut listener) => {
                listener.recv().await;
            }
            Err(err) => {
                warn!(
                    "event=server_stop module=server status=signal_error signal=sigterm error={}",
                    err
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("event=server_stop module=server status=signal signal=ctrl_c"),
        () = terminate => info!("event=server_stop module=server status=signal signal=sigterm"),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::shutdown_signal;
    use std::process::Command;
    use std::time::Duration;

    #[tokio::test]
    async fn sigterm_resolves_shutdown_signal() {
        let shutdown = tokio::spawn(shutdown_signal());
        // Let the spawned task install its SIGTERM listener.
        tokio::time::sleep(Duration::from_millis(200)).await;

        let status = Command::new("kill")
            .arg("-TERM")
            .arg(std::process::id().to_string())
            .status()
            .unwrap();
        assert!(status.success());

        tokio::time::timeout(Duration::from_secs(5), shutdown)
            .await
            .unwrap()
            .unwrap();
    }
}
