//! Server startup and graceful shutdown

use anyhow::Result;
use axum::Router;
use filegate_core::Config;
use std::future::IntoFuture;
use tokio::sync::oneshot;

/// Start the server with graceful shutdown
///
/// After a shutdown signal, in-flight requests get the configured grace period
/// to finish before the server is dropped.
pub async fn start_server(config: &Config, app: Router) -> Result<()> {
    let addr = format!("0.0.0.0:{}", config.server_port());
    tracing::info!(addr = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        backend = %config.storage_backend(),
        max_upload_size_bytes = ?config.max_upload_size_bytes(),
        upload_forwarding_enabled = config.upload_forwarding_enabled(),
        error_status_mode = ?config.error_status_mode(),
        "Server ready and accepting connections"
    );

    let (signalled_tx, signalled_rx) = oneshot::channel::<()>();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = signalled_tx.send(());
        })
        .into_future();

    let grace_period = config.shutdown_grace_period();
    let deadline = async move {
        if signalled_rx.await.is_ok() {
            tokio::time::sleep(grace_period).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = server => {
            result?;
            tracing::info!("Exited gracefully");
        }
        _ = deadline => {
            tracing::warn!(
                grace_period_ms = grace_period.as_millis() as u64,
                "Grace period elapsed with requests in flight, forcing shutdown"
            );
        }
    }

    filegate_infra::shutdown_telemetry().await;

    Ok(())
}

/// Signal handler for graceful shutdown
///
/// Listens for Ctrl+C (SIGINT) and SIGTERM signals to initiate graceful shutdown.
///
/// # Panics
/// - Panics if Ctrl+C signal handler cannot be installed (unrecoverable system error)
/// - On Unix systems, panics if SIGTERM signal handler cannot be installed (unrecoverable system error)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal");
        },
    }

    tracing::info!("Shutting down gracefully...");
}
