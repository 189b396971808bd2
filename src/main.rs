use tracing::{error, info, warn};

use lifeboat::bind::{self, BindCandidate, BIND_CANDIDATES};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let base = std::env::current_dir()?;
    let content_root = lifeboat::root::resolve(&base)?;
    let app = lifeboat::app(&content_root);

    let mut remaining: &[BindCandidate] = &BIND_CANDIDATES;
    loop {
        let Some((idx, listener)) = bind::first_available(remaining).await else {
            error!("All bind strategies failed");
            anyhow::bail!("no bind candidate could be bound");
        };

        let addr = listener.local_addr()?;
        info!("Emergency server active");
        info!("Local:   http://localhost:{}", addr.port());
        info!("Network: http://{}", addr);
        info!("Health:  http://localhost:{}/api/health", addr.port());
        info!("Stocks:  http://localhost:{}/api/stocks", addr.port());
        info!("Press Ctrl+C to stop the server");

        match axum::serve(listener, app.clone())
            .with_graceful_shutdown(shutdown_signal())
            .await
        {
            Ok(()) => {
                info!("Server stopped");
                return Ok(());
            }
            Err(e) => {
                // Transient socket trouble on this candidate; keep scanning.
                warn!("Serve failed on {}: {}", remaining[idx], e);
                remaining = &remaining[idx + 1..];
            }
        }
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
    info!("Server stopping...");
}
