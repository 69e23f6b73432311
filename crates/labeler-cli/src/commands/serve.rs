//! Serve command implementation.

use std::net::SocketAddr;

use anyhow::Result;
use tokio::net::TcpListener;
use tracing::info;

use labeler_api::create_router;
use labeler_ops::OpsContext;

/// Serve the REST API until interrupted.
pub async fn execute(ctx: OpsContext, port: u16) -> Result<()> {
    let config_dir = ctx.store().config_dir().display().to_string();
    let app = create_router(ctx);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    println!("🚀 Character labeler API");
    println!("   Vocabularies: {}", config_dir);
    println!();
    println!("   Health:  http://localhost:{}/health", port);
    println!("   Compose: http://localhost:{}/compose", port);
    println!();
    println!("   Press Ctrl+C to stop");
    println!();

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Listening");
    axum::serve(listener, app).await?;

    Ok(())
}
