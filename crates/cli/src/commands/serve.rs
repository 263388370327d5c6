use std::sync::Arc;

use anyhow::Result;
use leadsync_http::{AppState, serve};

pub(crate) async fn run(host: &str, port: u16) -> Result<()> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Starting reference backend on {}", addr);
    serve(listener, Arc::new(AppState::default())).await?;
    Ok(())
}
