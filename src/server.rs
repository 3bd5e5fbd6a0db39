use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Serve `dir` verbatim. No routing beyond static files.
pub fn build_router(dir: &Path) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(dir))
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(dir: PathBuf, port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(dir = %dir.display(), %addr, "static file server listening");

    println!("Serving at http://localhost:{}", port);
    println!("Press Ctrl+C to stop the server");

    axum::serve(listener, build_router(&dir))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    println!("\nServer stopped.");
    Ok(())
}
