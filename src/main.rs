//! chtl-ls: LSP server for CHTL documents

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging; stdout carries the protocol
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting chtl-ls server");

    if chtl_ls::serve(tokio::io::stdin(), tokio::io::stdout()).await {
        tracing::info!("chtl-ls server stopped");
        ExitCode::SUCCESS
    } else {
        tracing::warn!("Connection closed without shutdown");
        ExitCode::FAILURE
    }
}
