//! Connection driver

use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::Mutex;
use tower_lsp::{LspService, Server};

use crate::backend::Backend;
use crate::session::Session;

/// Serve one client over `input` and `output` until the connection ends.
///
/// Messages are handled one at a time in arrival order. Returns whether the
/// client sent `shutdown` before `exit`.
pub async fn serve<I, O>(input: I, output: O) -> bool
where
    I: AsyncRead + Unpin,
    O: AsyncWrite,
{
    let session = Arc::new(Mutex::new(Session::new()));
    let (service, socket) = LspService::new({
        let session = Arc::clone(&session);
        move |client| Backend::with_session(client, session)
    });

    Server::new(input, output, socket)
        .concurrency_level(1)
        .serve(service)
        .await;

    let clean = session.lock().await.exit();
    clean
}
