//! Server error taxonomy and its mapping onto JSON-RPC errors

use thiserror::Error;
use tower_lsp::jsonrpc::{self, ErrorCode};
use tower_lsp::lsp_types::Url;

/// JSON-RPC code reserved by LSP for requests received before `initialize`.
const SERVER_NOT_INITIALIZED: i64 = -32002;

/// Errors raised by the document store and the session lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServerError {
    /// The document was never opened, or has already been closed
    #[error("document is not open: {0}")]
    UnknownDocument(Url),
    /// `didOpen` for a document that is already tracked
    #[error("document is already open: {0}")]
    AlreadyOpen(Url),
    /// A change whose version does not exceed the stored version
    #[error("stale edit for {uri}: version {received} does not follow version {current}")]
    StaleEdit {
        uri: Url,
        current: i32,
        received: i32,
    },
    /// A request other than `initialize` arrived first
    #[error("server has not been initialized")]
    ServerNotInitialized,
    /// `initialize` was sent twice on the same connection
    #[error("server is already initialized")]
    AlreadyInitialized,
    /// A request arrived after `shutdown`
    #[error("server is shutting down")]
    ShuttingDown,
    /// A message whose parameters could not be interpreted
    #[error("malformed request: {0}")]
    MalformedRequest(String),
}

impl From<ServerError> for jsonrpc::Error {
    fn from(err: ServerError) -> Self {
        let code = match err {
            ServerError::ServerNotInitialized => ErrorCode::ServerError(SERVER_NOT_INITIALIZED),
            ServerError::AlreadyInitialized | ServerError::ShuttingDown => {
                ErrorCode::InvalidRequest
            }
            ServerError::UnknownDocument(_)
            | ServerError::AlreadyOpen(_)
            | ServerError::StaleEdit { .. } => ErrorCode::InvalidParams,
            ServerError::MalformedRequest(_) => ErrorCode::InternalError,
        };

        let mut rpc_error = jsonrpc::Error::new(code);
        rpc_error.message = err.to_string().into();
        rpc_error
    }
}
