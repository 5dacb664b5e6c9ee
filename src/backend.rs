//! LSP Backend implementation

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

use crate::completion;
use crate::diagnostics::to_lsp_diagnostics;
use crate::document::{Document, DocumentStore};
use crate::error::ServerError;
use crate::session::{Session, SessionConfig};
use crate::symbols::document_symbols;

/// The LSP backend that handles all language server requests
pub struct Backend {
    /// The LSP client for sending notifications
    client: Client,
    /// Connection lifecycle; shared with `main` so it can report the exit status
    session: Arc<Mutex<Session>>,
    /// All open documents. Every mutation holds the write lock through
    /// re-analysis, so readers never see a model older than its text.
    documents: Arc<RwLock<DocumentStore>>,
}

impl Backend {
    /// Create a new backend instance
    pub fn new(client: Client) -> Self {
        Self::with_session(client, Arc::default())
    }

    pub fn with_session(client: Client, session: Arc<Mutex<Session>>) -> Self {
        Self {
            client,
            session,
            documents: Arc::new(RwLock::new(DocumentStore::new())),
        }
    }

    pub fn session(&self) -> &Arc<Mutex<Session>> {
        &self.session
    }

    pub fn documents(&self) -> &Arc<RwLock<DocumentStore>> {
        &self.documents
    }

    async fn config(&self) -> std::result::Result<Arc<SessionConfig>, ServerError> {
        self.session.lock().await.config()
    }

    /// Report an error raised while handling a notification
    async fn report(&self, err: ServerError) {
        tracing::warn!("{}", err);
        self.client.log_message(MessageType::WARNING, err).await;
    }

    /// Diagnostics for a document, if the session publishes them
    fn diagnostics_for(
        uri: &Url,
        document: &Document,
        config: &SessionConfig,
    ) -> Option<Vec<Diagnostic>> {
        config.settings.diagnostics.enable.then(|| {
            to_lsp_diagnostics(
                &document.model.diagnostics,
                uri,
                &document.text,
                config.related_information,
            )
        })
    }

    async fn publish(&self, uri: Url, diagnostics: Option<Vec<Diagnostic>>, version: i32) {
        if let Some(diagnostics) = diagnostics {
            self.client
                .publish_diagnostics(uri, diagnostics, Some(version))
                .await;
        }
    }
}

fn server_capabilities(config: &SessionConfig) -> ServerCapabilities {
    ServerCapabilities {
        text_document_sync: Some(TextDocumentSyncCapability::Options(
            TextDocumentSyncOptions {
                open_close: Some(true),
                change: Some(TextDocumentSyncKind::INCREMENTAL),
                ..Default::default()
            },
        )),
        completion_provider: Some(CompletionOptions {
            resolve_provider: Some(true),
            trigger_characters: Some(vec!["[".to_string(), "@".to_string()]),
            ..Default::default()
        }),
        document_symbol_provider: Some(OneOf::Left(true)),
        workspace: config
            .workspace_folders
            .then(|| WorkspaceServerCapabilities {
                workspace_folders: Some(WorkspaceFoldersServerCapabilities {
                    supported: Some(true),
                    change_notifications: None,
                }),
                file_operations: None,
            }),
        ..Default::default()
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        let config = self.session.lock().await.initialize(&params)?;
        tracing::info!(
            workspace_folders = config.workspace_folders,
            configuration = config.configuration,
            related_information = config.related_information,
            snippets = config.snippets_enabled(),
            "Client capabilities negotiated"
        );

        Ok(InitializeResult {
            capabilities: server_capabilities(&config),
            server_info: Some(ServerInfo {
                name: "chtl-ls".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.session.lock().await.initialized();
        tracing::info!("Server initialized");
    }

    async fn shutdown(&self) -> Result<()> {
        self.session.lock().await.shutdown()?;
        tracing::info!("Server shutting down");
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let config = match self.config().await {
            Ok(config) => config,
            Err(err) => return self.report(err).await,
        };
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        tracing::debug!("Document opened: {}", uri);

        let opened = {
            let mut docs = self.documents.write().await;
            docs.open(uri.clone(), params.text_document.text, version)
                .map(|document| Self::diagnostics_for(&uri, document, &config))
        };

        match opened {
            Ok(diagnostics) => self.publish(uri, diagnostics, version).await,
            Err(err) => self.report(err).await,
        }
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let config = match self.config().await {
            Ok(config) => config,
            Err(err) => return self.report(err).await,
        };
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        tracing::debug!("Document changed: {} (version {})", uri, version);

        let changed = {
            let mut docs = self.documents.write().await;
            docs.apply_change(&uri, version, params.content_changes)
                .map(|document| Self::diagnostics_for(&uri, document, &config))
        };

        match changed {
            Ok(diagnostics) => self.publish(uri, diagnostics, version).await,
            Err(err) => self.report(err).await,
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        if let Err(err) = self.config().await {
            return self.report(err).await;
        }
        let uri = params.text_document.uri;
        tracing::debug!("Document closed: {}", uri);

        let closed = self.documents.write().await.close(&uri);
        match closed {
            // Clear diagnostics for this document
            Ok(_) => self.client.publish_diagnostics(uri, vec![], None).await,
            Err(err) => self.report(err).await,
        }
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let config = self.config().await?;
        let uri = params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;

        let docs = self.documents.read().await;
        let document = docs.get(&uri)?;
        let offset = document.line_index().offset(position);

        let items = completion::complete(&document.model, offset, config.snippets_enabled())
            .into_iter()
            .enumerate()
            .map(|(i, candidate)| completion::to_completion_item(i, candidate))
            .collect();

        Ok(Some(CompletionResponse::Array(items)))
    }

    async fn completion_resolve(&self, item: CompletionItem) -> Result<CompletionItem> {
        self.config().await?;
        Ok(completion::resolve_item(item))
    }

    async fn document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> Result<Option<DocumentSymbolResponse>> {
        self.config().await?;
        let docs = self.documents.read().await;
        let document = docs.get(&params.text_document.uri)?;

        Ok(Some(DocumentSymbolResponse::Nested(document_symbols(
            &document.model,
            &document.text,
        ))))
    }
}
