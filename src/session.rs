//! Connection lifecycle and negotiated session configuration

use std::sync::Arc;

use tower_lsp::lsp_types::InitializeParams;

use crate::error::ServerError;
use crate::settings::Settings;

/// Lifecycle of one client connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Uninitialized,
    /// `initialize` answered, `initialized` not yet received
    Initializing,
    Ready,
    ShuttingDown,
    Terminated,
}

/// Client features and settings recorded once at `initialize`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionConfig {
    pub workspace_folders: bool,
    pub configuration: bool,
    pub related_information: bool,
    pub snippet_support: bool,
    pub settings: Settings,
}

impl SessionConfig {
    pub fn from_params(params: &InitializeParams) -> Self {
        let capabilities = &params.capabilities;
        let workspace = capabilities.workspace.as_ref();
        let text_document = capabilities.text_document.as_ref();

        Self {
            workspace_folders: workspace
                .and_then(|w| w.workspace_folders)
                .unwrap_or(false),
            configuration: workspace.and_then(|w| w.configuration).unwrap_or(false),
            related_information: text_document
                .and_then(|t| t.publish_diagnostics.as_ref())
                .and_then(|p| p.related_information)
                .unwrap_or(false),
            snippet_support: text_document
                .and_then(|t| t.completion.as_ref())
                .and_then(|c| c.completion_item.as_ref())
                .and_then(|i| i.snippet_support)
                .unwrap_or(false),
            settings: Settings::from_initialization_options(params.initialization_options.clone()),
        }
    }

    /// Whether completion should include snippet candidates
    pub fn snippets_enabled(&self) -> bool {
        self.snippet_support && self.settings.completion.snippets
    }
}

/// Lifecycle state machine for a connection
#[derive(Debug, Default)]
pub struct Session {
    state: Lifecycle,
    config: Option<Arc<SessionConfig>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Lifecycle {
        self.state
    }

    /// Handle `initialize`: record the client's capabilities.
    pub fn initialize(
        &mut self,
        params: &InitializeParams,
    ) -> Result<Arc<SessionConfig>, ServerError> {
        match self.state {
            Lifecycle::Uninitialized => {
                let config = Arc::new(SessionConfig::from_params(params));
                self.config = Some(Arc::clone(&config));
                self.state = Lifecycle::Initializing;
                Ok(config)
            }
            Lifecycle::Initializing | Lifecycle::Ready => Err(ServerError::AlreadyInitialized),
            Lifecycle::ShuttingDown | Lifecycle::Terminated => Err(ServerError::ShuttingDown),
        }
    }

    /// Handle `initialized`. Ignored outside the `Initializing` state.
    pub fn initialized(&mut self) {
        if self.state == Lifecycle::Initializing {
            self.state = Lifecycle::Ready;
        } else {
            tracing::warn!("Unexpected initialized notification in state {:?}", self.state);
        }
    }

    /// Gate for every request and notification other than the lifecycle ones.
    pub fn config(&self) -> Result<Arc<SessionConfig>, ServerError> {
        match (self.state, &self.config) {
            (Lifecycle::Initializing | Lifecycle::Ready, Some(config)) => Ok(Arc::clone(config)),
            (Lifecycle::ShuttingDown | Lifecycle::Terminated, _) => Err(ServerError::ShuttingDown),
            _ => Err(ServerError::ServerNotInitialized),
        }
    }

    /// Handle `shutdown`
    pub fn shutdown(&mut self) -> Result<(), ServerError> {
        self.config()?;
        self.state = Lifecycle::ShuttingDown;
        Ok(())
    }

    /// Handle `exit`. Returns whether `shutdown` preceded it.
    pub fn exit(&mut self) -> bool {
        let clean = self.state == Lifecycle::ShuttingDown;
        self.state = Lifecycle::Terminated;
        clean
    }
}
