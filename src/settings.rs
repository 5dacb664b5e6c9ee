//! Server settings carried in `initializationOptions`
//!
//! ```json
//! { "diagnostics": { "enable": true }, "completion": { "snippets": true } }
//! ```
//!
//! Missing fields take their defaults; an unreadable object falls back to the
//! defaults entirely.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub diagnostics: DiagnosticsSettings,
    pub completion: CompletionSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DiagnosticsSettings {
    /// Publish analyzer diagnostics after every open and change
    pub enable: bool,
}

impl Default for DiagnosticsSettings {
    fn default() -> Self {
        Self { enable: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompletionSettings {
    /// Offer snippet candidates when the client supports them
    pub snippets: bool,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self { snippets: true }
    }
}

impl Settings {
    pub fn from_initialization_options(options: Option<Value>) -> Self {
        let Some(options) = options else {
            return Self::default();
        };

        match serde_json::from_value(options) {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!("Ignoring unreadable initializationOptions: {}", err);
                Self::default()
            }
        }
    }
}
