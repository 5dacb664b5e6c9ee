//! chtl-ls: LSP server library for CHTL documents
//!
//! This library provides the core functionality for the chtl-ls server:
//! - Region analysis with error recovery (`text`, `style`, `script`, definitions)
//! - Structural diagnostics
//! - Context-aware completion with lazy resolve
//! - Document store with incremental, version-checked edits
//!
//! # Example
//!
//! ```
//! use chtl_ls::completion::complete;
//! use chtl_ls::parser::analyze;
//!
//! let model = analyze("div { style {  } }");
//! assert!(model.diagnostics.is_empty());
//!
//! let candidates = complete(&model, 14, false);
//! assert!(candidates.iter().any(|c| c.label == "color"));
//! ```

pub mod completion;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod line_index;
pub mod parser;
pub mod schema;
pub mod session;
pub mod settings;
pub mod symbols;

mod backend;
mod server;

pub use backend::Backend;
pub use error::ServerError;
pub use server::serve;
pub use session::{Lifecycle, Session, SessionConfig};
