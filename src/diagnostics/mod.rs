//! Diagnostics module for error collection and reporting

mod collector;
mod structure;

pub use collector::{to_lsp_diagnostics, Diagnostic, DiagnosticCollector, Related, Severity};
pub use structure::validate_structure;
