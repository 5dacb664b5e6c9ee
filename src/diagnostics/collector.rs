//! Analyzer diagnostics and their conversion to LSP diagnostics

use tower_lsp::lsp_types::{self, DiagnosticRelatedInformation, DiagnosticSeverity, Location, Url};

use crate::line_index::LineIndex;
use crate::parser::Span;

const SOURCE: &str = "chtl-ls";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Hint,
}

impl From<Severity> for DiagnosticSeverity {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Error => DiagnosticSeverity::ERROR,
            Severity::Warning => DiagnosticSeverity::WARNING,
            Severity::Hint => DiagnosticSeverity::HINT,
        }
    }
}

/// A secondary location attached to a diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Related {
    pub span: Span,
    pub message: String,
}

/// A structural problem found by the analyzer, located by byte span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub span: Span,
    pub message: String,
    pub related: Option<Related>,
}

/// Collects diagnostics during analysis and validation
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create a new empty collector
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, severity: Severity, message: String, span: Span) {
        self.diagnostics.push(Diagnostic {
            severity,
            span,
            message,
            related: None,
        });
    }

    pub fn add_error(&mut self, message: String, span: Span) {
        self.push(Severity::Error, message, span);
    }

    /// Add an error that points back at a second location
    pub fn add_error_with_related(
        &mut self,
        message: String,
        span: Span,
        related_message: String,
        related_span: Span,
    ) {
        self.diagnostics.push(Diagnostic {
            severity: Severity::Error,
            span,
            message,
            related: Some(Related {
                span: related_span,
                message: related_message,
            }),
        });
    }

    pub fn add_warning(&mut self, message: String, span: Span) {
        self.push(Severity::Warning, message, span);
    }

    pub fn add_hint(&mut self, message: String, span: Span) {
        self.push(Severity::Hint, message, span);
    }

    /// Convert into the final list of diagnostics
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

/// Convert analyzer diagnostics to LSP diagnostics for `text`.
///
/// Related information is only attached when the client advertised support
/// for it.
pub fn to_lsp_diagnostics(
    diagnostics: &[Diagnostic],
    uri: &Url,
    text: &str,
    related_information: bool,
) -> Vec<lsp_types::Diagnostic> {
    let index = LineIndex::new(text);

    diagnostics
        .iter()
        .map(|diagnostic| {
            let related_information = diagnostic
                .related
                .as_ref()
                .filter(|_| related_information)
                .map(|related| {
                    vec![DiagnosticRelatedInformation {
                        location: Location {
                            uri: uri.clone(),
                            range: index.range(related.span),
                        },
                        message: related.message.clone(),
                    }]
                });

            lsp_types::Diagnostic {
                range: index.range(diagnostic.span),
                severity: Some(diagnostic.severity.into()),
                code: None,
                code_description: None,
                source: Some(SOURCE.to_string()),
                message: diagnostic.message.clone(),
                related_information,
                tags: None,
                data: None,
            }
        })
        .collect()
}
