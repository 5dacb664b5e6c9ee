//! Document state management

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tower_lsp::lsp_types::{TextDocumentContentChangeEvent, Url};

use crate::error::ServerError;
use crate::line_index::LineIndex;
use crate::parser::{analyze, StructuralModel};

/// Represents the state of a text document
#[derive(Debug, Clone)]
pub struct Document {
    /// The document text content
    pub text: String,
    /// The document version
    pub version: i32,
    /// Structural model of `text`, rebuilt on every change
    pub model: StructuralModel,
}

impl Document {
    /// Create a new document with the given text and version
    pub fn new(text: String, version: i32) -> Self {
        let model = analyze(&text);
        Self {
            text,
            version,
            model,
        }
    }

    pub fn line_index(&self) -> LineIndex<'_> {
        LineIndex::new(&self.text)
    }
}

/// Replace the range of `change` in `text`, or all of it when unranged.
fn apply_edit(
    text: &mut String,
    change: TextDocumentContentChangeEvent,
) -> Result<(), ServerError> {
    let Some(range) = change.range else {
        *text = change.text;
        return Ok(());
    };

    let index = LineIndex::new(text);
    let start = index.offset(range.start);
    let end = index.offset(range.end);
    if start > end {
        return Err(ServerError::MalformedRequest(format!(
            "edit range ends before it starts: {:?}",
            range
        )));
    }

    text.replace_range(start..end, &change.text);
    Ok(())
}

/// All open documents, keyed by URI
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: HashMap<Url, Document>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a document
    pub fn open(&mut self, uri: Url, text: String, version: i32) -> Result<&Document, ServerError> {
        match self.documents.entry(uri) {
            Entry::Occupied(entry) => Err(ServerError::AlreadyOpen(entry.key().clone())),
            Entry::Vacant(entry) => Ok(&*entry.insert(Document::new(text, version))),
        }
    }

    /// Apply `changes` in order and re-analyze.
    ///
    /// Either every change is applied and the version advances, or the
    /// document is left exactly as it was.
    pub fn apply_change(
        &mut self,
        uri: &Url,
        version: i32,
        changes: Vec<TextDocumentContentChangeEvent>,
    ) -> Result<&Document, ServerError> {
        let document = self
            .documents
            .get_mut(uri)
            .ok_or_else(|| ServerError::UnknownDocument(uri.clone()))?;

        if version <= document.version {
            return Err(ServerError::StaleEdit {
                uri: uri.clone(),
                current: document.version,
                received: version,
            });
        }

        let mut text = document.text.clone();
        for change in changes {
            apply_edit(&mut text, change)?;
        }

        *document = Document::new(text, version);
        Ok(&*document)
    }

    /// Stop tracking a document
    pub fn close(&mut self, uri: &Url) -> Result<Document, ServerError> {
        self.documents
            .remove(uri)
            .ok_or_else(|| ServerError::UnknownDocument(uri.clone()))
    }

    pub fn get(&self, uri: &Url) -> Result<&Document, ServerError> {
        self.documents
            .get(uri)
            .ok_or_else(|| ServerError::UnknownDocument(uri.clone()))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
