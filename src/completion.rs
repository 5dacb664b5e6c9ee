//! Context-aware completion
//!
//! The candidate set depends on the innermost region around the cursor:
//! markup context (top level, namespaces, elements) offers block and
//! definition keywords plus element symbols, `style` offers CSS vocabulary,
//! `script` offers CHTL JS vocabulary and `[Configuration]` offers compiler
//! settings. Candidates come back keywords first, then snippets, then
//! symbols, each group in a fixed order.
//!
//! Details and documentation are filled in lazily by [`resolve`] from the
//! candidate's resolution key.

use serde_json::Value;
use tower_lsp::lsp_types::{
    CompletionItem, CompletionItemKind, Documentation, InsertTextFormat, MarkupContent,
    MarkupKind,
};

use crate::parser::{RegionKind, StructuralModel};
use crate::schema::{self, Entry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CandidateKind {
    Keyword,
    Snippet,
    Symbol,
}

/// A completion candidate before conversion to the protocol type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionCandidate {
    pub label: String,
    pub kind: CandidateKind,
    pub detail: Option<String>,
    pub documentation: Option<String>,
    /// Snippet body in LSP snippet syntax
    pub insert_text: Option<String>,
    /// Opaque key used by [`resolve`]
    pub key: String,
}

impl CompletionCandidate {
    fn new(label: impl Into<String>, kind: CandidateKind, key: String) -> Self {
        Self {
            label: label.into(),
            kind,
            detail: None,
            documentation: None,
            insert_text: None,
            key,
        }
    }
}

/// What the cursor position calls for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionContext {
    /// Top level or inside a `[Namespace]`
    TopLevel,
    /// Inside an element or an `@Element` definition
    Element,
    /// Inside `style` or an `@Style` definition
    Style,
    Script,
    Configuration,
    /// Text, origin and `@Var` bodies, comments and strings
    Silent,
}

/// Work out the completion context at `offset`.
pub fn context_at(model: &StructuralModel, offset: usize) -> CompletionContext {
    if model.is_quiet(offset) {
        return CompletionContext::Silent;
    }

    let Some(region) = model.enclosing_region(offset) else {
        return CompletionContext::TopLevel;
    };

    match region.kind {
        RegionKind::Namespace => CompletionContext::TopLevel,
        RegionKind::Element => CompletionContext::Element,
        RegionKind::Style => CompletionContext::Style,
        RegionKind::Script => CompletionContext::Script,
        RegionKind::Configuration => CompletionContext::Configuration,
        RegionKind::Template | RegionKind::Custom => match region.definition_type.as_deref() {
            Some("@Style") => CompletionContext::Style,
            Some("@Element") => CompletionContext::Element,
            _ => CompletionContext::Silent,
        },
        RegionKind::Text | RegionKind::Origin => CompletionContext::Silent,
    }
}

/// Compute completion candidates at byte `offset`.
pub fn complete(
    model: &StructuralModel,
    offset: usize,
    snippets: bool,
) -> Vec<CompletionCandidate> {
    let mut candidates = Vec::new();

    match context_at(model, offset) {
        CompletionContext::TopLevel => {
            push_entries(
                &mut candidates,
                CandidateKind::Keyword,
                "keyword",
                schema::BLOCK_KEYWORDS,
            );
            push_entries(
                &mut candidates,
                CandidateKind::Keyword,
                "keyword",
                schema::DEFINITION_KEYWORDS,
            );
            push_markup_tail(&mut candidates, model, snippets);
        }
        CompletionContext::Element => {
            push_entries(
                &mut candidates,
                CandidateKind::Keyword,
                "keyword",
                schema::BLOCK_KEYWORDS,
            );
            push_markup_tail(&mut candidates, model, snippets);
        }
        CompletionContext::Style => {
            push_entries(&mut candidates, CandidateKind::Keyword, "style", schema::STYLE_KEYWORDS);
            push_words(&mut candidates, "css", schema::CSS_PROPERTIES);
            push_definitions(&mut candidates, model, "@Style");
        }
        CompletionContext::Script => {
            push_entries(
                &mut candidates,
                CandidateKind::Keyword,
                "script",
                schema::SCRIPT_KEYWORDS,
            );
            push_entries(&mut candidates, CandidateKind::Symbol, "js", schema::CHTL_JS_FUNCTIONS);
            push_words(&mut candidates, "dom", schema::DOM_SYMBOLS);
        }
        CompletionContext::Configuration => {
            push_entries(
                &mut candidates,
                CandidateKind::Symbol,
                "config",
                schema::CONFIGURATION_KEYS,
            );
        }
        CompletionContext::Silent => {}
    }

    candidates
}

/// Snippets, HTML elements and element definitions
fn push_markup_tail(
    candidates: &mut Vec<CompletionCandidate>,
    model: &StructuralModel,
    snippets: bool,
) {
    if snippets {
        for snippet in schema::SNIPPETS {
            let mut candidate = CompletionCandidate::new(
                snippet.label,
                CandidateKind::Snippet,
                format!("snippet:{}", snippet.label),
            );
            candidate.insert_text = Some(snippet.body.to_string());
            candidates.push(candidate);
        }
    }
    push_words(candidates, "element", schema::HTML_ELEMENTS);
    push_definitions(candidates, model, "@Element");
}

fn push_entries(
    candidates: &mut Vec<CompletionCandidate>,
    kind: CandidateKind,
    namespace: &str,
    entries: &[Entry],
) {
    candidates.extend(entries.iter().map(|entry| {
        CompletionCandidate::new(entry.label, kind, format!("{}:{}", namespace, entry.label))
    }));
}

fn push_words(candidates: &mut Vec<CompletionCandidate>, namespace: &str, words: &[&str]) {
    candidates.extend(words.iter().map(|word| {
        CompletionCandidate::new(*word, CandidateKind::Symbol, format!("{}:{}", namespace, word))
    }));
}

/// Definitions of `definition_type` declared in the document, first one per name
fn push_definitions(
    candidates: &mut Vec<CompletionCandidate>,
    model: &StructuralModel,
    definition_type: &str,
) {
    let mut seen: Vec<&str> = Vec::new();

    for region in model.definitions(definition_type) {
        let Some(name) = region.name.as_deref() else {
            continue;
        };
        if seen.contains(&name) {
            continue;
        }
        seen.push(name);

        let keyword = region.kind.keyword();
        candidates.push(CompletionCandidate::new(
            format!("{} {}", definition_type, name),
            CandidateKind::Symbol,
            format!("definition:{}:{}:{}", keyword, definition_type, name),
        ));
    }
}

/// Detail and documentation for a resolution key
fn describe(key: &str) -> Option<(String, String)> {
    let (namespace, label) = key.split_once(':')?;

    let from_entry = |entry: &Entry| (entry.detail.to_string(), entry.documentation.to_string());

    match namespace {
        "keyword" => {
            schema::find_entry(&[schema::BLOCK_KEYWORDS, schema::DEFINITION_KEYWORDS], label)
                .map(from_entry)
        }
        "style" => schema::find_entry(&[schema::STYLE_KEYWORDS], label).map(from_entry),
        "script" => schema::find_entry(&[schema::SCRIPT_KEYWORDS], label).map(from_entry),
        "js" => schema::find_entry(&[schema::CHTL_JS_FUNCTIONS], label).map(from_entry),
        "config" => schema::find_entry(&[schema::CONFIGURATION_KEYS], label).map(from_entry),
        "snippet" => schema::find_snippet(label)
            .map(|snippet| (snippet.detail.to_string(), snippet.documentation.to_string())),
        "element" if schema::HTML_ELEMENTS.contains(&label) => Some((
            "HTML element".to_string(),
            format!("Emits a `<{}>` element.", label),
        )),
        "css" if schema::CSS_PROPERTIES.contains(&label) => Some((
            "CSS property".to_string(),
            format!("Sets the `{}` property.", label),
        )),
        "dom" if schema::DOM_SYMBOLS.contains(&label) => Some((
            "Browser global".to_string(),
            format!("The `{}` object of the page's JavaScript environment.", label),
        )),
        "definition" => {
            let mut parts = label.splitn(3, ':');
            let (keyword, ty, name) = (parts.next()?, parts.next()?, parts.next()?);
            let usage = if ty == "@Style" {
                "Applies its properties"
            } else {
                "Inserts its elements"
            };
            Some((
                format!("{} {}", keyword, ty),
                format!("`{} {}` declared in this document. {} here.", ty, name, usage),
            ))
        }
        _ => None,
    }
}

/// Fill in `detail` and `documentation` from the resolution key.
///
/// An unrecognized key leaves the candidate unchanged.
pub fn resolve(mut candidate: CompletionCandidate) -> CompletionCandidate {
    if let Some((detail, documentation)) = describe(&candidate.key) {
        candidate.detail = Some(detail);
        candidate.documentation = Some(documentation);
    }
    candidate
}

/// `completionItem/resolve` on a protocol item; the key travels in `data`.
pub fn resolve_item(mut item: CompletionItem) -> CompletionItem {
    let description = item.data.as_ref().and_then(Value::as_str).and_then(describe);
    if let Some((detail, documentation)) = description {
        item.detail = Some(detail);
        item.documentation = Some(markdown(documentation));
    }
    item
}

fn markdown(value: String) -> Documentation {
    Documentation::MarkupContent(MarkupContent {
        kind: MarkupKind::Markdown,
        value,
    })
}

/// Convert a candidate to a protocol item. `position` fixes client-side order.
pub fn to_completion_item(position: usize, candidate: CompletionCandidate) -> CompletionItem {
    let kind = match candidate.kind {
        CandidateKind::Keyword => CompletionItemKind::KEYWORD,
        CandidateKind::Snippet => CompletionItemKind::SNIPPET,
        CandidateKind::Symbol if candidate.key.starts_with("css:") => CompletionItemKind::PROPERTY,
        CandidateKind::Symbol if candidate.key.starts_with("js:") => CompletionItemKind::FUNCTION,
        CandidateKind::Symbol if candidate.key.starts_with("config:") => {
            CompletionItemKind::CONSTANT
        }
        CandidateKind::Symbol if candidate.key.starts_with("definition:") => {
            CompletionItemKind::CLASS
        }
        CandidateKind::Symbol => CompletionItemKind::VALUE,
    };

    CompletionItem {
        label: candidate.label,
        kind: Some(kind),
        detail: candidate.detail,
        documentation: candidate.documentation.map(markdown),
        sort_text: Some(format!("{:04}", position)),
        insert_text_format: candidate
            .insert_text
            .as_ref()
            .map(|_| InsertTextFormat::SNIPPET),
        insert_text: candidate.insert_text,
        data: Some(Value::String(candidate.key)),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::analyze;

    fn labels(text: &str, offset: usize) -> Vec<String> {
        complete(&analyze(text), offset, true)
            .into_iter()
            .map(|c| c.label)
            .collect()
    }

    fn offset_of(text: &str, marker: &str) -> usize {
        text.find(marker).unwrap() + marker.len()
    }

    #[test]
    fn test_top_level_offers_block_keywords() {
        let candidates = complete(&analyze("text { Hello }"), 0, true);
        let text = candidates.iter().find(|c| c.label == "text").unwrap();
        assert_eq!(text.kind, CandidateKind::Keyword);
        assert!(candidates.iter().any(|c| c.label == "[Template]"));
        assert!(candidates.iter().any(|c| c.label == "div"));
    }

    #[test]
    fn test_order_is_keywords_snippets_symbols() {
        let candidates = complete(&analyze(""), 0, true);
        let kinds: Vec<CandidateKind> = candidates.iter().map(|c| c.kind).collect();
        let mut sorted = kinds.clone();
        sorted.sort();
        assert_eq!(kinds, sorted);
        assert_eq!(candidates[0].label, "text");
        assert_eq!(candidates[3].label, "[Template]");
    }

    #[test]
    fn test_snippets_can_be_disabled() {
        let candidates = complete(&analyze(""), 0, false);
        assert!(candidates.iter().all(|c| c.kind != CandidateKind::Snippet));
    }

    #[test]
    fn test_element_context() {
        let text = "div {  }";
        let labels = labels(text, 6);
        assert!(labels.contains(&"style".to_string()));
        assert!(labels.contains(&"span".to_string()));
        assert!(!labels.contains(&"[Template]".to_string()));
    }

    #[test]
    fn test_style_excludes_script_symbols() {
        let text = "div { style {  } script {  } }";
        let style = labels(text, offset_of(text, "style { "));
        let script = labels(text, offset_of(text, "script { "));

        assert!(style.contains(&"color".to_string()));
        assert!(style.contains(&"@Style".to_string()));
        assert!(!style.contains(&"listen".to_string()));
        assert!(!style.contains(&"{{".to_string()));

        assert!(script.contains(&"listen".to_string()));
        assert!(script.contains(&"document".to_string()));
        assert!(!script.contains(&"color".to_string()));
        assert!(!script.contains(&"inherit".to_string()));
    }

    #[test]
    fn test_unterminated_style_still_completes() {
        let text = "style {";
        assert!(labels(text, text.len()).contains(&"color".to_string()));
    }

    #[test]
    fn test_declared_definitions_are_offered() {
        let text = "[Template] @Style Theme { }\n[Custom] @Element Card { }\n\
                    [Template] @Style Theme { }\ndiv { style {  } }";
        let style = labels(text, offset_of(text, "style { "));
        assert_eq!(style.iter().filter(|l| *l == "@Style Theme").count(), 1);
        assert!(!style.contains(&"@Element Card".to_string()));

        let element = labels(text, offset_of(text, "div { "));
        assert!(element.contains(&"@Element Card".to_string()));
        assert_eq!(element.last().map(String::as_str), Some("@Element Card"));
    }

    #[test]
    fn test_definition_bodies_follow_their_type() {
        let text = "[Template] @Style A {  }\n[Template] @Var B {  }";
        assert_eq!(
            context_at(&analyze(text), offset_of(text, "A { ")),
            CompletionContext::Style
        );
        assert_eq!(
            context_at(&analyze(text), offset_of(text, "B { ")),
            CompletionContext::Silent
        );
    }

    #[test]
    fn test_silent_contexts() {
        let text = "text { Hello } // note\n[Origin] @Html { <br> } div { title: \"x y\"; }";
        let model = analyze(text);
        assert!(complete(&model, offset_of(text, "text { "), true).is_empty());
        assert!(complete(&model, offset_of(text, "// no"), true).is_empty());
        assert!(complete(&model, offset_of(text, "@Html { "), true).is_empty());
        assert!(complete(&model, offset_of(text, "\"x "), true).is_empty());
    }

    #[test]
    fn test_configuration_keys() {
        let text = "[Configuration] {  }";
        let labels = labels(text, offset_of(text, "{ "));
        assert_eq!(labels[0], "INDEX_INITIAL_COUNT");
        assert!(labels.contains(&"DEBUG_MODE".to_string()));
    }

    #[test]
    fn test_namespace_is_top_level() {
        let text = "[Namespace] ui {  }";
        assert_eq!(
            context_at(&analyze(text), offset_of(text, "ui { ")),
            CompletionContext::TopLevel
        );
    }

    #[test]
    fn test_candidates_are_unresolved_until_resolve() {
        let candidate = complete(&analyze(""), 0, false).remove(0);
        assert!(candidate.detail.is_none());

        let resolved = resolve(candidate);
        assert_eq!(resolved.detail.as_deref(), Some("Text block"));
        assert_eq!(resolved.documentation.as_deref(), Some("A block of text content."));
    }

    #[test]
    fn test_resolve_definition_key() {
        let text = "[Custom] @Element Card { }\ndiv {  }";
        let candidate = complete(&analyze(text), offset_of(text, "div { "), false)
            .into_iter()
            .find(|c| c.label == "@Element Card")
            .unwrap();
        let resolved = resolve(candidate);
        assert_eq!(resolved.detail.as_deref(), Some("[Custom] @Element"));
    }

    #[test]
    fn test_resolve_unknown_key_is_noop() {
        let candidate = CompletionCandidate::new("x", CandidateKind::Symbol, "nope:x".to_string());
        assert_eq!(resolve(candidate.clone()), candidate);

        let candidate = CompletionCandidate::new(
            "x",
            CandidateKind::Symbol,
            "css:not-a-property".to_string(),
        );
        assert_eq!(resolve(candidate.clone()), candidate);
    }

    #[test]
    fn test_resolve_item_reads_data() {
        let item = to_completion_item(0, complete(&analyze(""), 0, false).remove(1));
        assert_eq!(item.label, "style");
        assert!(item.detail.is_none());

        let resolved = resolve_item(item);
        assert_eq!(resolved.detail.as_deref(), Some("Style block"));

        let untouched = resolve_item(CompletionItem {
            label: "x".to_string(),
            data: Some(serde_json::json!(5)),
            ..Default::default()
        });
        assert!(untouched.detail.is_none());
    }

    #[test]
    fn test_snippet_item_format() {
        let snippet = complete(&analyze(""), 0, true)
            .into_iter()
            .find(|c| c.kind == CandidateKind::Snippet)
            .unwrap();
        let item = to_completion_item(7, snippet);
        assert_eq!(item.kind, Some(CompletionItemKind::SNIPPET));
        assert_eq!(item.insert_text_format, Some(InsertTextFormat::SNIPPET));
        assert_eq!(item.sort_text.as_deref(), Some("0007"));
    }
}
