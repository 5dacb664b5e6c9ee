//! Region analysis with error recovery
//!
//! Walks the token stream once, classifying each `{` by the header tokens
//! written since the previous statement boundary (`;`, `{` or `}`). Bodies of
//! `text`, `style`, `script` and `[Origin]` are opaque: their braces are
//! matched but never open regions. `script` and `[Origin]` bodies are also
//! raw, so quotes and comment markers inside them are not lexed.
//!
//! Malformed input never aborts the walk; unmatched braces, unterminated
//! blocks and unterminated literals become error diagnostics and unterminated
//! regions keep an open-ended span.

use crate::diagnostics::{validate_structure, DiagnosticCollector};
use crate::schema;

use super::lexer::{Lexer, Token, TokenKind};
use super::model::{QuietSpan, Region, RegionId, RegionKind, StructuralModel};
use super::Span;

/// Derive the structural model of `text`.
///
/// Pure and deterministic: the result depends on nothing but `text`.
pub fn analyze(text: &str) -> StructuralModel {
    let mut builder = RegionBuilder::new(text);
    let mut lexer = Lexer::new(text);
    while let Some(token) = lexer.next() {
        let opens_block = token.kind == TokenKind::LBrace;
        builder.feed(token);
        if opens_block && builder.in_raw_body() {
            lexer.skip_raw_body();
        }
    }
    builder.finish()
}

/// An open brace awaiting its match
#[derive(Debug, Clone, Copy)]
enum Frame {
    Region(RegionId),
    /// Unclassified block, e.g. a CSS rule or `@Element Box { ... }`
    Block(usize),
}

struct RegionBuilder<'a> {
    text: &'a str,
    regions: Vec<Region>,
    stack: Vec<Frame>,
    header: Vec<Token>,
    quiet: Vec<QuietSpan>,
    collector: DiagnosticCollector,
}

/// Classification of a block header
struct Header {
    kind: RegionKind,
    name: Option<String>,
    definition_type: Option<String>,
}

impl<'a> RegionBuilder<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            regions: Vec::new(),
            stack: Vec::new(),
            header: Vec::new(),
            quiet: Vec::new(),
            collector: DiagnosticCollector::new(),
        }
    }

    fn current_region(&self) -> Option<RegionId> {
        self.stack.iter().rev().find_map(|frame| match frame {
            Frame::Region(id) => Some(*id),
            Frame::Block(_) => None,
        })
    }

    fn current_kind(&self) -> Option<RegionKind> {
        self.current_region().map(|id| self.regions[id].kind)
    }

    fn in_opaque_body(&self) -> bool {
        self.current_kind().is_some_and(RegionKind::is_opaque)
    }

    /// Whether the innermost open brace starts a raw region body
    fn in_raw_body(&self) -> bool {
        matches!(self.stack.last(), Some(Frame::Region(id)) if self.regions[*id].kind.is_raw())
    }

    fn feed(&mut self, token: Token) {
        match token.kind {
            kind if kind.is_comment() => {
                self.quiet.push(QuietSpan {
                    span: token.span,
                    inclusive_end: kind != TokenKind::BlockComment || !token.terminated,
                });
                if !token.terminated {
                    self.collector
                        .add_error("Unterminated block comment".to_string(), token.span);
                }
            }
            TokenKind::String => {
                self.quiet.push(QuietSpan {
                    span: token.span,
                    inclusive_end: !token.terminated,
                });
                if !token.terminated {
                    self.collector
                        .add_error("Unterminated string literal".to_string(), token.span);
                }
                self.header.push(token);
            }
            TokenKind::LBrace => {
                self.open(token);
                self.header.clear();
            }
            TokenKind::RBrace => {
                self.close(token);
                self.header.clear();
            }
            TokenKind::Semicolon => self.header.clear(),
            TokenKind::BracketKeyword => {
                let word = &self.text[token.span.start + 1..token.span.end - 1];
                if !self.in_opaque_body() && !schema::is_bracket_keyword(word) {
                    self.collector
                        .add_warning(format!("Unknown keyword `[{}]`", word), token.span);
                }
                self.header.push(token);
            }
            _ => self.header.push(token),
        }
    }

    fn open(&mut self, brace: Token) {
        if self.in_opaque_body() {
            self.stack.push(Frame::Block(brace.span.start));
            return;
        }

        let Some(header) = self.classify() else {
            self.stack.push(Frame::Block(brace.span.start));
            return;
        };

        let header_span = match (self.header.first(), self.header.last()) {
            (Some(first), Some(last)) => Span::new(first.span.start, last.span.end),
            _ => brace.span,
        };
        let depth = self
            .stack
            .iter()
            .filter(|frame| matches!(frame, Frame::Region(_)))
            .count();

        let parent = self.current_region();
        let id = self.regions.len();
        self.regions.push(Region {
            kind: header.kind,
            name: header.name,
            definition_type: header.definition_type,
            header: header_span,
            open_brace: brace.span.start,
            close_brace: None,
            parent,
            depth,
        });
        self.stack.push(Frame::Region(id));
    }

    fn close(&mut self, brace: Token) {
        match self.stack.pop() {
            Some(Frame::Region(id)) => self.regions[id].close_brace = Some(brace.span.start),
            Some(Frame::Block(_)) => {}
            None => self
                .collector
                .add_error("Unmatched `}`".to_string(), brace.span),
        }
    }

    /// Classify the pending header tokens, if they introduce a region.
    fn classify(&self) -> Option<Header> {
        let text = self.text;
        let first = self.header.first()?;
        let rest = &self.header[1..];

        match first.kind {
            TokenKind::Word if rest.is_empty() => {
                let word = first.text(text);
                let kind = match word {
                    "text" => RegionKind::Text,
                    "style" => RegionKind::Style,
                    "script" => RegionKind::Script,
                    _ => RegionKind::Element,
                };
                Some(Header {
                    kind,
                    name: (kind == RegionKind::Element).then(|| word.to_string()),
                    definition_type: None,
                })
            }
            TokenKind::BracketKeyword => {
                let keyword = first.text(text);
                let kind = match &keyword[1..keyword.len() - 1] {
                    "Template" => RegionKind::Template,
                    "Custom" => RegionKind::Custom,
                    "Origin" => RegionKind::Origin,
                    "Namespace" => RegionKind::Namespace,
                    "Configuration" => RegionKind::Configuration,
                    _ => return None,
                };
                let definition_type = rest
                    .iter()
                    .find(|token| token.kind == TokenKind::AtType)
                    .map(|token| token.text(text).to_string());
                let name = rest
                    .iter()
                    .find(|token| token.kind == TokenKind::Word)
                    .map(|token| token.text(text).to_string());
                Some(Header {
                    kind,
                    name,
                    definition_type,
                })
            }
            _ => None,
        }
    }

    fn finish(mut self) -> StructuralModel {
        let len = self.text.len();

        for frame in std::mem::take(&mut self.stack) {
            match frame {
                Frame::Region(id) => {
                    let region = &self.regions[id];
                    self.collector.add_error_with_related(
                        format!("Unterminated `{}` block", region.display_name()),
                        region.span(len),
                        "block opened here".to_string(),
                        region.header,
                    );
                }
                Frame::Block(open) => self
                    .collector
                    .add_error("Unclosed `{`".to_string(), Span::new(open, len)),
            }
        }

        validate_structure(&self.regions, &mut self.collector);

        StructuralModel {
            regions: self.regions,
            diagnostics: self.collector.into_diagnostics(),
            quiet: self.quiet,
            len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;

    fn kinds(model: &StructuralModel) -> Vec<RegionKind> {
        model.regions.iter().map(|r| r.kind).collect()
    }

    #[test]
    fn test_text_block() {
        let model = analyze("text { Hello }");
        assert_eq!(kinds(&model), vec![RegionKind::Text]);
        let region = &model.regions[0];
        assert_eq!(region.header, Span::new(0, 4));
        assert_eq!(region.open_brace, 5);
        assert_eq!(region.close_brace, Some(13));
        assert!(model.diagnostics.is_empty());
    }

    #[test]
    fn test_unterminated_style() {
        let text = "style {";
        let model = analyze(text);

        assert_eq!(model.regions.len(), 1);
        let region = &model.regions[0];
        assert_eq!(region.kind, RegionKind::Style);
        assert!(!region.is_terminated());
        assert_eq!(region.span(model.len), Span::new(0, text.len()));

        assert_eq!(model.diagnostics.len(), 1);
        assert_eq!(model.diagnostics[0].severity, Severity::Error);
        assert_eq!(model.diagnostics[0].span.end, text.len());
    }

    #[test]
    fn test_nesting_and_parents() {
        let text = "html { body { div { style { } script { } } } }";
        let model = analyze(text);
        assert_eq!(
            kinds(&model),
            vec![
                RegionKind::Element,
                RegionKind::Element,
                RegionKind::Element,
                RegionKind::Style,
                RegionKind::Script
            ]
        );
        let parents: Vec<Option<RegionId>> = model.regions.iter().map(|r| r.parent).collect();
        assert_eq!(parents, vec![None, Some(0), Some(1), Some(2), Some(2)]);
        let depths: Vec<usize> = model.regions.iter().map(|r| r.depth).collect();
        assert_eq!(depths, vec![0, 1, 2, 3, 3]);
        assert_eq!(model.regions[2].name.as_deref(), Some("div"));
    }

    #[test]
    fn test_style_rules_do_not_open_regions() {
        let text = "div { style { .box { color: red; } &:hover { color: blue; } } }";
        let model = analyze(text);
        assert_eq!(kinds(&model), vec![RegionKind::Element, RegionKind::Style]);
        assert!(model.regions.iter().all(|r| r.is_terminated()));
        assert!(model.diagnostics.is_empty());
    }

    #[test]
    fn test_script_enhanced_selectors() {
        let text = "script { {{box}}->listen({ click: () => { go(); } }); }";
        let model = analyze(text);
        assert_eq!(kinds(&model), vec![RegionKind::Script]);
        assert_eq!(model.regions[0].close_brace, Some(text.len() - 1));
        assert!(model.diagnostics.is_empty());
    }

    #[test]
    fn test_origin_body_is_raw() {
        let text = "[Origin] @Html { <p>Don't panic</p> }\ndiv {  }";
        let model = analyze(text);
        assert_eq!(kinds(&model), vec![RegionKind::Origin, RegionKind::Element]);
        assert!(model.regions.iter().all(|r| r.is_terminated()));
        assert!(model.diagnostics.is_empty());
        assert!(model.quiet.is_empty());
    }

    #[test]
    fn test_script_body_is_raw() {
        let text = "script { let url = 'http://x'; // don't\n go(url); }\nspan { }";
        let model = analyze(text);
        assert_eq!(kinds(&model), vec![RegionKind::Script, RegionKind::Element]);
        assert_eq!(model.regions[0].close_brace, text.find("}\nspan"));
        assert!(model.diagnostics.is_empty());
    }

    #[test]
    fn test_unclosed_raw_body_reaches_end() {
        let model = analyze("[Origin] @Style { .a { color: red; }");
        assert_eq!(kinds(&model), vec![RegionKind::Origin]);
        assert_eq!(model.diagnostics.len(), 1);
        assert_eq!(model.diagnostics[0].message, "Unterminated `[Origin] @Style` block");
    }

    #[test]
    fn test_definition_headers() {
        let model = analyze("[Template] @Style Theme { color: red; }\n[Custom] @Element Card { }");
        assert_eq!(kinds(&model), vec![RegionKind::Template, RegionKind::Custom]);
        assert_eq!(model.regions[0].definition_type.as_deref(), Some("@Style"));
        assert_eq!(model.regions[0].name.as_deref(), Some("Theme"));
        assert_eq!(model.regions[1].definition_type.as_deref(), Some("@Element"));
        assert_eq!(model.regions[1].name.as_deref(), Some("Card"));
    }

    #[test]
    fn test_element_usage_blocks_are_not_regions() {
        let text = "body { @Element Card { delete span; } }";
        let model = analyze(text);
        assert_eq!(kinds(&model), vec![RegionKind::Element]);
        assert!(model.diagnostics.is_empty());
    }

    #[test]
    fn test_attributes_reset_header() {
        let text = "div { id: box; class: \"wide\"; span { } }";
        let model = analyze(text);
        assert_eq!(kinds(&model), vec![RegionKind::Element, RegionKind::Element]);
        assert_eq!(model.regions[1].name.as_deref(), Some("span"));
    }

    #[test]
    fn test_unmatched_closing_brace() {
        let model = analyze("div { } }");
        assert_eq!(model.diagnostics.len(), 1);
        assert_eq!(model.diagnostics[0].message, "Unmatched `}`");
        assert_eq!(model.diagnostics[0].span, Span::new(8, 9));
    }

    #[test]
    fn test_unknown_bracket_keyword() {
        let model = analyze("[Templat] @Style X { }");
        assert!(model.regions.is_empty());
        assert_eq!(model.diagnostics.len(), 1);
        assert_eq!(model.diagnostics[0].message, "Unknown keyword `[Templat]`");
        assert_eq!(model.diagnostics[0].severity, Severity::Warning);
    }

    #[test]
    fn test_unterminated_string() {
        let model = analyze("text { \"open }");
        assert!(model
            .diagnostics
            .iter()
            .any(|d| d.message == "Unterminated string literal"));
        assert!(model
            .diagnostics
            .iter()
            .any(|d| d.message.starts_with("Unterminated `text` block")));
    }

    #[test]
    fn test_comments_are_quiet() {
        let text = "// note\ndiv { /* c */ }";
        let model = analyze(text);
        assert_eq!(model.quiet.len(), 2);
        assert!(model.is_quiet(3));
        assert!(model.is_quiet(7));
        assert!(!model.is_quiet(9));
    }

    #[test]
    fn test_deterministic() {
        let text = "html { body { [Origin] @Html { <p>{</p> } style { } } ";
        assert_eq!(analyze(text), analyze(text));
    }

    #[test]
    fn test_garbage_does_not_panic() {
        for text in ["}}}{{{", "[", "@", "\"", "/*", "[Template", "é { ü }", "{ ; } ]["] {
            let _ = analyze(text);
        }
    }
}
