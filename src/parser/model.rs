//! Structural model of a CHTL document

use crate::diagnostics::Diagnostic;

use super::Span;

/// Index of a region inside its `StructuralModel`
pub type RegionId = usize;

/// The structural kind of a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    /// `div { ... }`
    Element,
    /// `text { ... }`
    Text,
    /// `style { ... }`
    Style,
    /// `script { ... }`
    Script,
    /// `[Template] @Type Name { ... }`
    Template,
    /// `[Custom] @Type Name { ... }`
    Custom,
    /// `[Origin] @Type name? { ... }`
    Origin,
    /// `[Namespace] name { ... }`
    Namespace,
    /// `[Configuration] { ... }`
    Configuration,
}

impl RegionKind {
    /// Keyword that introduces the region, as written in source
    pub fn keyword(self) -> &'static str {
        match self {
            RegionKind::Element => "element",
            RegionKind::Text => "text",
            RegionKind::Style => "style",
            RegionKind::Script => "script",
            RegionKind::Template => "[Template]",
            RegionKind::Custom => "[Custom]",
            RegionKind::Origin => "[Origin]",
            RegionKind::Namespace => "[Namespace]",
            RegionKind::Configuration => "[Configuration]",
        }
    }

    pub fn is_definition(self) -> bool {
        matches!(self, RegionKind::Template | RegionKind::Custom)
    }

    /// Bodies whose content is not CHTL markup; braces inside only nest.
    pub fn is_opaque(self) -> bool {
        matches!(
            self,
            RegionKind::Text | RegionKind::Style | RegionKind::Script | RegionKind::Origin
        )
    }

    /// Bodies scanned as raw text, counting braces only.
    pub fn is_raw(self) -> bool {
        matches!(self, RegionKind::Script | RegionKind::Origin)
    }
}

/// A braced block classified by the analyzer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub kind: RegionKind,
    /// Element tag, definition name, origin name or namespace name
    pub name: Option<String>,
    /// `@Style`, `@Element`, `@Var`, ... for definitions and origins
    pub definition_type: Option<String>,
    /// Tokens before the opening brace
    pub header: Span,
    /// Offset of the `{`
    pub open_brace: usize,
    /// Offset of the matching `}`; `None` when unterminated
    pub close_brace: Option<usize>,
    pub parent: Option<RegionId>,
    /// Number of enclosing regions
    pub depth: usize,
}

impl Region {
    pub fn is_terminated(&self) -> bool {
        self.close_brace.is_some()
    }

    /// End of the body; end of document for an unterminated region
    pub fn body_end(&self, document_len: usize) -> usize {
        self.close_brace.unwrap_or(document_len)
    }

    /// Header through closing brace (inclusive)
    pub fn span(&self, document_len: usize) -> Span {
        let end = self.close_brace.map_or(document_len, |close| close + 1);
        Span::new(self.header.start, end)
    }

    /// Whether `offset` lies between the braces
    pub fn body_contains(&self, offset: usize, document_len: usize) -> bool {
        self.open_brace < offset && offset <= self.body_end(document_len)
    }

    /// Label used in messages and outlines
    pub fn display_name(&self) -> String {
        match (&self.kind, &self.name, &self.definition_type) {
            (RegionKind::Element, Some(name), _) => name.clone(),
            (_, Some(name), Some(ty)) => format!("{} {} {}", self.kind.keyword(), ty, name),
            (_, Some(name), None) => format!("{} {}", self.kind.keyword(), name),
            (_, None, Some(ty)) => format!("{} {}", self.kind.keyword(), ty),
            (_, None, None) => self.kind.keyword().to_string(),
        }
    }
}

/// A comment or string literal; completion is suppressed inside it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuietSpan {
    pub span: Span,
    /// Line comments and unterminated tokens also cover their end offset
    pub inclusive_end: bool,
}

impl QuietSpan {
    pub fn contains(&self, offset: usize) -> bool {
        self.span.start < offset
            && (offset < self.span.end || (self.inclusive_end && offset == self.span.end))
    }
}

/// Everything the analyzer derives from a document snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuralModel {
    /// Regions in order of their opening brace
    pub regions: Vec<Region>,
    pub diagnostics: Vec<Diagnostic>,
    pub quiet: Vec<QuietSpan>,
    /// Byte length of the analyzed text
    pub len: usize,
}

impl StructuralModel {
    /// Innermost region whose body contains `offset`.
    ///
    /// Ties on depth go to the most recently opened region.
    pub fn enclosing_region(&self, offset: usize) -> Option<&Region> {
        self.regions
            .iter()
            .filter(|region| region.body_contains(offset, self.len))
            .max_by_key(|region| (region.depth, region.open_brace))
    }

    pub fn is_quiet(&self, offset: usize) -> bool {
        self.quiet.iter().any(|quiet| quiet.contains(offset))
    }

    pub fn roots(&self) -> impl Iterator<Item = (RegionId, &Region)> {
        self.regions
            .iter()
            .enumerate()
            .filter(|(_, region)| region.parent.is_none())
    }

    pub fn children(&self, parent: RegionId) -> impl Iterator<Item = (RegionId, &Region)> {
        self.regions
            .iter()
            .enumerate()
            .filter(move |(_, region)| region.parent == Some(parent))
    }

    /// Named `[Template]`/`[Custom]` definitions of the given type, in source order
    pub fn definitions<'a>(&'a self, definition_type: &'a str) -> impl Iterator<Item = &'a Region> {
        self.regions.iter().filter(move |region| {
            region.kind.is_definition()
                && region.name.is_some()
                && region.definition_type.as_deref() == Some(definition_type)
        })
    }
}
