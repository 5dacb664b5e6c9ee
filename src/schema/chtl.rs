//! CHTL keywords, definition types and completion vocabularies
//!
//! Every table here is ordered; completion presents entries in table order.

/// A vocabulary entry with its resolve-time description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub label: &'static str,
    pub detail: &'static str,
    pub documentation: &'static str,
}

const fn entry(label: &'static str, detail: &'static str, documentation: &'static str) -> Entry {
    Entry {
        label,
        detail,
        documentation,
    }
}

/// A snippet with its body in LSP snippet syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snippet {
    pub label: &'static str,
    pub body: &'static str,
    pub detail: &'static str,
    pub documentation: &'static str,
}

/// Keywords that open a block inside an element or at the top level
pub const BLOCK_KEYWORDS: &[Entry] = &[
    entry("text", "Text block", "A block of text content."),
    entry("style", "Style block", "A block for CSS styles."),
    entry("script", "Script block", "A block for JavaScript code."),
];

/// Bracketed keywords that open a definition or directive
pub const DEFINITION_KEYWORDS: &[Entry] = &[
    entry(
        "[Template]",
        "Template definition",
        "Defines a reusable CHTL template: `[Template] @Style Name { ... }`.",
    ),
    entry(
        "[Custom]",
        "Custom definition",
        "Defines a customizable CHTL component that can be specialized where it is used.",
    ),
    entry(
        "[Origin]",
        "Origin embedding",
        "Embeds raw HTML, CSS or JavaScript that is emitted without processing.",
    ),
    entry(
        "[Import]",
        "Import",
        "Imports definitions from another CHTL file or module.",
    ),
    entry(
        "[Namespace]",
        "Namespace",
        "Groups definitions under a name to avoid collisions between files.",
    ),
    entry(
        "[Configuration]",
        "Configuration block",
        "Overrides compiler settings for the current file.",
    ),
];

/// Bracket keywords accepted by the analyzer, without brackets
pub const BRACKET_KEYWORDS: &[&str] = &[
    "Template",
    "Custom",
    "Origin",
    "Import",
    "Namespace",
    "Configuration",
    // Only meaningful inside [Configuration]
    "Name",
    "Info",
    "Export",
];

/// Types a `[Template]` or `[Custom]` may define
pub const DEFINITION_TYPES: &[&str] = &["@Style", "@Element", "@Var"];

/// Types an `[Origin]` block may embed
pub const ORIGIN_TYPES: &[&str] = &["@Html", "@Style", "@JavaScript"];

/// Keywords valid inside a style body
pub const STYLE_KEYWORDS: &[Entry] = &[
    entry(
        "@Style",
        "Style group usage",
        "Applies the properties of a style template or custom style group.",
    ),
    entry(
        "inherit",
        "Inherit",
        "Explicitly inherits the properties of another style group.",
    ),
    entry(
        "delete",
        "Delete",
        "Removes properties or inherited groups from a custom style group.",
    ),
];

/// Keywords valid inside a script body
pub const SCRIPT_KEYWORDS: &[Entry] = &[
    entry(
        "{{",
        "Enhanced selector",
        "Selects elements by CSS selector: `{{.box}}`, `{{#id}}`, `{{button[0]}}`.",
    ),
    entry(
        "->",
        "Arrow access",
        "Calls CHTL JS functions on an enhanced selector: `{{box}}->listen({...})`.",
    ),
];

/// Snippets offered where block keywords are
pub const SNIPPETS: &[Snippet] = &[
    Snippet {
        label: "text { }",
        body: "text {\n\t$0\n}",
        detail: "Text block",
        documentation: "Inserts a text block.",
    },
    Snippet {
        label: "style { }",
        body: "style {\n\t$0\n}",
        detail: "Style block",
        documentation: "Inserts a local style block.",
    },
    Snippet {
        label: "script { }",
        body: "script {\n\t$0\n}",
        detail: "Script block",
        documentation: "Inserts a local script block.",
    },
    Snippet {
        label: "[Template] @Style",
        body: "[Template] @Style ${1:Name}\n{\n\t$0\n}",
        detail: "Style template",
        documentation: "Declares a reusable group of style properties.",
    },
    Snippet {
        label: "[Template] @Element",
        body: "[Template] @Element ${1:Name}\n{\n\t$0\n}",
        detail: "Element template",
        documentation: "Declares a reusable group of elements.",
    },
    Snippet {
        label: "[Custom] @Element",
        body: "[Custom] @Element ${1:Name}\n{\n\t$0\n}",
        detail: "Custom element",
        documentation: "Declares an element group that can be specialized at its use site.",
    },
];

/// HTML elements offered as symbols in markup context
pub const HTML_ELEMENTS: &[&str] = &[
    "html", "head", "title", "meta", "link", "body", "header", "nav", "main", "section",
    "article", "aside", "footer", "div", "span", "p", "a", "img", "ul", "ol", "li", "h1", "h2",
    "h3", "h4", "h5", "h6", "button", "form", "input", "label", "select", "option", "textarea",
    "table", "thead", "tbody", "tr", "th", "td", "br", "hr", "pre", "code",
];

/// CSS properties offered as symbols in style context
pub const CSS_PROPERTIES: &[&str] = &[
    "color",
    "background",
    "background-color",
    "width",
    "height",
    "margin",
    "padding",
    "border",
    "border-radius",
    "display",
    "position",
    "top",
    "right",
    "bottom",
    "left",
    "flex",
    "justify-content",
    "align-items",
    "font-size",
    "font-weight",
    "font-family",
    "line-height",
    "text-align",
    "opacity",
    "overflow",
    "z-index",
    "transition",
    "transform",
    "cursor",
];

/// CHTL JS functions available after `->`
pub const CHTL_JS_FUNCTIONS: &[Entry] = &[
    entry(
        "listen",
        "Event listeners",
        "Binds event handlers: `{{box}}->listen({ click: () => {} });`.",
    ),
    entry(
        "delegate",
        "Event delegation",
        "Delegates events from a parent to matching children.",
    ),
    entry(
        "animate",
        "Animation",
        "Runs a keyframe animation described by an object literal.",
    ),
    entry(
        "vir",
        "Virtual object",
        "Declares a virtual object whose keys resolve at compile time.",
    ),
    entry("module", "Module loader", "Loads JavaScript modules in dependency order."),
];

/// Browser globals offered in script context
pub const DOM_SYMBOLS: &[&str] = &["document", "window", "console", "localStorage", "fetch"];

/// Compiler settings accepted inside `[Configuration]`
pub const CONFIGURATION_KEYS: &[Entry] = &[
    entry(
        "INDEX_INITIAL_COUNT",
        "Index base",
        "Initial index used by `element[index]` selectors. Defaults to 0.",
    ),
    entry("DEBUG_MODE", "Debug output", "Enables compiler debug logging."),
    entry(
        "DISABLE_NAME_GROUP",
        "Disable [Name]",
        "Ignores the `[Name]` keyword group in this configuration.",
    ),
    entry(
        "DISABLE_STYLE_AUTO_ADD_CLASS",
        "Disable auto class",
        "Stops local style blocks from adding class selectors to their element.",
    ),
    entry(
        "DISABLE_STYLE_AUTO_ADD_ID",
        "Disable auto id",
        "Stops local style blocks from adding id selectors to their element.",
    ),
    entry(
        "DISABLE_DEFAULT_NAMESPACE",
        "Disable default namespace",
        "Imported files no longer get a namespace named after the file.",
    ),
];

pub fn is_bracket_keyword(word: &str) -> bool {
    BRACKET_KEYWORDS.contains(&word)
}

pub fn is_definition_type(ty: &str) -> bool {
    DEFINITION_TYPES.contains(&ty)
}

pub fn is_origin_type(ty: &str) -> bool {
    ORIGIN_TYPES.contains(&ty)
}

/// Find an entry by label in any of the given tables
pub fn find_entry(tables: &[&'static [Entry]], label: &str) -> Option<&'static Entry> {
    tables
        .iter()
        .flat_map(|table| table.iter())
        .find(|entry| entry.label == label)
}

pub fn find_snippet(label: &str) -> Option<&'static Snippet> {
    SNIPPETS.iter().find(|snippet| snippet.label == label)
}
