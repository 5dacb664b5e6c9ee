//! Document outline built from region nesting

use tower_lsp::lsp_types::{DocumentSymbol, SymbolKind};

use crate::line_index::LineIndex;
use crate::parser::{Region, RegionId, RegionKind, StructuralModel};

/// Nested symbols mirroring the region tree of `model`.
pub fn document_symbols(model: &StructuralModel, text: &str) -> Vec<DocumentSymbol> {
    let index = LineIndex::new(text);
    model
        .roots()
        .map(|(id, region)| build_symbol(model, &index, id, region))
        .collect()
}

fn build_symbol(
    model: &StructuralModel,
    index: &LineIndex<'_>,
    id: RegionId,
    region: &Region,
) -> DocumentSymbol {
    let children: Vec<DocumentSymbol> = model
        .children(id)
        .map(|(child_id, child)| build_symbol(model, index, child_id, child))
        .collect();

    let kind = match region.kind {
        RegionKind::Element => SymbolKind::OBJECT,
        RegionKind::Text => SymbolKind::STRING,
        RegionKind::Style => SymbolKind::PROPERTY,
        RegionKind::Script => SymbolKind::FUNCTION,
        RegionKind::Template | RegionKind::Custom => SymbolKind::CLASS,
        RegionKind::Origin => SymbolKind::FILE,
        RegionKind::Namespace => SymbolKind::NAMESPACE,
        RegionKind::Configuration => SymbolKind::PACKAGE,
    };

    let detail = match region.kind {
        RegionKind::Element => Some("element".to_string()),
        _ => region.definition_type.clone(),
    };

    #[allow(deprecated)]
    let symbol = DocumentSymbol {
        name: region.display_name(),
        detail,
        kind,
        tags: None,
        deprecated: None,
        range: index.range(region.span(model.len)),
        selection_range: index.range(region.header),
        children: (!children.is_empty()).then_some(children),
    };
    symbol
}
