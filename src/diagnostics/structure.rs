//! Structural validation over analyzed regions
//!
//! Checks placement and headers of definitions, origins and namespaces:
//! - `[Template]`/`[Custom]` live at the top level or inside a `[Namespace]`
//! - definitions declare a known type and a valid name
//! - `[Origin]` declares a known type
//! - `[Namespace]` is named
//! - `[Configuration]` appears only at the top level
//! - element tags are plausible identifiers

use lazy_static::lazy_static;
use regex::Regex;

use crate::parser::{Region, RegionKind};
use crate::schema;

use super::DiagnosticCollector;

lazy_static! {
    static ref DEFINITION_NAME_RE: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_-]*$").unwrap();
    static ref ELEMENT_NAME_RE: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9-]*$").unwrap();
}

/// Validate the regions of a document, appending warnings and hints.
pub fn validate_structure(regions: &[Region], collector: &mut DiagnosticCollector) {
    for region in regions {
        let parent = region.parent.and_then(|id| regions.get(id));

        match region.kind {
            RegionKind::Template | RegionKind::Custom => {
                validate_definition(region, parent, collector)
            }
            RegionKind::Origin => validate_origin(region, collector),
            RegionKind::Namespace if region.name.is_none() => {
                collector.add_warning(
                    "`[Namespace]` needs a name".to_string(),
                    region.header,
                );
            }
            RegionKind::Configuration if parent.is_some() => {
                collector.add_warning(
                    "`[Configuration]` must appear at the top level".to_string(),
                    region.header,
                );
            }
            RegionKind::Element => {
                if let Some(name) = &region.name {
                    if !ELEMENT_NAME_RE.is_match(name) {
                        collector.add_hint(
                            format!("'{}' is not a valid element name", name),
                            region.header,
                        );
                    }
                }
            }
            _ => {}
        }
    }
}

fn validate_definition(
    region: &Region,
    parent: Option<&Region>,
    collector: &mut DiagnosticCollector,
) {
    let keyword = region.kind.keyword();

    if parent.is_some_and(|parent| parent.kind != RegionKind::Namespace) {
        collector.add_warning(
            format!(
                "`{}` definitions belong at the top level or inside a `[Namespace]`",
                keyword
            ),
            region.header,
        );
    }

    match region.definition_type.as_deref() {
        None => collector.add_warning(
            format!("`{}` needs a type: @Style, @Element or @Var", keyword),
            region.header,
        ),
        Some(ty) if !schema::is_definition_type(ty) => collector.add_warning(
            format!("Unknown definition type '{}' for `{}`", ty, keyword),
            region.header,
        ),
        Some(_) => {}
    }

    match region.name.as_deref() {
        None => collector.add_warning(format!("`{}` needs a name", keyword), region.header),
        Some(name) if !DEFINITION_NAME_RE.is_match(name) => collector.add_warning(
            format!("'{}' is not a valid definition name", name),
            region.header,
        ),
        Some(_) => {}
    }
}

fn validate_origin(region: &Region, collector: &mut DiagnosticCollector) {
    match region.definition_type.as_deref() {
        None => collector.add_warning(
            "`[Origin]` needs a type: @Html, @Style or @JavaScript".to_string(),
            region.header,
        ),
        Some(ty) if !schema::is_origin_type(ty) => collector.add_warning(
            format!("Unknown origin type '{}'", ty),
            region.header,
        ),
        Some(_) => {}
    }
}
