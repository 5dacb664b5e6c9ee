//! Parser module: tokenizer and region analysis

mod lexer;
mod model;
mod regions;

pub use lexer::{Lexer, Token, TokenKind};
pub use model::{QuietSpan, Region, RegionId, RegionKind, StructuralModel};
pub use regions::analyze;

/// Half-open byte range into a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}
