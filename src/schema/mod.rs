//! Schema module for CHTL vocabulary

mod chtl;

pub use chtl::*;
