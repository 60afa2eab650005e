//! PDF page text extraction.

mod backend;
mod layout;
mod options;

pub use backend::{decode_text_simple, BBox, LopdfSource, PageSource, TextBlock, MEMORY_SOURCE};
pub use layout::{LayoutAnalyzer, TextLine, TextSpan};
pub use options::{ErrorMode, LayoutOptions};
