//! # pdf2docx
//!
//! Convert the text of PDF lecture notes and exercise sheets into Word
//! documents with headings, code blocks and paragraphs restored.
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> pdf2docx::Result<()> {
//!     // Writes lab3.docx next to the input
//!     let output = pdf2docx::convert_file("lab3.pdf")?;
//!     println!("{}", output.display());
//!     Ok(())
//! }
//! ```
//!
//! ## How it works
//!
//! - Positioned text is read from each page with `lopdf` and grouped into
//!   lines and blocks.
//! - Every line is classified as a heading, sub-heading, code or list line,
//!   or a regular paragraph by configurable keyword rules.
//! - When no block text is found anywhere, the raw page text is used as
//!   plain paragraphs.
//! - The document is written as `.docx` with `docx-rs`.

pub mod classify;
pub mod convert;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use classify::{ClassifiedLine, ClassifierRules, LineClassifier, Role};
pub use convert::{
    convert_batch, output_path_for, BatchOptions, BatchReport, ConvertOptions, ConvertReport,
    ConvertStats, Converter,
};
pub use detect::{detect_version_from_bytes, detect_version_from_path, is_pdf, PdfVersion};
pub use error::{Error, Result};
pub use model::{DocumentBuilder, Element, OutputDocument, PageLayout};
pub use parser::{ErrorMode, LayoutOptions, LopdfSource, PageSource, TextBlock};
pub use render::{DocumentWriter, DocxStyle, DocxWriter};

use std::path::{Path, PathBuf};

/// Convert a PDF file to `.docx` and return the output path.
///
/// The output is written next to the input with the same stem.
///
/// # Example
///
/// ```no_run
/// let output = pdf2docx::convert_file("week1/lab3.pdf").unwrap();
/// assert_eq!(output, std::path::Path::new("week1/lab3.docx"));
/// ```
pub fn convert_file<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    convert_file_with_options(path, ConvertOptions::default())
}

/// Convert a PDF file with custom options and return the output path.
///
/// # Example
///
/// ```no_run
/// use pdf2docx::{convert_file_with_options, ConvertOptions};
///
/// let options = ConvertOptions::new().strict().with_output_dir("out");
/// let output = convert_file_with_options("lab3.pdf", options).unwrap();
/// ```
pub fn convert_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ConvertOptions,
) -> Result<PathBuf> {
    Converter::new(options)
        .convert_path(path)
        .map(|report| report.output)
}

/// Classify every line of a PDF without writing anything.
///
/// Lines are returned in document order, grouped by page. Unreadable pages
/// and the raw-text fallback are handled as in [`convert_file`].
pub fn classify_file<P: AsRef<Path>>(
    path: P,
    rules: ClassifierRules,
) -> Result<Vec<Vec<ClassifiedLine>>> {
    Converter::new(ConvertOptions::new().with_rules(rules)).classify_path(path)
}
