//! PDF to Word conversion.
//!
//! [`Converter`] drives a [`PageSource`](crate::parser::PageSource) page by
//! page, classifies every line of every text block and builds an
//! [`OutputDocument`](crate::model::OutputDocument). When the block pass
//! produces no text at all, the document is rebuilt from each page's raw
//! text instead.
//!
//! # Example
//!
//! ```no_run
//! use pdf2docx::convert::{ConvertOptions, Converter};
//!
//! fn main() -> pdf2docx::Result<()> {
//!     let converter = Converter::new(ConvertOptions::default());
//!     let report = converter.convert_path("lab3.pdf")?;
//!     println!("wrote {}", report.output.display());
//!     Ok(())
//! }
//! ```

mod batch;
mod converter;

pub use batch::{
    convert_batch, convert_batch_with_progress, BatchOptions, BatchReport, FileOutcome, FileResult,
};
pub use converter::Converter;

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::classify::{ClassifierRules, Role};
use crate::model::PageLayout;
use crate::parser::{ErrorMode, LayoutOptions};
use crate::render::DocxStyle;

/// Extension of converted files.
pub const OUTPUT_EXTENSION: &str = "docx";

/// Options for document conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Line classification rules
    pub rules: ClassifierRules,

    /// Handling of unreadable pages
    pub error_mode: ErrorMode,

    /// Rebuild from raw page text when no block text was found
    pub fallback: bool,

    /// Page margins of the output document
    pub layout: PageLayout,

    /// Grouping of positioned text into lines and blocks
    pub layout_options: LayoutOptions,

    /// Word styling
    pub style: DocxStyle,

    /// Directory for output files (defaults to the input's directory)
    pub output_dir: Option<PathBuf>,
}

impl ConvertOptions {
    /// Create conversion options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the classification rules.
    pub fn with_rules(mut self, rules: ClassifierRules) -> Self {
        self.rules = rules;
        self
    }

    /// Set the page error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Fail on the first unreadable page.
    pub fn strict(self) -> Self {
        self.with_error_mode(ErrorMode::Strict)
    }

    /// Enable or disable the raw text fallback.
    pub fn with_fallback(mut self, enabled: bool) -> Self {
        self.fallback = enabled;
        self
    }

    /// Set the page margins.
    pub fn with_layout(mut self, layout: PageLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Set the text grouping options.
    pub fn with_layout_options(mut self, options: LayoutOptions) -> Self {
        self.layout_options = options;
        self
    }

    /// Set the Word styling.
    pub fn with_style(mut self, style: DocxStyle) -> Self {
        self.style = style;
        self
    }

    /// Write outputs into `dir` instead of next to each input.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            rules: ClassifierRules::default(),
            error_mode: ErrorMode::default(),
            fallback: true,
            layout: PageLayout::default(),
            layout_options: LayoutOptions::default(),
            style: DocxStyle::default(),
            output_dir: None,
        }
    }
}

/// Counters collected during one conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConvertStats {
    /// Pages in the source
    pub pages: usize,
    /// Pages that could not be read
    pub failed_pages: usize,
    /// Non-empty text blocks processed
    pub blocks: usize,
    /// Non-empty lines written
    pub lines: usize,
    /// Lines classified as headings
    pub headings: usize,
    /// Lines classified as sub-headings
    pub subheadings: usize,
    /// Lines classified as code or list content
    pub code_lines: usize,
    /// Lines written as regular paragraphs
    pub paragraphs: usize,
    /// Blank separators after multi-line blocks
    pub separators: usize,
    /// Page breaks
    pub page_breaks: usize,
    /// Document was rebuilt from raw page text
    pub fallback_used: bool,
}

impl ConvertStats {
    pub(crate) fn record(&mut self, role: Role) {
        self.lines += 1;
        match role {
            Role::Heading => self.headings += 1,
            Role::Subheading => self.subheadings += 1,
            Role::CodeOrList => self.code_lines += 1,
            Role::Paragraph => self.paragraphs += 1,
        }
    }

    /// Number of lines with the given role.
    pub fn count(&self, role: Role) -> usize {
        match role {
            Role::Heading => self.headings,
            Role::Subheading => self.subheadings,
            Role::CodeOrList => self.code_lines,
            Role::Paragraph => self.paragraphs,
        }
    }
}

/// Outcome of converting one file.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertReport {
    /// Input PDF
    pub input: PathBuf,
    /// Written document
    pub output: PathBuf,
    /// Conversion counters
    pub stats: ConvertStats,
}

/// Output path next to the input: same stem, `.docx` extension.
pub fn output_path_for<P: AsRef<Path>>(input: P) -> PathBuf {
    input.as_ref().with_extension(OUTPUT_EXTENSION)
}

/// Output path inside `dir` with the input's stem and a `.docx` extension.
pub fn output_path_in<P: AsRef<Path>, D: AsRef<Path>>(input: P, dir: D) -> PathBuf {
    let mut name = input
        .as_ref()
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "output".into());
    name.push(".");
    name.push(OUTPUT_EXTENSION);
    dir.as_ref().join(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_for() {
        assert_eq!(
            output_path_for("/tmp/notes/lab3.pdf"),
            PathBuf::from("/tmp/notes/lab3.docx")
        );
        assert_eq!(output_path_for("lab3.PDF"), PathBuf::from("lab3.docx"));
        assert_eq!(output_path_for("lab3"), PathBuf::from("lab3.docx"));
    }

    #[test]
    fn test_output_path_in() {
        assert_eq!(
            output_path_in("/tmp/notes/lab3.pdf", "/out"),
            PathBuf::from("/out/lab3.docx")
        );
        assert_eq!(
            output_path_in("week.1.pdf", "out"),
            PathBuf::from("out/week.1.docx")
        );
    }

    #[test]
    fn test_options_builder() {
        let options = ConvertOptions::new()
            .strict()
            .with_fallback(false)
            .with_layout(PageLayout::uniform(720))
            .with_output_dir("/out");
        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert!(!options.fallback);
        assert_eq!(options.layout.margin_top, 720);
        assert_eq!(options.output_dir, Some(PathBuf::from("/out")));

        let defaults = ConvertOptions::default();
        assert!(defaults.fallback);
        assert_eq!(defaults.error_mode, ErrorMode::Lenient);
    }

    #[test]
    fn test_stats_record() {
        let mut stats = ConvertStats::default();
        stats.record(Role::Heading);
        stats.record(Role::CodeOrList);
        stats.record(Role::CodeOrList);
        assert_eq!(stats.lines, 3);
        assert_eq!(stats.count(Role::CodeOrList), 2);
        assert_eq!(stats.count(Role::Paragraph), 0);
    }
}
