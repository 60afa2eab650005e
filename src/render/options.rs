//! Rendering options for Word output.

use crate::model::TWIPS_PER_INCH;

/// Paragraph and run styling applied by [`DocxWriter`](super::DocxWriter).
///
/// Sizes are in half-points and distances in twips, the units OOXML
/// stores them in.
#[derive(Debug, Clone, PartialEq)]
pub struct DocxStyle {
    /// Font family of monospace runs
    pub code_font: String,

    /// Size of monospace runs (half-points)
    pub code_size: usize,

    /// Left indent of indented paragraphs (twips)
    pub indent: i32,

    /// Space after code and regular paragraphs (twips)
    pub space_after: u32,

    /// Sizes of level 1 and level 2 headings (half-points)
    pub heading_sizes: [usize; 2],
}

impl DocxStyle {
    /// Create a style with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the monospace font family.
    pub fn with_code_font(mut self, font: impl Into<String>) -> Self {
        self.code_font = font.into();
        self
    }

    /// Set the monospace run size in half-points.
    pub fn with_code_size(mut self, half_points: usize) -> Self {
        self.code_size = half_points.max(1);
        self
    }

    /// Set the indent of indented paragraphs in twips.
    pub fn with_indent(mut self, twips: i32) -> Self {
        self.indent = twips;
        self
    }

    /// Set the paragraph space-after in twips.
    pub fn with_space_after(mut self, twips: u32) -> Self {
        self.space_after = twips;
        self
    }

    /// Style id of the heading paragraph style for a level.
    pub fn heading_style_id(level: u8) -> &'static str {
        if level <= 1 {
            "Heading1"
        } else {
            "Heading2"
        }
    }

    /// Heading size for a level, in half-points.
    pub fn heading_size(&self, level: u8) -> usize {
        if level <= 1 {
            self.heading_sizes[0]
        } else {
            self.heading_sizes[1]
        }
    }
}

impl Default for DocxStyle {
    fn default() -> Self {
        Self {
            code_font: "Courier New".to_string(),
            // 0.12in is 8.64pt
            code_size: 17,
            indent: (TWIPS_PER_INCH / 2) as i32,
            space_after: TWIPS_PER_INCH / 10,
            heading_sizes: [32, 26],
        }
    }
}
