//! Extraction options and configuration.

/// Error handling mode for per-page extraction failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail the conversion on the first unreadable page
    Strict,
    /// Log the failure, treat the page as empty and continue
    #[default]
    Lenient,
}

/// Tuning for grouping positioned text into lines and blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    /// Baseline difference, as a fraction of font size, still counted as
    /// the same line
    pub line_tolerance: f32,

    /// Line gap, as a multiple of the page's average line spacing, that
    /// starts a new block
    pub block_gap_factor: f32,

    /// Font size difference (points) that starts a new block
    pub font_size_jump: f32,

    /// Approximate glyph width as a fraction of font size, used to
    /// estimate span widths and indentation
    pub glyph_width: f32,

    /// Minimum indentation, in glyph widths, rendered as leading spaces
    pub min_indent_glyphs: usize,
}

impl LayoutOptions {
    /// Create layout options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the block gap factor.
    pub fn with_block_gap_factor(mut self, factor: f32) -> Self {
        self.block_gap_factor = factor;
        self
    }

    /// Set the line tolerance.
    pub fn with_line_tolerance(mut self, tolerance: f32) -> Self {
        self.line_tolerance = tolerance;
        self
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            line_tolerance: 0.3,
            block_gap_factor: 1.5,
            font_size_jump: 1.0,
            glyph_width: 0.5,
            min_indent_glyphs: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_error_mode_is_lenient() {
        assert_eq!(ErrorMode::default(), ErrorMode::Lenient);
    }

    #[test]
    fn test_layout_options_builder() {
        let options = LayoutOptions::new()
            .with_block_gap_factor(2.0)
            .with_line_tolerance(0.5);
        assert_eq!(options.block_gap_factor, 2.0);
        assert_eq!(options.line_tolerance, 0.5);
        assert_eq!(options.min_indent_glyphs, 2);
    }
}
