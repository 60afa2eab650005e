//! Layout analysis for PDF pages.
//!
//! Text-showing operators are collected as positioned spans, spans on the
//! same baseline are merged into lines, and vertically adjacent lines with
//! regular spacing are merged into blocks. Column detection is not
//! attempted: lines are read top to bottom.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};

use super::backend::{decode_text_simple, BBox, TextBlock};
use super::options::LayoutOptions;

/// TJ adjustment (thousandths of a text space unit) treated as a word gap.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Leading used by `T*` until a `TL` operator sets one.
const DEFAULT_LEADING: f32 = 12.0;

/// Smallest font size (points) whose glyph width is used for indentation.
const MIN_INDENT_FONT_SIZE: f32 = 1.0;

/// Upper bound on synthesized leading spaces.
const MAX_INDENT_GLYPHS: usize = 8;

/// A run of text with position information.
#[derive(Debug, Clone)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// Estimated width of the text
    pub width: f32,
    /// Effective font size in points
    pub font_size: f32,
}

impl TextSpan {
    fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Spans sharing a baseline.
#[derive(Debug, Clone)]
pub struct TextLine {
    /// Spans sorted by X position
    pub spans: Vec<TextSpan>,
    /// Baseline of the first span
    pub y: f32,
    /// Leftmost X position
    pub x: f32,
    /// Dominant font size, weighted by text length
    pub font_size: f32,
}

impl TextLine {
    fn from_spans(mut spans: Vec<TextSpan>) -> Self {
        spans.sort_by(|a, b| a.x.total_cmp(&b.x));

        let total_chars: usize = spans.iter().map(|s| s.text.chars().count()).sum();
        let weighted: f32 = spans
            .iter()
            .map(|s| s.font_size * s.text.chars().count() as f32)
            .sum();
        let font_size = if total_chars > 0 {
            weighted / total_chars as f32
        } else {
            spans.first().map(|s| s.font_size).unwrap_or(0.0)
        };

        let y = spans.first().map(|s| s.y).unwrap_or(0.0);
        let x = spans.first().map(|s| s.x).unwrap_or(0.0);

        Self {
            spans,
            y,
            x,
            font_size,
        }
    }

    /// Combined text of all spans.
    ///
    /// A space is inserted between spans separated by a visible gap, except
    /// between characters of scripts written without word spaces.
    pub fn text(&self, glyph_width: f32) -> String {
        let mut result = String::new();

        for (i, span) in self.spans.iter().enumerate() {
            if i > 0 {
                let prev = &self.spans[i - 1];
                let gap = span.x - prev.right();
                let threshold = span.font_size * glyph_width * 0.2;

                let spaceless = prev.text.chars().last().is_some_and(is_spaceless_script_char)
                    && span.text.chars().next().is_some_and(is_spaceless_script_char);
                let has_space = prev.text.ends_with(char::is_whitespace)
                    || span.text.starts_with(char::is_whitespace);

                if gap > threshold && !spaceless && !has_space {
                    result.push(' ');
                }
            }
            result.push_str(&span.text);
        }

        result
    }

    fn bbox(&self) -> BBox {
        let right = self
            .spans
            .iter()
            .map(TextSpan::right)
            .fold(self.x, f32::max);
        BBox::new(
            self.x,
            self.y - self.font_size * 0.2,
            right,
            self.y + self.font_size * 0.8,
        )
    }
}

/// Layout analyzer for one document.
pub struct LayoutAnalyzer<'a> {
    doc: &'a LopdfDocument,
    options: &'a LayoutOptions,
}

impl<'a> LayoutAnalyzer<'a> {
    /// Create a new layout analyzer.
    pub fn new(doc: &'a LopdfDocument, options: &'a LayoutOptions) -> Self {
        Self { doc, options }
    }

    /// Extract text blocks from a page.
    pub fn extract_blocks(&self, page_id: ObjectId) -> Result<Vec<TextBlock>> {
        let spans = self.extract_spans(page_id)?;
        let lines = self.group_spans_into_lines(spans);
        let blocks = self.group_lines_into_blocks(lines);
        log::debug!("Page {:?}: {} text blocks", page_id, blocks.len());
        Ok(blocks)
    }

    /// Extract positioned spans from a page's content stream.
    pub fn extract_spans(&self, page_id: ObjectId) -> Result<Vec<TextSpan>> {
        let fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;
        let content = self
            .doc
            .get_page_content(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;
        self.parse_content_stream(&content, &fonts)
    }

    fn parse_content_stream(
        &self,
        content: &[u8],
        fonts: &BTreeMap<Vec<u8>, &Dictionary>,
    ) -> Result<Vec<TextSpan>> {
        let content =
            lopdf::content::Content::decode(content).map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut spans = Vec::new();
        let mut font_name: Vec<u8> = Vec::new();
        let mut font_size: f32 = 12.0;
        let mut matrix = TextMatrix::default();
        let mut in_text = false;

        for op in content.operations {
            match op.operator.as_str() {
                "BT" => {
                    in_text = true;
                    matrix = TextMatrix::default();
                }
                "ET" => in_text = false,
                "Tf" => {
                    if let [Object::Name(name), size, ..] = op.operands.as_slice() {
                        if !fonts.contains_key(name) {
                            log::debug!(
                                "Font {} not in page resources",
                                String::from_utf8_lossy(name)
                            );
                        }
                        font_name = name.clone();
                        font_size = get_number(size).unwrap_or(12.0);
                    }
                }
                "TL" => {
                    if let Some(leading) = op.operands.first().and_then(get_number) {
                        matrix.leading = leading;
                    }
                }
                "Td" | "TD" => {
                    if let [tx, ty, ..] = op.operands.as_slice() {
                        let tx = get_number(tx).unwrap_or(0.0);
                        let ty = get_number(ty).unwrap_or(0.0);
                        if op.operator == "TD" {
                            matrix.leading = -ty;
                        }
                        matrix.translate(tx, ty);
                    }
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        let n: Vec<f32> = op
                            .operands
                            .iter()
                            .take(6)
                            .map(|o| get_number(o).unwrap_or(0.0))
                            .collect();
                        matrix.set(n[0], n[1], n[2], n[3], n[4], n[5]);
                    }
                }
                "T*" => matrix.next_line(),
                "Tj" | "TJ" | "'" | "\"" if in_text => {
                    if op.operator == "'" || op.operator == "\"" {
                        matrix.next_line();
                    }
                    let encoding = fonts
                        .get(&font_name)
                        .and_then(|f| f.get_font_encoding(self.doc).ok());
                    let decode = |bytes: &[u8]| match encoding {
                        Some(ref enc) => LopdfDocument::decode_text(enc, bytes)
                            .unwrap_or_else(|_| decode_text_simple(bytes)),
                        None => decode_text_simple(bytes),
                    };
                    let text = match op.operator.as_str() {
                        "TJ" => match op.operands.first() {
                            Some(Object::Array(items)) => decode_tj_array(items, &decode),
                            _ => String::new(),
                        },
                        "\"" => op
                            .operands
                            .get(2)
                            .map(|o| decode_string(o, &decode))
                            .unwrap_or_default(),
                        _ => op
                            .operands
                            .first()
                            .map(|o| decode_string(o, &decode))
                            .unwrap_or_default(),
                    };

                    if !text.trim().is_empty() {
                        let (x, y) = matrix.position();
                        let size = font_size * matrix.scale();
                        let width = text.chars().count() as f32 * size * self.options.glyph_width;
                        spans.push(TextSpan {
                            text,
                            x,
                            y,
                            width,
                            font_size: size,
                        });
                    }
                }
                _ => {}
            }
        }

        Ok(spans)
    }

    /// Group spans into lines by baseline, top to bottom.
    pub fn group_spans_into_lines(&self, mut spans: Vec<TextSpan>) -> Vec<TextLine> {
        // PDF Y grows upwards
        spans.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

        let mut lines = Vec::new();
        let mut current: Vec<TextSpan> = Vec::new();
        let mut current_y: Option<f32> = None;

        for span in spans {
            let tolerance = span.font_size.abs() * self.options.line_tolerance;
            match current_y {
                Some(y) if (span.y - y).abs() <= tolerance => current.push(span),
                _ => {
                    if !current.is_empty() {
                        lines.push(TextLine::from_spans(std::mem::take(&mut current)));
                    }
                    current_y = Some(span.y);
                    current.push(span);
                }
            }
        }

        if !current.is_empty() {
            lines.push(TextLine::from_spans(current));
        }

        lines
    }

    /// Group lines into blocks separated by large gaps or font size jumps.
    pub fn group_lines_into_blocks(&self, lines: Vec<TextLine>) -> Vec<TextBlock> {
        let avg_spacing = average_line_spacing(&lines);
        let mut blocks = Vec::new();
        let mut current: Vec<TextLine> = Vec::new();

        for line in lines {
            if let Some(prev) = current.last() {
                if self.should_break_block(prev, &line, avg_spacing) {
                    blocks.push(self.build_block(std::mem::take(&mut current)));
                }
            }
            current.push(line);
        }

        if !current.is_empty() {
            blocks.push(self.build_block(current));
        }

        blocks
    }

    fn should_break_block(&self, prev: &TextLine, curr: &TextLine, avg_spacing: f32) -> bool {
        let spacing = (prev.y - curr.y).abs();
        spacing > avg_spacing * self.options.block_gap_factor
            || (prev.font_size - curr.font_size).abs() > self.options.font_size_jump
    }

    /// Join lines with newlines, rendering indentation relative to the
    /// block's left edge as leading spaces.
    fn build_block(&self, lines: Vec<TextLine>) -> TextBlock {
        let left = lines.iter().map(|l| l.x).fold(f32::INFINITY, f32::min);
        let mut bbox: Option<BBox> = None;
        let mut text_lines = Vec::with_capacity(lines.len());

        for line in &lines {
            let mut text = String::new();
            if let Some(indent) = self.indent_glyphs(line, left) {
                text.push_str(&" ".repeat(indent));
            }
            text.push_str(&line.text(self.options.glyph_width));
            text_lines.push(text);

            let line_box = line.bbox();
            bbox = Some(bbox.map_or(line_box, |b| b.union(&line_box)));
        }

        TextBlock::new(bbox.unwrap_or_default(), text_lines.join("\n"))
    }

    /// Leading spaces for `line`, or `None` below the indentation threshold.
    ///
    /// Lines set in a size below [`MIN_INDENT_FONT_SIZE`] (including zero and
    /// mirrored negative sizes) carry no usable glyph width and are never
    /// indented. The result is capped at [`MAX_INDENT_GLYPHS`] or the
    /// threshold, whichever is larger.
    fn indent_glyphs(&self, line: &TextLine, left: f32) -> Option<usize> {
        let size = line.font_size.abs();
        if !size.is_finite() || size < MIN_INDENT_FONT_SIZE {
            return None;
        }

        let glyph = size * self.options.glyph_width;
        let offset = (line.x - left) / glyph;
        if !offset.is_finite() || offset <= 0.0 {
            return None;
        }

        let cap = self.options.min_indent_glyphs.max(MAX_INDENT_GLYPHS);
        let indent = (offset.round() as usize).min(cap);
        (indent >= self.options.min_indent_glyphs).then_some(indent)
    }
}

fn average_line_spacing(lines: &[TextLine]) -> f32 {
    let spacings: Vec<f32> = lines
        .windows(2)
        .map(|w| (w[0].y - w[1].y).abs())
        .filter(|s| *s > 0.1)
        .collect();

    if spacings.is_empty() {
        return DEFAULT_LEADING;
    }
    spacings.iter().sum::<f32>() / spacings.len() as f32
}

fn decode_string(obj: &Object, decode: &dyn Fn(&[u8]) -> String) -> String {
    match obj {
        Object::String(bytes, _) => decode(bytes),
        _ => String::new(),
    }
}

/// Decode a TJ array, turning large negative adjustments into spaces.
fn decode_tj_array(items: &[Object], decode: &dyn Fn(&[u8]) -> String) -> String {
    let mut combined = String::new();

    for item in items {
        match item {
            Object::String(bytes, _) => combined.push_str(&decode(bytes)),
            other => {
                let Some(n) = get_number(other) else {
                    continue;
                };
                let wants_space = -n > TJ_SPACE_THRESHOLD
                    && combined
                        .chars()
                        .last()
                        .is_some_and(|c| !c.is_whitespace() && !is_spaceless_script_char(c));
                if wants_space {
                    combined.push(' ');
                }
            }
        }
    }

    combined
}

/// Text matrix for tracking the start of the current line.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
    leading: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            leading: DEFAULT_LEADING,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self) {
        self.translate(0.0, -self.leading);
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Check if a character belongs to a script written without word spaces
/// (Chinese ideographs, Japanese kana). Hangul uses spaces and is excluded.
fn is_spaceless_script_char(c: char) -> bool {
    matches!(c as u32,
        0x4E00..=0x9FFF
        | 0x3400..=0x4DBF
        | 0x20000..=0x2EBEF
        | 0x3040..=0x30FF
        | 0x3000..=0x303F)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, x: f32, y: f32) -> TextSpan {
        TextSpan {
            text: text.to_string(),
            x,
            y,
            width: text.chars().count() as f32 * 6.0,
            font_size: 12.0,
        }
    }

    fn analyzer_lines(spans: Vec<TextSpan>) -> Vec<TextBlock> {
        let doc = LopdfDocument::with_version("1.5");
        let options = LayoutOptions::default();
        let analyzer = LayoutAnalyzer::new(&doc, &options);
        let lines = analyzer.group_spans_into_lines(spans);
        analyzer.group_lines_into_blocks(lines)
    }

    #[test]
    fn test_spans_on_same_baseline_join() {
        let blocks = analyzer_lines(vec![span("world", 136.0, 700.0), span("Hello", 100.0, 700.5)]);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text, "Hello world");
    }

    #[test]
    fn test_adjacent_spans_without_gap_do_not_get_space() {
        let blocks = analyzer_lines(vec![span("Hel", 100.0, 700.0), span("lo", 118.0, 700.0)]);
        assert_eq!(blocks[0].text, "Hello");
    }

    #[test]
    fn test_regular_spacing_forms_one_block() {
        let blocks = analyzer_lines(vec![
            span("Lab 3", 72.0, 700.0),
            span("This is intro text.", 72.0, 686.0),
        ]);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text, "Lab 3\nThis is intro text.");
    }

    #[test]
    fn test_large_gap_splits_blocks() {
        let blocks = analyzer_lines(vec![
            span("First", 72.0, 700.0),
            span("Second", 72.0, 686.0),
            span("Third", 72.0, 672.0),
            span("Far away", 72.0, 600.0),
        ]);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].text, "Far away");
    }

    #[test]
    fn test_indentation_rendered_as_spaces() {
        let blocks = analyzer_lines(vec![
            span("def total(xs):", 72.0, 700.0),
            span("return sum(xs)", 96.0, 686.0),
        ]);
        assert_eq!(blocks[0].text, "def total(xs):\n    return sum(xs)");
    }

    #[test]
    fn test_deep_indentation_is_capped() {
        let blocks = analyzer_lines(vec![
            span("root", 72.0, 700.0),
            span("nested", 432.0, 686.0),
        ]);
        assert_eq!(blocks[0].text, format!("root\n{}nested", " ".repeat(MAX_INDENT_GLYPHS)));
    }

    #[test]
    fn test_degenerate_font_sizes_are_not_indented() {
        for size in [0.0, -12.0, 0.5, f32::NAN] {
            let mut first = span("visible", 72.0, 700.0);
            let mut second = span("hidden layer", 73.0, 686.0);
            first.font_size = size;
            second.font_size = size;

            let blocks = analyzer_lines(vec![first, second]);
            let lines: Vec<&str> = blocks.iter().flat_map(|b| b.text.lines()).collect();
            assert_eq!(lines, vec!["visible", "hidden layer"], "font size {size}");
        }
    }

    #[test]
    fn test_mirrored_font_size_uses_magnitude() {
        let mut first = span("def total(xs):", 72.0, 700.0);
        let mut second = span("return sum(xs)", 96.0, 686.0);
        first.font_size = -12.0;
        second.font_size = -12.0;

        let blocks = analyzer_lines(vec![first, second]);
        let lines: Vec<&str> = blocks.iter().flat_map(|b| b.text.lines()).collect();
        assert_eq!(lines.last(), Some(&"    return sum(xs)"));
    }

    #[test]
    fn test_block_bbox_covers_lines() {
        let blocks = analyzer_lines(vec![span("One", 72.0, 700.0), span("Two", 80.0, 686.0)]);
        let bbox = blocks[0].bbox;
        assert_eq!(bbox.x0, 72.0);
        assert!(bbox.y1 > 700.0);
        assert!(bbox.y0 < 686.0);
    }

    #[test]
    fn test_tj_array_spacing() {
        let items = vec![
            Object::string_literal("Hello"),
            Object::Integer(-250),
            Object::string_literal("world"),
            Object::Integer(-50),
            Object::string_literal("!"),
        ];
        assert_eq!(decode_tj_array(&items, &decode_text_simple), "Hello world!");
    }

    #[test]
    fn test_text_matrix_leading() {
        let mut m = TextMatrix::default();
        m.set(1.0, 0.0, 0.0, 1.0, 72.0, 700.0);
        m.leading = 14.0;
        m.next_line();
        assert_eq!(m.position(), (72.0, 686.0));
    }

    #[test]
    fn test_spaceless_script() {
        assert!(is_spaceless_script_char('中'));
        assert!(is_spaceless_script_char('あ'));
        assert!(!is_spaceless_script_char('한'));
        assert!(!is_spaceless_script_char('a'));
    }
}
