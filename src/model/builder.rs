//! Incremental document construction.

use super::{Element, OutputDocument, PageLayout};

/// Append-only builder for an [`OutputDocument`].
///
/// Heading and paragraph appends do nothing when the text is blank, so
/// every text element maps to exactly one non-empty source line.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    doc: OutputDocument,
}

impl DocumentBuilder {
    /// Start a document with the given page layout.
    pub fn new(layout: PageLayout) -> Self {
        Self {
            doc: OutputDocument::new(layout),
        }
    }

    /// Start a document rebuilt from raw page text.
    pub fn fallback(layout: PageLayout) -> Self {
        let mut doc = OutputDocument::new(layout);
        doc.fallback = true;
        Self { doc }
    }

    /// Append a page break.
    pub fn append_page_break(&mut self) {
        self.doc.elements.push(Element::PageBreak);
    }

    /// Append a heading. `level` is clamped to 1..=2.
    pub fn append_heading(&mut self, text: &str, level: u8) {
        if text.trim().is_empty() {
            return;
        }
        self.doc
            .elements
            .push(Element::heading(text, level.clamp(1, 2)));
    }

    /// Append a paragraph.
    pub fn append_paragraph(&mut self, text: &str, monospace: bool, indented: bool) {
        if text.trim().is_empty() {
            return;
        }
        self.doc.elements.push(Element::Paragraph {
            text: text.to_string(),
            monospace,
            indented,
        });
    }

    /// Append the empty paragraph that follows a multi-line block.
    pub fn append_blank_separator(&mut self) {
        self.doc.elements.push(Element::Separator);
    }

    /// Number of elements appended so far.
    pub fn element_count(&self) -> usize {
        self.doc.len()
    }

    /// Number of text-bearing elements appended so far.
    pub fn content_count(&self) -> usize {
        self.doc.content_count()
    }

    /// Page layout of the document under construction.
    pub fn layout(&self) -> PageLayout {
        self.doc.layout
    }

    /// Finish building.
    pub fn finish(self) -> OutputDocument {
        self.doc
    }
}
