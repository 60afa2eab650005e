//! Output document and page geometry.

use serde::{Deserialize, Serialize};

use super::Element;

/// Twentieths of a point per inch, the unit of OOXML page geometry.
pub const TWIPS_PER_INCH: u32 = 1440;

/// Page margins of the rendered document, in twips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLayout {
    /// Top margin
    pub margin_top: u32,
    /// Bottom margin
    pub margin_bottom: u32,
    /// Left margin
    pub margin_left: u32,
    /// Right margin
    pub margin_right: u32,
}

impl PageLayout {
    /// Equal margins on all four sides.
    pub fn uniform(twips: u32) -> Self {
        Self {
            margin_top: twips,
            margin_bottom: twips,
            margin_left: twips,
            margin_right: twips,
        }
    }

    /// Equal margins given in inches.
    pub fn uniform_inches(inches: f32) -> Self {
        Self::uniform((inches * TWIPS_PER_INCH as f32).round() as u32)
    }
}

impl Default for PageLayout {
    /// One inch on every side.
    fn default() -> Self {
        Self::uniform(TWIPS_PER_INCH)
    }
}

/// A finished, structured word-processing document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDocument {
    /// Page geometry, fixed at creation
    pub layout: PageLayout,

    /// Elements in document order
    pub elements: Vec<Element>,

    /// Built from raw page text instead of classified blocks
    #[serde(default)]
    pub fallback: bool,
}

impl OutputDocument {
    /// Create an empty document with the given layout.
    pub fn new(layout: PageLayout) -> Self {
        Self {
            layout,
            elements: Vec::new(),
            fallback: false,
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the document has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of elements that carry source text.
    pub fn content_count(&self) -> usize {
        self.elements.iter().filter(|e| e.is_content()).count()
    }

    /// Number of page breaks.
    pub fn page_break_count(&self) -> usize {
        self.elements.iter().filter(|e| e.is_page_break()).count()
    }

    /// Iterate over elements.
    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }

    /// Plain text of all content elements, one per line.
    pub fn plain_text(&self) -> String {
        self.elements
            .iter()
            .filter_map(Element::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<'a> IntoIterator for &'a OutputDocument {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_is_one_inch() {
        let layout = PageLayout::default();
        assert_eq!(layout.margin_top, 1440);
        assert_eq!(layout.margin_right, 1440);
        assert_eq!(layout, PageLayout::uniform_inches(1.0));
    }

    #[test]
    fn test_counts() {
        let mut doc = OutputDocument::default();
        doc.elements.push(Element::heading("Lab 1", 1));
        doc.elements.push(Element::Separator);
        doc.elements.push(Element::PageBreak);
        doc.elements.push(Element::paragraph("Notes"));

        assert_eq!(doc.len(), 4);
        assert_eq!(doc.content_count(), 2);
        assert_eq!(doc.page_break_count(), 1);
        assert_eq!(doc.plain_text(), "Lab 1\nNotes");
    }
}
