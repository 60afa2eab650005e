//! Document elements.

use serde::{Deserialize, Serialize};

/// A single element of the output document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    /// Hard page break between two source pages
    PageBreak,

    /// A heading
    Heading {
        /// Heading text
        text: String,
        /// Heading level (1 or 2)
        level: u8,
    },

    /// A paragraph of text
    Paragraph {
        /// Paragraph text
        text: String,
        /// Render in a monospace font
        monospace: bool,
        /// Indent from the left margin
        indented: bool,
    },

    /// Empty paragraph preserving the gap after a multi-line block
    Separator,
}

impl Element {
    /// Create a heading element.
    pub fn heading(text: impl Into<String>, level: u8) -> Self {
        Element::Heading {
            text: text.into(),
            level,
        }
    }

    /// Create an unstyled paragraph element.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Element::Paragraph {
            text: text.into(),
            monospace: false,
            indented: false,
        }
    }

    /// Create a monospace, indented code paragraph.
    pub fn code(text: impl Into<String>) -> Self {
        Element::Paragraph {
            text: text.into(),
            monospace: true,
            indented: true,
        }
    }

    /// Text carried by the element, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Element::Heading { text, .. } | Element::Paragraph { text, .. } => Some(text),
            Element::PageBreak | Element::Separator => None,
        }
    }

    /// Check if this element carries source text.
    pub fn is_content(&self) -> bool {
        self.text().is_some()
    }

    /// Check if this is a heading.
    pub fn is_heading(&self) -> bool {
        matches!(self, Element::Heading { .. })
    }

    /// Check if this is a page break.
    pub fn is_page_break(&self) -> bool {
        matches!(self, Element::PageBreak)
    }

    /// Check if this is a paragraph without any styling.
    pub fn is_plain_paragraph(&self) -> bool {
        matches!(
            self,
            Element::Paragraph {
                monospace: false,
                indented: false,
                ..
            }
        )
    }
}
