//! Word (.docx) writer.

use std::fs::File;
use std::io::{Cursor, Seek, Write};
use std::path::Path;

use docx_rs::{
    AlignmentType, BreakType, Docx, LineSpacing, PageMargin, Paragraph, Run, RunFonts, Style,
    StyleType,
};

use crate::error::{Error, Result};
use crate::model::{Element, OutputDocument, PageLayout};

use super::options::DocxStyle;
use super::DocumentWriter;

/// Writes an [`OutputDocument`] as an Office Open XML word document.
#[derive(Debug, Clone, Default)]
pub struct DocxWriter {
    style: DocxStyle,
}

impl DocxWriter {
    /// Create a writer with the given style.
    pub fn new(style: DocxStyle) -> Self {
        Self { style }
    }

    /// Style used by this writer.
    pub fn style(&self) -> &DocxStyle {
        &self.style
    }

    /// Render a document into an in-memory `.docx` archive.
    pub fn to_bytes(&self, doc: &OutputDocument) -> Result<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        self.pack(doc, &mut buf)
            .map_err(|reason| Error::Other(format!("Failed to pack document: {reason}")))?;
        Ok(buf.into_inner())
    }

    fn pack<W: Write + Seek>(
        &self,
        doc: &OutputDocument,
        out: W,
    ) -> std::result::Result<(), String> {
        self.build(doc)
            .build()
            .pack(out)
            .map_err(|e| e.to_string())
    }

    /// Build the docx-rs document tree.
    pub fn build(&self, doc: &OutputDocument) -> Docx {
        let mut docx = Docx::new()
            .page_margin(page_margin(&doc.layout))
            .add_style(self.heading_style(1))
            .add_style(self.heading_style(2));

        for element in doc {
            docx = docx.add_paragraph(self.paragraph(element, doc.fallback));
        }
        docx
    }

    fn heading_style(&self, level: u8) -> Style {
        Style::new(DocxStyle::heading_style_id(level), StyleType::Paragraph)
            .name(format!("Heading {level}"))
            .size(self.style.heading_size(level))
            .bold()
    }

    fn paragraph(&self, element: &Element, fallback: bool) -> Paragraph {
        match element {
            Element::PageBreak => Paragraph::new().add_run(Run::new().add_break(BreakType::Page)),
            Element::Separator => Paragraph::new(),
            Element::Heading { text, level } => Paragraph::new()
                .style(DocxStyle::heading_style_id(*level))
                .align(AlignmentType::Left)
                .add_run(Run::new().add_text(text)),
            Element::Paragraph {
                text,
                monospace,
                indented,
            } => {
                let mut run = Run::new().add_text(text);
                if *monospace {
                    let font = self.style.code_font.as_str();
                    run = run
                        .fonts(RunFonts::new().ascii(font).hi_ansi(font))
                        .size(self.style.code_size);
                }

                let mut paragraph = Paragraph::new().add_run(run);
                if *indented {
                    paragraph = paragraph.indent(Some(self.style.indent), None, None, None);
                }
                if !fallback {
                    paragraph =
                        paragraph.line_spacing(LineSpacing::new().after(self.style.space_after));
                }
                paragraph
            }
        }
    }
}

impl DocumentWriter for DocxWriter {
    fn write(&self, doc: &OutputDocument, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| Error::persistence(path, e))?;
        self.pack(doc, file)
            .map_err(|reason| Error::persistence(path, reason))?;

        log::debug!("Wrote {} elements to {}", doc.len(), path.display());
        Ok(())
    }
}

fn page_margin(layout: &PageLayout) -> PageMargin {
    PageMargin::new()
        .top(layout.margin_top as i32)
        .bottom(layout.margin_bottom as i32)
        .left(layout.margin_left as i32)
        .right(layout.margin_right as i32)
}
