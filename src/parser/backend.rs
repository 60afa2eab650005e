//! Page text source abstraction.
//!
//! The conversion engine only needs two views of each page: positioned
//! text blocks and the raw flattened text. [`PageSource`] isolates the
//! concrete PDF library (lopdf) behind exactly those two calls.

use std::path::{Path, PathBuf};

use lopdf::{Document as LopdfDocument, ObjectId};
use serde::{Deserialize, Serialize};

use crate::detect::{detect_format_from_path, detect_version_from_bytes};
use crate::error::{Error, Result};

use super::layout::LayoutAnalyzer;
use super::options::LayoutOptions;

/// Path reported for documents loaded with [`LopdfSource::from_bytes`].
pub const MEMORY_SOURCE: &str = "<memory>";

/// Axis-aligned bounding box in PDF points (origin bottom-left).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    /// Left edge
    pub x0: f32,
    /// Bottom edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Top edge
    pub y1: f32,
}

impl BBox {
    /// Create a bounding box from its edges.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Width of the box.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Height of the box.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// A region of text on a page.
///
/// `text` may contain embedded newlines, one per logical line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Bounding region
    pub bbox: BBox,
    /// Raw text payload
    pub text: String,
}

impl TextBlock {
    /// Create a text block.
    pub fn new(bbox: BBox, text: impl Into<String>) -> Self {
        Self {
            bbox,
            text: text.into(),
        }
    }

    /// Create a text block without position information.
    pub fn unpositioned(text: impl Into<String>) -> Self {
        Self::new(BBox::default(), text)
    }
}

/// Read-only access to the text of a document's pages.
///
/// Pages are addressed by 0-based index. A source is consumed by
/// [`close`](PageSource::close), so it is released exactly once.
pub trait PageSource {
    /// Number of pages.
    fn page_count(&self) -> usize;

    /// Positioned text blocks of a page, in extraction order.
    fn text_blocks(&self, page: usize) -> Result<Vec<TextBlock>>;

    /// Raw flattened text of a page.
    fn raw_text(&self, page: usize) -> Result<String>;

    /// Release the underlying document.
    fn close(self)
    where
        Self: Sized,
    {
    }
}

/// Simple text decoding fallback when no font encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

// ---------------------------------------------------------------------------
// LopdfSource: concrete implementation backed by lopdf
// ---------------------------------------------------------------------------

/// [`PageSource`] backed by `lopdf::Document`.
pub struct LopdfSource {
    doc: LopdfDocument,
    pages: Vec<(u32, ObjectId)>,
    layout: LayoutOptions,
    path: Option<PathBuf>,
}

impl LopdfSource {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_layout(path, LayoutOptions::default())
    }

    /// Open a PDF file with custom layout options.
    pub fn open_with_layout<P: AsRef<Path>>(path: P, layout: LayoutOptions) -> Result<Self> {
        let path = path.as_ref();

        detect_format_from_path(path).map_err(|e| Error::source_open(path, e))?;

        let doc = LopdfDocument::load(path).map_err(|e| Error::source_open(path, e))?;
        let mut source = Self::from_document(doc, layout)?;
        source.path = Some(path.to_path_buf());

        log::debug!(
            "Opened {} ({} pages)",
            path.display(),
            source.pages.len()
        );
        Ok(source)
    }

    /// Load a PDF from an in-memory byte slice.
    ///
    /// Failures are reported as [`Error::SourceOpen`] with the path
    /// [`MEMORY_SOURCE`].
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        detect_version_from_bytes(data).map_err(|e| Error::source_open(MEMORY_SOURCE, e))?;

        let doc =
            LopdfDocument::load_mem(data).map_err(|e| Error::source_open(MEMORY_SOURCE, e))?;
        Self::from_document(doc, LayoutOptions::default())
    }

    /// Encrypted documents are opened with the empty user password, which
    /// covers permission-only protection. Anything else is [`Error::Encrypted`].
    fn from_document(mut doc: LopdfDocument, layout: LayoutOptions) -> Result<Self> {
        if doc.is_encrypted() {
            doc.decrypt("").map_err(|e| {
                log::debug!("Decryption with empty password failed: {}", e);
                Error::Encrypted
            })?;
            log::debug!("Decrypted document with the empty user password");
        }

        let pages = doc.get_pages().into_iter().collect();
        Ok(Self {
            doc,
            pages,
            layout,
            path: None,
        })
    }

    /// Path the document was opened from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    fn page_entry(&self, page: usize) -> Result<(u32, ObjectId)> {
        self.pages.get(page).copied().ok_or_else(|| Error::PageRead {
            page,
            reason: format!("out of range (document has {} pages)", self.pages.len()),
        })
    }
}

impl PageSource for LopdfSource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn text_blocks(&self, page: usize) -> Result<Vec<TextBlock>> {
        let (_, page_id) = self.page_entry(page)?;
        LayoutAnalyzer::new(&self.doc, &self.layout).extract_blocks(page_id)
    }

    fn raw_text(&self, page: usize) -> Result<String> {
        let (page_num, _) = self.page_entry(page)?;
        self.doc
            .extract_text(&[page_num])
            .map_err(|e| Error::PageRead {
                page,
                reason: e.to_string(),
            })
    }

    fn close(self) {
        if let Some(ref path) = self.path {
            log::debug!("Closed {}", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_text_simple_utf8() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
    }

    #[test]
    fn test_decode_text_simple_latin1() {
        // 0xE9 = 'é' in Latin-1
        let bytes = vec![0x48, 0x65, 0x6C, 0x6C, 0xE9];
        assert_eq!(decode_text_simple(&bytes), "Hellé");
    }

    #[test]
    fn test_decode_text_simple_utf16be() {
        let bytes = vec![0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69];
        assert_eq!(decode_text_simple(&bytes), "Hi");
    }

    #[test]
    fn test_bbox_union() {
        let a = BBox::new(10.0, 10.0, 50.0, 20.0);
        let b = BBox::new(5.0, 15.0, 40.0, 30.0);
        let u = a.union(&b);
        assert_eq!(u, BBox::new(5.0, 10.0, 50.0, 30.0));
        assert_eq!(u.width(), 45.0);
        assert_eq!(u.height(), 20.0);
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        let err = LopdfSource::from_bytes(b"not a pdf").err();
        assert!(matches!(
            err,
            Some(Error::SourceOpen { ref path, .. }) if path == Path::new(MEMORY_SOURCE)
        ));
    }

    #[test]
    fn test_open_missing_file_is_source_open() {
        let result = LopdfSource::open("/nonexistent/lab.pdf");
        assert!(matches!(result, Err(Error::SourceOpen { .. })));
    }
}
