//! Rendering of finished documents to storage.

mod docx;
mod options;

pub use docx::DocxWriter;
pub use options::DocxStyle;

use std::path::Path;

use crate::error::Result;
use crate::model::OutputDocument;

/// Persists a finished document.
///
/// Implementations report write failures as
/// [`Error::Persistence`](crate::Error::Persistence).
pub trait DocumentWriter {
    /// Write `doc` to `path`, replacing any existing file.
    fn write(&self, doc: &OutputDocument, path: &Path) -> Result<()>;
}
