//! PDF header detection.
//!
//! Inputs are checked for a `%PDF-M.m` header before lopdf is asked to
//! parse them, so that a mis-selected file fails fast with a clear reason.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Bytes needed to read the magic plus an `M.m` version.
const HEADER_LEN: usize = PDF_MAGIC.len() + 3;

/// PDF version read from the file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PdfVersion {
    /// Major version
    pub major: u8,
    /// Minor version
    pub minor: u8,
}

impl std::fmt::Display for PdfVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Read the PDF version from the first bytes of a file.
pub fn detect_version_from_path<P: AsRef<Path>>(path: P) -> Result<PdfVersion> {
    let mut header = Vec::with_capacity(16);
    File::open(path)?.take(16).read_to_end(&mut header)?;
    detect_version_from_bytes(&header)
}

/// Read the PDF version from a byte prefix.
///
/// Returns [`Error::UnknownFormat`] when the magic is missing and
/// [`Error::UnsupportedVersion`] when the version is not `M.m` with a major
/// version of 1 or 2.
pub fn detect_version_from_bytes(data: &[u8]) -> Result<PdfVersion> {
    if data.len() < HEADER_LEN || !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let raw = &data[PDF_MAGIC.len()..HEADER_LEN];
    match raw {
        [major @ b'1'..=b'2', b'.', minor @ b'0'..=b'9'] => Ok(PdfVersion {
            major: major - b'0',
            minor: minor - b'0',
        }),
        _ => Err(Error::UnsupportedVersion(
            String::from_utf8_lossy(raw).into_owned(),
        )),
    }
}

/// Validate a file's PDF header, discarding the version.
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<()> {
    detect_version_from_path(path).map(|_| ())
}

/// Check if a file starts with a supported PDF header.
pub fn is_pdf<P: AsRef<Path>>(path: P) -> bool {
    detect_version_from_path(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_versions() {
        let v = detect_version_from_bytes(b"%PDF-1.7\n%\xe2\xe3").unwrap();
        assert_eq!(v, PdfVersion { major: 1, minor: 7 });
        assert_eq!(v.to_string(), "1.7");

        let v = detect_version_from_bytes(b"%PDF-2.0\n").unwrap();
        assert_eq!(v.major, 2);
    }

    #[test]
    fn test_detect_not_pdf() {
        assert!(matches!(
            detect_version_from_bytes(b"PK\x03\x04 docx archive"),
            Err(Error::UnknownFormat)
        ));
        assert!(matches!(
            detect_version_from_bytes(b"%PDF"),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_detect_bad_version() {
        assert!(matches!(
            detect_version_from_bytes(b"%PDF-x.y\n"),
            Err(Error::UnsupportedVersion(v)) if v == "x.y"
        ));
        assert!(detect_version_from_bytes(b"%PDF-9.1\n").is_err());
    }

    #[test]
    fn test_detect_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("a.pdf");
        let txt = dir.path().join("a.txt");
        std::fs::write(&pdf, b"%PDF-1.4\n%%EOF\n").unwrap();
        std::fs::write(&txt, b"hello").unwrap();

        assert!(is_pdf(&pdf));
        assert!(!is_pdf(&txt));
        assert!(!is_pdf(dir.path().join("missing.pdf")));
    }
}
