//! Direct PDF text extraction.

use anyhow::{Context, Result};
use std::path::Path;

/// Text pulled out of a PDF by direct parsing.
#[derive(Debug, Clone)]
pub struct PdfText {
    /// Non-blank page text joined with paragraph separators
    pub text: String,
    /// Number of pages seen in the extractor output
    pub pages: usize,
}

/// Extract text from a PDF file.
///
/// Works for PDFs with a real text layer; scanned documents come back
/// (near-)empty and are the caller's cue to fall back to OCR. Parse errors
/// are reported per file, never fatal to the batch.
pub fn extract_text(path: &Path) -> Result<PdfText> {
    let raw = pdf_extract::extract_text(path)
        .with_context(|| format!("Failed to extract text from PDF: {}", path.display()))?;

    Ok(join_pages(&raw))
}

/// The extractor separates pages with form feeds. Drop blank pages and
/// rejoin the rest with paragraph breaks.
fn join_pages(raw: &str) -> PdfText {
    let mut pages = 0;
    let mut text = String::with_capacity(raw.len());

    for page in raw.split('\x0C') {
        pages += 1;
        let page = page.trim();
        if page.is_empty() {
            continue;
        }
        if !text.is_empty() {
            text.push_str("\n\n");
        }
        text.push_str(page);
    }

    PdfText { text, pages }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_pages_single() {
        let parsed = join_pages("Hello world");
        assert_eq!(parsed.text, "Hello world");
        assert_eq!(parsed.pages, 1);
    }

    #[test]
    fn test_join_pages_multiple() {
        let parsed = join_pages("Page one\x0CPage two\x0CPage three");
        assert_eq!(parsed.text, "Page one\n\nPage two\n\nPage three");
        assert_eq!(parsed.pages, 3);
    }

    #[test]
    fn test_join_pages_skips_blank() {
        let parsed = join_pages("First\x0C   \n \x0CLast");
        assert_eq!(parsed.text, "First\n\nLast");
        assert_eq!(parsed.pages, 3);
    }

    #[test]
    fn test_join_pages_all_blank() {
        let parsed = join_pages(" \x0C \x0C ");
        assert_eq!(parsed.text, "");
        assert_eq!(parsed.pages, 3);
    }

    #[test]
    fn test_extract_text_bad_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let bogus = dir.path().join("not-a-pdf.pdf");
        std::fs::write(&bogus, b"this is not a pdf").unwrap();
        assert!(extract_text(&bogus).is_err());
    }
}
