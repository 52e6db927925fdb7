//! Input directory scanning for convertible documents.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Image extensions the OCR engine can read directly.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif"];

/// Kind of input document, decides the conversion path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Image,
}

/// A convertible file found in the input directory.
#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    pub kind: DocumentKind,
}

impl Document {
    /// File name for progress output.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Scan `input_dir` (non-recursive) for PDF files, plus supported image
/// files when OCR is available. PDFs are listed before images; within each
/// group the order follows the directory listing.
pub fn discover_documents(input_dir: &Path, include_images: bool) -> Result<Vec<Document>> {
    let entries = std::fs::read_dir(input_dir)
        .with_context(|| format!("Failed to read input directory: {}", input_dir.display()))?;

    let mut pdfs = Vec::new();
    let mut images = Vec::new();

    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        match classify(&path) {
            Some(DocumentKind::Pdf) => pdfs.push(Document {
                path,
                kind: DocumentKind::Pdf,
            }),
            Some(DocumentKind::Image) if include_images => images.push(Document {
                path,
                kind: DocumentKind::Image,
            }),
            _ => {}
        }
    }

    pdfs.extend(images);
    Ok(pdfs)
}

/// Classify a path by its extension (ASCII case-insensitive).
fn classify(path: &Path) -> Option<DocumentKind> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();

    if ext == "pdf" {
        Some(DocumentKind::Pdf)
    } else if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Some(DocumentKind::Image)
    } else {
        None
    }
}
