//! OCR fallback using PaddleOCR through PyO3.
//!
//! Scanned PDFs are rasterized page by page with `pdftoppm` (poppler) and
//! each page image is fed to the OCR engine. Image inputs are recognized
//! directly. The engine is optional: when the `paddleocr` package is not
//! importable the whole run degrades to PDF-only conversion.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use pyo3::prelude::*;
use pyo3::types::PyDict;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// PaddleOCR engine holding the loaded Python recognizer.
pub struct OcrEngine {
    ocr: Py<PyAny>,
}

impl OcrEngine {
    /// Try to load the OCR engine, returning `None` when it is unavailable.
    pub fn detect() -> Option<Self> {
        match Self::new() {
            Ok(engine) => Some(engine),
            Err(err) => {
                log::debug!("OCR engine unavailable: {err:#}");
                None
            }
        }
    }

    /// Load PaddleOCR (English, CPU inference).
    ///
    /// The model files are downloaded by the Python package itself on
    /// first use.
    pub fn new() -> Result<Self> {
        let ocr = Python::with_gil(|py| -> Result<Py<PyAny>> {
            let module = py
                .import("paddleocr")
                .context("Failed to import paddleocr. Install it with 'pip install paddleocr'.")?;
            let ocr_class = module.getattr("PaddleOCR")?;

            let kwargs = PyDict::new(py);
            kwargs.set_item("lang", "en")?;

            let ocr = ocr_class
                .call((), Some(&kwargs))
                .context("Failed to initialize PaddleOCR")?;

            Ok(ocr.unbind())
        })?;

        Ok(Self { ocr })
    }

    /// Recognize text in a single image file.
    pub fn recognize(&self, image_path: &Path) -> Result<String> {
        Python::with_gil(|py| {
            let ocr = self.ocr.bind(py);
            let path = image_path.to_string_lossy();

            let result = ocr
                .call_method1("predict", (path.as_ref(),))
                .context("OCR recognition failed")?;

            Ok(parse_prediction(&result).join("\n"))
        })
    }

    /// Recognize a scanned PDF by rasterizing every page and running OCR
    /// on each page image. Page texts are joined with paragraph breaks;
    /// pages without text are dropped.
    pub fn ocr_pdf(&self, pdf_path: &Path) -> Result<String> {
        let temp_dir = TempDir::new()?;

        eprintln!("   Converting PDF pages to images...");
        let pages = rasterize_pdf(pdf_path, temp_dir.path())?;

        eprintln!("   Reading {} scanned page(s), this takes longer...", pages.len());
        let pb = ProgressBar::new(pages.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} pages")
                .unwrap()
                .progress_chars("#>-"),
        );

        let mut text = String::new();
        for page_path in pages {
            // Guard deletes the page image as soon as recognition is done,
            // whether or not it succeeded.
            let page = TempImage::new(page_path);
            let recognized = self.recognize(page.path())?;

            if !recognized.trim().is_empty() {
                if !text.is_empty() {
                    text.push_str("\n\n");
                }
                text.push_str(&recognized);
            }
            pb.inc(1);
        }
        pb.finish_and_clear();

        Ok(text)
    }
}

/// Pull recognized lines out of the engine's response.
///
/// The response is an undocumented keyed structure (`text_recognition` ->
/// `text`); a missing or reshaped key reads as "no text found" rather than
/// an error.
fn parse_prediction(result: &Bound<'_, PyAny>) -> Vec<String> {
    if result.is_none() {
        return Vec::new();
    }
    let Ok(block) = result.get_item("text_recognition") else {
        return Vec::new();
    };
    let Ok(texts) = block.get_item("text") else {
        return Vec::new();
    };
    texts.extract::<Vec<String>>().unwrap_or_default()
}

/// Rasterize all pages of a PDF into `dir` as PNGs, returned in page order.
fn rasterize_pdf(pdf_path: &Path, dir: &Path) -> Result<Vec<PathBuf>> {
    let output = Command::new("pdftoppm")
        .arg("-png")
        .arg(pdf_path)
        .arg(dir.join("page"))
        .output()
        .context("Failed to run pdftoppm (install poppler-utils)")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("pdftoppm failed: {}", stderr);
    }

    let mut pages: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("png"))
        .collect();

    // pdftoppm zero-pads page numbers, so name order is page order
    pages.sort();
    Ok(pages)
}

/// A rasterized page image that is removed from disk when dropped.
struct TempImage {
    path: PathBuf,
}

impl TempImage {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempImage {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_image_removed_on_drop() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("page-1.png");
        std::fs::write(&file, b"img").unwrap();

        {
            let page = TempImage::new(file.clone());
            assert!(page.path().exists());
        }
        assert!(!file.exists());
    }

    #[test]
    fn test_temp_image_removed_when_recognition_fails() {
        fn recognize_and_fail(page: &TempImage) -> Result<String> {
            anyhow::bail!("recognition failed for {}", page.path().display())
        }

        let dir = TempDir::new().unwrap();
        let file = dir.path().join("page-2.png");
        std::fs::write(&file, b"img").unwrap();

        let result = {
            let page = TempImage::new(file.clone());
            recognize_and_fail(&page)
        };
        assert!(result.is_err());
        assert!(!file.exists());
    }

    #[test]
    fn test_temp_image_tolerates_missing_file() {
        let dir = TempDir::new().unwrap();
        let page = TempImage::new(dir.path().join("never-created.png"));
        drop(page);
    }
}
