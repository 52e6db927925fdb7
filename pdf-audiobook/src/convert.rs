//! Per-file conversion pipeline and batch orchestration.

use crate::audio::{self, AudiobookInfo, PcmSegment, PAUSE_BETWEEN_CHUNKS_MS};
use crate::config::NarratorConfig;
use crate::discover::{Document, DocumentKind};
use crate::ocr::OcrEngine;
use crate::pdf;
use crate::text;
use crate::tts::{SpeechBackend, SynthesisOptions};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Below this many characters, direct extraction is considered to have
/// failed and OCR is tried instead.
pub const MIN_EXTRACTED_CHARS: usize = 100;

/// Minimum amount of text worth narrating at all.
pub const MIN_NARRATABLE_CHARS: usize = 50;

/// Why a single file could not be converted. Never fatal to the batch.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("could not read document: {0}")]
    Extraction(#[source] anyhow::Error),

    #[error("not enough text to make an audiobook ({found} chars)")]
    InsufficientText { found: usize },

    #[error("document needs OCR, but no OCR engine is available")]
    OcrUnavailable,

    #[error("no audio could be synthesized")]
    NoAudio,

    #[error("could not encode audiobook: {0}")]
    Encoding(#[source] anyhow::Error),
}

/// Success/failure counts for a batch run.
#[derive(Debug, Default, Clone, Copy)]
pub struct BatchSummary {
    pub successful: usize,
    pub failed: usize,
}

/// Holds the engine handles and walks the pipeline one file at a time.
pub struct Converter {
    tts: Box<dyn SpeechBackend>,
    ocr: Option<OcrEngine>,
    options: SynthesisOptions,
    chunk_size: usize,
    output_dir: PathBuf,
}

impl Converter {
    pub fn new(config: &NarratorConfig, tts: Box<dyn SpeechBackend>, ocr: Option<OcrEngine>) -> Self {
        let options = SynthesisOptions::new()
            .with_voice(config.voice.clone())
            .with_speed(config.speed);

        Self {
            tts,
            ocr,
            options,
            chunk_size: config.chunk_size,
            output_dir: config.output_dir.clone(),
        }
    }

    /// Convert every discovered document in order. One bad file never stops
    /// the batch; failures are reported and counted.
    pub fn run(&self, documents: &[Document]) -> BatchSummary {
        let mut summary = BatchSummary::default();
        let total = documents.len();

        for (i, doc) in documents.iter().enumerate() {
            eprintln!();
            eprintln!("{}", "=".repeat(70));
            eprintln!("File {} of {}: {}", i + 1, total, doc.file_name());
            eprintln!("{}", "=".repeat(70));

            let result = match doc.kind {
                DocumentKind::Pdf => self.convert_pdf(&doc.path),
                DocumentKind::Image => self.convert_image(&doc.path),
            };

            match result {
                Ok(info) => {
                    summary.successful += 1;
                    eprintln!(
                        "   Saved: {} ({:.1} MB, {})",
                        self.output_path_for(&doc.path).display(),
                        info.size_bytes as f64 / (1024.0 * 1024.0),
                        format_duration(info.duration_ms)
                    );
                }
                Err(err) => {
                    summary.failed += 1;
                    log::warn!("conversion failed for {}: {err}", doc.path.display());
                    eprintln!("   Could not convert {}: {}", doc.file_name(), err);
                }
            }
        }

        summary
    }

    /// Convert a single PDF, falling back to OCR when direct extraction
    /// finds too little text.
    pub fn convert_pdf(&self, path: &Path) -> Result<AudiobookInfo, ConvertError> {
        eprintln!("   Extracting text...");
        let extracted = pdf::extract_text(path).map_err(ConvertError::Extraction)?;
        eprintln!("   Total pages: {}", extracted.pages);

        let found = extracted.text.trim().len();
        let text = if found < MIN_EXTRACTED_CHARS {
            eprintln!("   Very little text found ({found} chars)");
            match &self.ocr {
                Some(ocr) => {
                    eprintln!("   Attempting OCR (this may take a while)...");
                    ocr.ocr_pdf(path).map_err(ConvertError::Extraction)?
                }
                None => return Err(ConvertError::OcrUnavailable),
            }
        } else {
            extracted.text
        };

        self.narrate(&text, path)
    }

    /// Convert a single image by recognizing its text directly.
    pub fn convert_image(&self, path: &Path) -> Result<AudiobookInfo, ConvertError> {
        let ocr = self.ocr.as_ref().ok_or(ConvertError::OcrUnavailable)?;

        eprintln!("   Reading text from image...");
        let text = ocr.recognize(path).map_err(ConvertError::Extraction)?;

        self.narrate(&text, path)
    }

    /// Shared tail of both paths: normalize, chunk, synthesize, encode.
    fn narrate(&self, text: &str, source: &Path) -> Result<AudiobookInfo, ConvertError> {
        let found = text.trim().len();
        if found < MIN_NARRATABLE_CHARS {
            return Err(ConvertError::InsufficientText { found });
        }

        eprintln!("   Preparing text for natural speech...");
        let chunks = text::prepare_chunks(text, self.chunk_size);

        let segments = synthesize_chunks(self.tts.as_ref(), &chunks, &self.options);
        if segments.is_empty() {
            return Err(ConvertError::NoAudio);
        }

        eprintln!("   Saving audiobook (high quality MP3)...");
        let output_path = self.output_path_for(source);
        audio::assemble_mp3(&segments, &output_path).map_err(ConvertError::Encoding)
    }

    fn output_path_for(&self, source: &Path) -> PathBuf {
        let stem = source.file_stem().unwrap_or_default();
        self.output_dir.join(format!("{}.mp3", stem.to_string_lossy()))
    }
}

/// Feed each chunk to the backend in order, appending a 400ms pause after
/// every chunk's audio. A failed chunk is logged and skipped; it contributes
/// neither audio nor pause, and the remaining chunks still run.
pub fn synthesize_chunks(
    backend: &dyn SpeechBackend,
    chunks: &[String],
    options: &SynthesisOptions,
) -> Vec<PcmSegment> {
    if chunks.is_empty() {
        return Vec::new();
    }

    eprintln!("   Preparing {} audio segment(s)...", chunks.len());
    let estimated_minutes = (chunks.len() as f64 * 2.0) / 60.0;
    if estimated_minutes > 1.0 {
        eprintln!("   This might take around {estimated_minutes:.0} minute(s)...");
    }

    let pb = ProgressBar::new(chunks.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} segments")
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut segments = Vec::new();
    for chunk in chunks {
        match backend.synthesize(chunk, options) {
            Ok(buffers) if !buffers.is_empty() => {
                segments.extend(buffers);
                segments.push(PcmSegment::silence(PAUSE_BETWEEN_CHUNKS_MS));
            }
            Ok(_) => {
                log::debug!("chunk produced no audio, skipping");
            }
            Err(err) => {
                log::warn!("synthesis failed for a chunk: {err:#}");
                eprintln!("   Error generating audio for chunk: {err}");
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();
    eprintln!("   Audio generation complete");

    let total_ms: u64 = segments.iter().map(|s| s.duration_ms()).sum();
    log::debug!(
        "synthesized {} segment(s), about {total_ms} ms of audio",
        segments.len()
    );

    segments
}

/// Human duration: minutes, or hours plus minutes past the hour mark.
pub fn format_duration(duration_ms: u64) -> String {
    let minutes = duration_ms as f64 / 1000.0 / 60.0;
    if minutes >= 60.0 {
        format!("{:.1} hours ({:.0} minutes)", minutes / 60.0, minutes)
    } else {
        format!("{minutes:.1} minutes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SAMPLE_RATE;
    use tempfile::TempDir;

    /// Backend returning a fixed buffer, or failing for chunks marked FAIL.
    struct StubBackend;

    impl SpeechBackend for StubBackend {
        fn synthesize(&self, text: &str, _options: &SynthesisOptions) -> anyhow::Result<Vec<PcmSegment>> {
            if text.contains("FAIL") {
                anyhow::bail!("stub synthesis failure");
            }
            Ok(vec![PcmSegment::from_samples(vec![1; 240])])
        }

        fn name(&self) -> &'static str {
            "stub"
        }
    }

    fn test_converter(output_dir: &Path) -> Converter {
        let config = NarratorConfig {
            output_dir: output_dir.to_path_buf(),
            ..NarratorConfig::default()
        };
        Converter::new(&config, Box::new(StubBackend), None)
    }

    #[test]
    fn test_pause_after_each_chunk() {
        let chunks = vec!["one".to_string(), "two".to_string()];
        let segments = synthesize_chunks(&StubBackend, &chunks, &SynthesisOptions::default());

        // audio + pause, per chunk
        assert_eq!(segments.len(), 4);
        let pause_samples = (400 * SAMPLE_RATE as u64 / 1000) as usize;
        assert_eq!(segments[1].samples().len(), pause_samples);
        assert_eq!(segments[3].samples().len(), pause_samples);
        assert!(segments[1].samples().iter().all(|&s| s == 0));
    }

    #[test]
    fn test_failed_chunk_is_skipped() {
        let chunks = vec![
            "one".to_string(),
            "FAIL here".to_string(),
            "three".to_string(),
        ];
        let segments = synthesize_chunks(&StubBackend, &chunks, &SynthesisOptions::default());

        // The failed chunk contributes neither audio nor pause
        assert_eq!(segments.len(), 4);
    }

    #[test]
    fn test_no_chunks_no_segments() {
        let segments = synthesize_chunks(&StubBackend, &[], &SynthesisOptions::default());
        assert!(segments.is_empty());
    }

    #[test]
    fn test_insufficient_text() {
        let dir = TempDir::new().unwrap();
        let converter = test_converter(dir.path());

        let result = converter.narrate("too short", Path::new("doc.pdf"));
        assert!(matches!(
            result,
            Err(ConvertError::InsufficientText { found: 9 })
        ));
    }

    #[test]
    fn test_image_without_ocr_engine() {
        let dir = TempDir::new().unwrap();
        let converter = test_converter(dir.path());

        let result = converter.convert_image(Path::new("scan.png"));
        assert!(matches!(result, Err(ConvertError::OcrUnavailable)));
    }

    #[test]
    fn test_output_path_for() {
        let dir = TempDir::new().unwrap();
        let converter = test_converter(dir.path());

        let out = converter.output_path_for(Path::new("/books/My Paper.pdf"));
        assert_eq!(out, dir.path().join("My Paper.mp3"));
    }

    #[test]
    fn test_batch_continues_past_failures() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let converter = test_converter(output.path());

        // Neither file is a real PDF; both must fail, both must be attempted.
        let mut documents = Vec::new();
        for name in ["bad-one.pdf", "bad-two.pdf"] {
            let path = input.path().join(name);
            std::fs::write(&path, b"not a pdf at all").unwrap();
            documents.push(Document {
                path,
                kind: DocumentKind::Pdf,
            });
        }

        let summary = converter.run(&documents);
        assert_eq!(summary.successful, 0);
        assert_eq!(summary.failed, 2);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(30_000), "0.5 minutes");
        assert_eq!(format_duration(90 * 60 * 1000), "1.5 hours (90 minutes)");
    }
}
