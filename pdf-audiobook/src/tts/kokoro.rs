//! Kokoro TTS backend using PyO3 to embed Python.
//!
//! Kokoro-82M is a CPU-friendly neural audiobook voice. The model and its
//! voice files are downloaded by the Python package itself on first use.

use super::{SpeechBackend, SynthesisOptions};
use crate::audio::PcmSegment;
use anyhow::{Context, Result};
use pyo3::prelude::*;
use pyo3::types::PyDict;
use std::sync::Once;

/// Initialize Python runtime once.
static PYTHON_INIT: Once = Once::new();

/// Kokoro TTS backend holding a loaded `KPipeline`.
pub struct KokoroBackend {
    pipeline: Py<PyAny>,
}

impl KokoroBackend {
    /// Load the Kokoro pipeline (American English, CPU inference).
    ///
    /// Fails with a setup hint when the `kokoro` package is not importable.
    pub fn new() -> Result<Self> {
        PYTHON_INIT.call_once(|| {
            pyo3::prepare_freethreaded_python();
        });

        let pipeline = Python::with_gil(|py| -> Result<Py<PyAny>> {
            let module = py
                .import("kokoro")
                .context("Failed to import kokoro. Install it with 'pip install kokoro'.")?;
            let pipeline_class = module.getattr("KPipeline")?;

            let kwargs = PyDict::new(py);
            kwargs.set_item("lang_code", "a")?;
            kwargs.set_item("device", "cpu")?;

            let pipeline = pipeline_class
                .call((), Some(&kwargs))
                .context("Failed to initialize the Kokoro pipeline")?;

            Ok(pipeline.unbind())
        })?;

        Ok(Self { pipeline })
    }
}

impl SpeechBackend for KokoroBackend {
    fn synthesize(&self, text: &str, options: &SynthesisOptions) -> Result<Vec<PcmSegment>> {
        Python::with_gil(|py| {
            let pipeline = self.pipeline.bind(py);

            let kwargs = PyDict::new(py);
            kwargs.set_item("voice", options.voice.as_str())?;
            kwargs.set_item("speed", options.speed)?;

            // The pipeline returns a generator of results; each may carry an
            // audio tensor.
            let results = pipeline.call((text,), Some(&kwargs))?;

            let mut segments = Vec::new();
            for result in results.try_iter()? {
                let result = result?;
                let output = result.getattr("output")?;
                if output.is_none() {
                    continue;
                }
                let audio = output.getattr("audio")?;
                if audio.is_none() {
                    continue;
                }

                let samples = tensor_to_pcm(&audio)?;
                if !samples.is_empty() {
                    segments.push(PcmSegment::from_samples(samples));
                }
            }

            Ok(segments)
        })
    }

    fn name(&self) -> &'static str {
        "kokoro"
    }
}

/// Convert a float audio tensor to 16-bit signed samples.
///
/// The scaling and dtype conversion run on the Python side; only the final
/// little-endian byte buffer crosses the boundary.
fn tensor_to_pcm(audio: &Bound<'_, PyAny>) -> Result<Vec<i16>> {
    let array = audio.call_method0("cpu")?.call_method0("numpy")?;
    let scaled = array.call_method1("__mul__", (32767.0f32,))?;
    let int16 = scaled.call_method1("astype", ("int16",))?;
    let bytes: Vec<u8> = int16.call_method0("tobytes")?.extract()?;

    Ok(bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect())
}
