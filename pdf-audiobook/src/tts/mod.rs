//! TTS backend trait and synthesis options.

pub mod kokoro;

use crate::audio::PcmSegment;
use anyhow::Result;

/// Options for a synthesis call.
#[derive(Debug, Clone)]
pub struct SynthesisOptions {
    /// Voice name (e.g. af_bella)
    pub voice: String,
    /// Speed multiplier (0.5-2.0, default 1.0)
    pub speed: f32,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            voice: "af_bella".to_string(),
            speed: 1.0,
        }
    }
}

impl SynthesisOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the voice name.
    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    /// Set the speed multiplier.
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed.clamp(0.5, 2.0);
        self
    }
}

/// Speech synthesis backend - all TTS engines implement this.
///
/// A single call may yield several audio buffers; callers keep them in
/// order. All buffers share the fixed PCM format in [`crate::audio`].
pub trait SpeechBackend {
    /// Synthesize one chunk of text into PCM buffers.
    fn synthesize(&self, text: &str, options: &SynthesisOptions) -> Result<Vec<PcmSegment>>;

    /// Engine name for status output.
    fn name(&self) -> &'static str;
}

/// Create the default TTS backend.
pub fn create_backend() -> Result<Box<dyn SpeechBackend>> {
    Ok(Box::new(kokoro::KokoroBackend::new()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_default() {
        let opts = SynthesisOptions::default();
        assert_eq!(opts.voice, "af_bella");
        assert_eq!(opts.speed, 1.0);
    }

    #[test]
    fn test_options_builder() {
        let opts = SynthesisOptions::new().with_voice("bf_emma").with_speed(0.9);
        assert_eq!(opts.voice, "bf_emma");
        assert_eq!(opts.speed, 0.9);
    }

    #[test]
    fn test_speed_clamping() {
        let opts = SynthesisOptions::new().with_speed(10.0);
        assert_eq!(opts.speed, 2.0);
        let opts = SynthesisOptions::new().with_speed(0.0);
        assert_eq!(opts.speed, 0.5);
    }
}
