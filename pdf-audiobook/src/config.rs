//! pdf-audio configuration management.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

// Defaults for Kokoro narration
const DEFAULT_VOICE: &str = "af_bella";
const DEFAULT_SPEED: f32 = 1.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarratorConfig {
    /// Directory scanned for PDF and image files
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,

    /// Directory where MP3 files are written
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Kokoro voice name (e.g. af_bella, bf_emma)
    #[serde(default = "default_voice")]
    pub voice: String,

    /// Speech speed multiplier
    #[serde(default = "default_speed")]
    pub speed: f32,

    /// Target chunk size for text processing, in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("input")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_voice() -> String {
    DEFAULT_VOICE.to_string()
}

fn default_speed() -> f32 {
    DEFAULT_SPEED
}

fn default_chunk_size() -> usize {
    crate::text::chunker::DEFAULT_CHUNK_SIZE
}

impl Default for NarratorConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            voice: default_voice(),
            speed: default_speed(),
            chunk_size: default_chunk_size(),
        }
    }
}

impl NarratorConfig {
    /// Get the config file path: ~/.config/cli-programs/pdf-audio.toml
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(config_dir.join("cli-programs").join("pdf-audio.toml"))
    }

    /// Load config from file, returning default if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: NarratorConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NarratorConfig::default();
        assert_eq!(config.input_dir, PathBuf::from("input"));
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.voice, "af_bella");
        assert_eq!(config.speed, 1.0);
        assert_eq!(config.chunk_size, 1000);
    }

    #[test]
    fn test_config_path() {
        let path = NarratorConfig::config_path();
        assert!(path.is_ok());
        let path = path.unwrap();
        assert!(path.ends_with("cli-programs/pdf-audio.toml"));
    }

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
input_dir = "/books/in"
output_dir = "/books/out"
voice = "bf_emma"
speed = 0.9
chunk_size = 800
"#;
        let config: NarratorConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.input_dir, PathBuf::from("/books/in"));
        assert_eq!(config.output_dir, PathBuf::from("/books/out"));
        assert_eq!(config.voice, "bf_emma");
        assert_eq!(config.speed, 0.9);
        assert_eq!(config.chunk_size, 800);
    }

    #[test]
    fn test_parse_empty_config() {
        let toml_str = "";
        let config: NarratorConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.voice, "af_bella");
        assert_eq!(config.speed, 1.0);
        assert_eq!(config.chunk_size, 1000);
    }
}
