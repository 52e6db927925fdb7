//! MP3 assembly using FFmpeg.

use super::{PcmSegment, CHANNELS, SAMPLE_RATE};
use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Output bitrate for the encoded audiobook.
const MP3_BITRATE: &str = "128k";

/// LAME VBR quality setting (lower is better).
const MP3_QUALITY: &str = "2";

/// Facts about an encoded audiobook, reported after export.
#[derive(Debug, Clone, Copy)]
pub struct AudiobookInfo {
    pub duration_ms: u64,
    pub size_bytes: u64,
}

fn ffmpeg_command() -> Command {
    Command::new("ffmpeg")
}

/// Concatenate segments in order and encode them to an MP3 file.
///
/// Writes a mono 24kHz WAV intermediate into a temp directory, then hands
/// it to FFmpeg for the final encode.
pub fn assemble_mp3(segments: &[PcmSegment], output_path: &Path) -> Result<AudiobookInfo> {
    if segments.is_empty() {
        anyhow::bail!("No audio segments to encode");
    }

    let temp_dir = TempDir::new()?;
    let wav_path = temp_dir.path().join("audiobook.wav");

    let total_samples = write_wav(segments, &wav_path)?;
    encode_mp3(&wav_path, output_path)?;

    let size_bytes = std::fs::metadata(output_path)
        .with_context(|| format!("Failed to stat output file: {}", output_path.display()))?
        .len();

    Ok(AudiobookInfo {
        duration_ms: total_samples * 1000 / u64::from(SAMPLE_RATE),
        size_bytes,
    })
}

/// Write all segments into a single WAV file. Returns the sample count.
fn write_wav(segments: &[PcmSegment], wav_path: &Path) -> Result<u64> {
    let spec = hound::WavSpec {
        channels: CHANNELS,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer =
        hound::WavWriter::create(wav_path, spec).context("Failed to create WAV intermediate")?;

    let mut written: u64 = 0;
    for segment in segments {
        for &sample in segment.samples() {
            writer.write_sample(sample)?;
        }
        written += segment.samples().len() as u64;
    }

    writer.finalize().context("Failed to finalize WAV file")?;
    Ok(written)
}

/// Encode the WAV intermediate to MP3 at a fixed bitrate and quality.
fn encode_mp3(wav_path: &Path, output_path: &Path) -> Result<()> {
    let output = ffmpeg_command()
        .args(["-y", "-i"])
        .arg(wav_path)
        .args(["-b:a", MP3_BITRATE, "-q:a", MP3_QUALITY])
        .arg(output_path)
        .output()
        .context("Failed to run ffmpeg (is it installed?)")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("ffmpeg MP3 encoding failed: {}", stderr);
    }

    Ok(())
}

/// Check if FFmpeg is available on this system.
pub fn is_ffmpeg_available() -> bool {
    ffmpeg_command()
        .arg("-version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}
