//! Text processing for narration: normalization and chunking.

pub mod chunker;
pub mod normalize;

pub use chunker::chunk_lines;
pub use normalize::normalize_for_speech;

/// Normalize extracted text and split it into TTS-sized chunks.
pub fn prepare_chunks(text: &str, chunk_size: usize) -> Vec<String> {
    chunk_lines(&normalize_for_speech(text), chunk_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_chunks() {
        let text = "Hello   world.\n\n\nSecond  line.";
        let chunks = prepare_chunks(text, 1000);
        assert_eq!(chunks, vec!["Hello world.\nSecond line.".to_string()]);
    }

    #[test]
    fn test_prepare_chunks_empty() {
        assert!(prepare_chunks("", 1000).is_empty());
        assert!(prepare_chunks("  \n\t\n  ", 1000).is_empty());
    }
}
