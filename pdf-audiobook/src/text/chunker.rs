//! Line-preserving text chunking for TTS processing.

/// Default chunk budget in characters. Kokoro handles about this much text
/// per call comfortably.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Split normalized text into chunks of at most `chunk_size` characters
/// without ever cutting a line in two.
///
/// Lines accumulate into the current chunk until adding the next line would
/// exceed the budget; the chunk is then flushed and the line starts a new
/// one. A single line longer than the budget becomes a chunk of its own.
/// Empty input yields no chunks.
pub fn chunk_lines(text: &str, chunk_size: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        if line.is_empty() {
            continue;
        }

        if current.is_empty() {
            current.push_str(line);
        } else if current.len() + line.len() + 1 <= chunk_size {
            current.push('\n');
            current.push_str(line);
        } else {
            chunks.push(std::mem::take(&mut current));
            current.push_str(line);
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
