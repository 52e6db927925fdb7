//! Whitespace normalization ahead of chunking.

/// Prepare extracted text for speech synthesis.
///
/// Collapses runs of spaces and tabs inside each line, drops blank lines,
/// and rejoins the remaining lines with single newlines. Line breaks are the
/// seams the chunker is allowed to cut at, so they are preserved.
pub fn normalize_for_speech(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for line in text.lines() {
        let mut words = line.split_whitespace();
        let Some(first) = words.next() else {
            continue;
        };

        if !result.is_empty() {
            result.push('\n');
        }
        result.push_str(first);
        for word in words {
            result.push(' ');
            result.push_str(word);
        }
    }

    result
}
