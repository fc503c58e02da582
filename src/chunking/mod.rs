//! Sentence-aligned text chunking.
//!
//! Summary models accept a bounded amount of input, so extracted document text
//! is cut into chunks of roughly `max_words` words. Chunks never break a
//! sentence: a sentence longer than the budget becomes a chunk of its own.
//!
//! Sentences are found by splitting on a literal `". "`. Chunks are slices of
//! the input, so joining them with [`SENTENCE_DELIMITER`] gives the input back.

/// Delimiter separating sentence units.
pub const SENTENCE_DELIMITER: &str = ". ";

/// Split `text` into ordered, sentence-aligned chunks of at most `max_words`
/// words each.
///
/// Sentences are accumulated greedily. When the next sentence would push the
/// running chunk over `max_words`, the chunk is closed and the sentence starts
/// a new one. Empty chunks are never produced.
///
/// The budget counts the words of each sentence with the delimiters removed,
/// so a stray `.` kept inside a chunk (as in `"word\n. next"`) is not counted.
pub fn split_text(text: &str, max_words: usize) -> Vec<&str> {
    let mut chunks = Vec::new();

    // Byte range and word count of the chunk being built.
    let mut current: Option<(usize, usize)> = None;
    let mut current_words = 0;

    for (start, sentence) in sentences(text) {
        let words = word_count(sentence);
        let end = start + sentence.len();

        current = match current {
            // Wordless chunks and wordless sentences never close a chunk.
            Some((chunk_start, chunk_end))
                if current_words > 0 && words > 0 && current_words + words > max_words =>
            {
                chunks.push(&text[chunk_start..chunk_end]);
                current_words = words;
                Some((start, end))
            }
            Some((chunk_start, _)) => {
                current_words += words;
                Some((chunk_start, end))
            }
            None => {
                current_words = words;
                Some((start, end))
            }
        };
    }

    if let Some((chunk_start, chunk_end)) = current {
        if chunk_end > chunk_start {
            chunks.push(&text[chunk_start..chunk_end]);
        }
    }

    chunks
}

/// Number of whitespace-separated words in `text`.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Sentence units of `text` with their byte offsets.
fn sentences(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut offset = 0;
    text.split(SENTENCE_DELIMITER).map(move |sentence| {
        let start = offset;
        offset += sentence.len() + SENTENCE_DELIMITER.len();
        (start, sentence)
    })
}
