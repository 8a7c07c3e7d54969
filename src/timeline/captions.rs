use serde::{Deserialize, Serialize};

use crate::errors::TimelineError;

use super::layers::Span;
use super::timing::TimedLine;

/// Words shown together in one caption burst unless configured otherwise
pub const DEFAULT_WORDS_PER_CHUNK: usize = 3;

/// A short on-screen text burst covering part of a line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionChunk {
    pub text: String,
    pub span: Span,
    pub color: String,
}

/// Split a line into word chunks that partition its time span
///
/// Every word gets an equal share of the line's duration; there is no
/// alignment data, so this is an estimate. Chunk boundaries are computed from
/// the word index (`start + i * per_word`) rather than accumulated, and the
/// last chunk ends exactly at the line's end.
pub fn chunk_line(
    timed: &TimedLine<'_>,
    words_per_chunk: usize,
    color: &str,
) -> Result<Vec<CaptionChunk>, TimelineError> {
    if words_per_chunk == 0 {
        return Err(TimelineError::InvalidInput(
            "words_per_chunk must be at least 1".to_string(),
        ));
    }

    let words: Vec<&str> = timed.line.text.split_whitespace().collect();
    if words.is_empty() {
        return Ok(Vec::new());
    }

    let word_count = words.len();
    let line_start = timed.span.start;
    let per_word = timed.duration() / word_count.max(1) as f64;

    Ok(words
        .chunks(words_per_chunk)
        .enumerate()
        .map(|(chunk_index, chunk_words)| {
            let first_word = chunk_index * words_per_chunk;
            let last_word = first_word + chunk_words.len();

            let start = line_start + first_word as f64 * per_word;
            let end = if last_word == word_count {
                timed.span.end
            } else {
                line_start + last_word as f64 * per_word
            };

            CaptionChunk {
                text: chunk_words.join(" "),
                span: Span::new(start, end),
                color: color.to_string(),
            }
        })
        .collect())
}
