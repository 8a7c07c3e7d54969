/*!
 * Tests for caption chunking
 */

use reelwright::errors::TimelineError;
use reelwright::timeline::{chunk_line, schedule_lines, Span, DEFAULT_WORDS_PER_CHUNK};

use crate::common::dialogue_line;

/// Five words over five seconds split into 3 + 2 words at one second per word
#[test]
fn test_chunk_line_withFiveWords_shouldSplitProportionally() {
    let lines = vec![dialogue_line(0, "A", "the quick brown fox jumps", 5.0)];
    let timed = schedule_lines(&lines).unwrap();

    let chunks = chunk_line(&timed[0], 3, "white").unwrap();

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].text, "the quick brown");
    assert_eq!(chunks[0].span, Span::new(0.0, 3.0));
    assert_eq!(chunks[1].text, "fox jumps");
    assert_eq!(chunks[1].span, Span::new(3.0, 5.0));
}

/// Chunks of a later line are offset by the line's start
#[test]
fn test_chunk_line_withSecondLine_shouldOffsetByLineStart() {
    let lines = vec![
        dialogue_line(0, "A", "one two", 2.0),
        dialogue_line(1, "B", "three four five six", 4.0),
    ];
    let timed = schedule_lines(&lines).unwrap();

    let chunks = chunk_line(&timed[1], 2, "yellow").unwrap();

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].span, Span::new(2.0, 4.0));
    assert_eq!(chunks[1].span, Span::new(4.0, 6.0));
    assert!(chunks.iter().all(|c| c.color == "yellow"));
}

/// Chunks tile the line exactly, ending on the line end even with awkward durations
#[test]
fn test_chunk_line_withAwkwardDuration_shouldTileLineExactly() {
    let lines = vec![
        dialogue_line(0, "A", "padding words here", 0.7),
        dialogue_line(1, "B", "one two three four five six seven", 3.3),
    ];
    let timed = schedule_lines(&lines).unwrap();

    let chunks = chunk_line(&timed[1], DEFAULT_WORDS_PER_CHUNK, "white").unwrap();

    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].span.start, timed[1].span.start);
    assert_eq!(chunks.last().unwrap().span.end, timed[1].span.end);
    for pair in chunks.windows(2) {
        assert_eq!(pair[0].span.end, pair[1].span.start);
    }
}

/// Joined chunk texts give back the words of the line
#[test]
fn test_chunk_line_shouldPreserveWordsInOrder() {
    let text = "  so   the moon\tis just a giant\nbathtub drain ";
    let lines = vec![dialogue_line(0, "A", text, 4.5)];
    let timed = schedule_lines(&lines).unwrap();

    let chunks = chunk_line(&timed[0], 3, "white").unwrap();
    let joined: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();

    assert_eq!(
        joined.join(" "),
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    );
}

/// Whitespace-only text produces no captions
#[test]
fn test_chunk_line_withBlankText_shouldProduceNoChunks() {
    let lines = vec![dialogue_line(0, "A", "   ", 2.0)];
    let timed = schedule_lines(&lines).unwrap();

    assert!(chunk_line(&timed[0], 3, "white").unwrap().is_empty());
}

/// A zero-length line yields zero-length chunks at the line start
#[test]
fn test_chunk_line_withZeroDuration_shouldYieldZeroWidthChunks() {
    let lines = vec![
        dialogue_line(0, "A", "lead in", 1.5),
        dialogue_line(1, "B", "silent words here and there", 0.0),
    ];
    let timed = schedule_lines(&lines).unwrap();

    let chunks = chunk_line(&timed[1], 3, "white").unwrap();

    assert_eq!(chunks.len(), 2);
    assert!(chunks
        .iter()
        .all(|c| c.span.start == 1.5 && c.span.end == 1.5));
}

/// Zero words per chunk is rejected
#[test]
fn test_chunk_line_withZeroWordsPerChunk_shouldFail() {
    let lines = vec![dialogue_line(0, "A", "hello", 1.0)];
    let timed = schedule_lines(&lines).unwrap();

    assert!(matches!(
        chunk_line(&timed[0], 0, "white"),
        Err(TimelineError::InvalidInput(_))
    ));
}
