//! Overlapping character-window chunking for long inputs.
//!
//! Sizes and overlap count characters, not bytes. Consecutive chunks share
//! exactly `overlap` characters, so dropping the first `overlap` characters
//! of every chunk after the first and concatenating gives back the input.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChunkError {
    #[error("max_chunk_size must be greater than zero")]
    ZeroChunkSize,

    #[error("overlap ({overlap}) must be smaller than max_chunk_size ({max_chunk_size})")]
    OverlapTooLarge { overlap: usize, max_chunk_size: usize },
}

/// Splits `text` into chunks of at most `max_chunk_size` characters.
///
/// A chunk that does not reach the end of the text ends just after the last
/// `.` or `\n` in its window, provided that still moves the next chunk
/// forward; otherwise it takes the full window. Text that fits in one window
/// (including empty text) yields exactly one chunk.
pub fn chunk_text(
    text: &str,
    max_chunk_size: usize,
    overlap: usize,
) -> Result<Chunks<'_>, ChunkError> {
    if max_chunk_size == 0 {
        return Err(ChunkError::ZeroChunkSize);
    }
    if overlap >= max_chunk_size {
        return Err(ChunkError::OverlapTooLarge {
            overlap,
            max_chunk_size,
        });
    }

    let boundaries = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();

    Ok(Chunks {
        text,
        boundaries,
        max_chunk_size,
        overlap,
        start: 0,
        done: false,
    })
}

/// Iterator over the chunks of one text. Cloning restarts from the clone's
/// current position.
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    text: &'a str,
    /// Byte offset of every char, plus `text.len()`.
    boundaries: Vec<usize>,
    max_chunk_size: usize,
    overlap: usize,
    /// Char index where the next chunk starts.
    start: usize,
    done: bool,
}

impl<'a> Chunks<'a> {
    fn char_len(&self) -> usize {
        self.boundaries.len() - 1
    }

    fn slice(&self, from: usize, to: usize) -> &'a str {
        &self.text[self.boundaries[from]..self.boundaries[to]]
    }

    /// End of the chunk starting at `self.start` when the window does not
    /// reach the end of the text.
    fn break_point(&self, window_end: usize) -> usize {
        let window = self.slice(self.start, window_end);
        let last_break = window
            .chars()
            .enumerate()
            .filter(|(_, c)| *c == '.' || *c == '\n')
            .map(|(i, _)| i)
            .last();

        match last_break {
            Some(i) if i + 1 > self.overlap => self.start + i + 1,
            _ => window_end,
        }
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.done {
            return None;
        }

        let len = self.char_len();
        let window_end = (self.start + self.max_chunk_size).min(len);

        let end = if window_end < len {
            self.break_point(window_end)
        } else {
            window_end
        };

        let chunk = self.slice(self.start, end);
        if end >= len {
            self.done = true;
        } else {
            self.start = end - self.overlap;
        }

        Some(chunk)
    }
}

impl std::iter::FusedIterator for Chunks<'_> {}
