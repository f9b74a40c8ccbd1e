//! Bounded-size text splitting
//!
//! This module splits section bodies into chunks of at most `chunk_size`
//! characters, preferring paragraph breaks, then line breaks, then spaces.

use crate::config::ChunkingConfig;
use crate::error::{DocprepError, Result};
use std::collections::VecDeque;
use std::ops::Range;

/// Splits text into an ordered sequence of chunks.
///
/// Implementations return substrings of the input in document order.
pub trait TextSplitter {
    fn split_text<'a>(&self, text: &'a str) -> Result<Vec<&'a str>>;
}

/// Recursive character splitter with a separator cascade.
///
/// Separators stay attached to the end of the piece they terminate, so with
/// no overlap the chunks concatenate back to the input exactly.
#[derive(Debug, Clone)]
pub struct RecursiveCharacterSplitter {
    chunk_size: usize,
    overlap: usize,
    separators: Vec<String>,
}

impl RecursiveCharacterSplitter {
    /// Create a splitter from chunking configuration
    pub fn new(config: &ChunkingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            chunk_size: config.chunk_size,
            overlap: config.overlap,
            separators: config.separators.clone(),
        })
    }

    /// Create a splitter with the default separators
    pub fn with_size(chunk_size: usize, overlap: usize) -> Result<Self> {
        Self::new(&ChunkingConfig {
            chunk_size,
            overlap,
            ..ChunkingConfig::default()
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    fn split_recursive(
        &self,
        text: &str,
        range: Range<usize>,
        separators: &[String],
        out: &mut Vec<Range<usize>>,
    ) {
        let slice = &text[range.clone()];

        let Some(pos) = separators
            .iter()
            .position(|sep| sep.is_empty() || slice.contains(sep.as_str()))
        else {
            let len = char_len(slice);
            if len <= self.chunk_size {
                out.push(range);
            } else {
                self.push_oversized(range, len, out);
            }
            return;
        };
        let remaining = &separators[pos + 1..];

        let mut fitting: Vec<Range<usize>> = Vec::new();
        for piece in pieces(slice, range.start, &separators[pos]) {
            let len = char_len(&text[piece.clone()]);
            if len <= self.chunk_size {
                fitting.push(piece);
                continue;
            }

            if !fitting.is_empty() {
                self.merge(text, &fitting, out);
                fitting.clear();
            }
            if remaining.is_empty() {
                self.push_oversized(piece, len, out);
            } else {
                self.split_recursive(text, piece, remaining, out);
            }
        }

        if !fitting.is_empty() {
            self.merge(text, &fitting, out);
        }
    }

    /// Greedily pack contiguous pieces into chunks, carrying up to `overlap`
    /// characters of trailing pieces into the next chunk.
    fn merge(&self, text: &str, pieces: &[Range<usize>], out: &mut Vec<Range<usize>>) {
        let mut window: VecDeque<(Range<usize>, usize)> = VecDeque::new();
        let mut total = 0;

        for piece in pieces {
            let len = char_len(&text[piece.clone()]);

            if total + len > self.chunk_size {
                if let Some(range) = window_range(&window) {
                    out.push(range);
                }
                while total > self.overlap || (total > 0 && total + len > self.chunk_size) {
                    match window.pop_front() {
                        Some((_, dropped)) => total -= dropped,
                        None => break,
                    }
                }
            }

            window.push_back((piece.clone(), len));
            total += len;
        }

        if let Some(range) = window_range(&window) {
            out.push(range);
        }
    }

    fn push_oversized(&self, range: Range<usize>, len: usize, out: &mut Vec<Range<usize>>) {
        log::warn!(
            "Created a chunk of {} characters, longer than the limit of {}: no split point found",
            len,
            self.chunk_size
        );
        out.push(range);
    }
}

impl TextSplitter for RecursiveCharacterSplitter {
    fn split_text<'a>(&self, text: &'a str) -> Result<Vec<&'a str>> {
        let mut ranges = Vec::new();
        if !text.is_empty() {
            self.split_recursive(text, 0..text.len(), &self.separators, &mut ranges);
        }

        ranges
            .into_iter()
            .map(|r| {
                text.get(r.clone()).ok_or_else(|| {
                    DocprepError::Split(format!("chunk {r:?} is not on a character boundary"))
                })
            })
            .collect()
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn window_range(window: &VecDeque<(Range<usize>, usize)>) -> Option<Range<usize>> {
    let first = window.front()?;
    let last = window.back()?;
    Some(first.0.start..last.0.end)
}

/// Cut `slice` after every occurrence of `separator`; an empty separator cuts
/// between characters. Ranges are offset by `base`.
fn pieces(slice: &str, base: usize, separator: &str) -> Vec<Range<usize>> {
    if separator.is_empty() {
        return slice
            .char_indices()
            .map(|(i, c)| base + i..base + i + c.len_utf8())
            .collect();
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for (i, _) in slice.match_indices(separator) {
        let end = i + separator.len();
        pieces.push(base + start..base + end);
        start = end;
    }
    if start < slice.len() {
        pieces.push(base + start..base + slice.len());
    }
    pieces
}
