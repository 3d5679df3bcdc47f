//! stream/merge.rs
//! K-way merge of line streams that are each already sorted.
//!
//! Summary:
//! - One cursor per non-exhausted input, kept ordered by (line, input index).
//! - After emitting the head line its cursor advances. If the new line still
//!   sorts before the second cursor, the order holds and no re-sort happens;
//!   that is the common case for per-day logs. Otherwise the cursors are
//!   re-sorted before the next emission.
//! - Equal lines come out lowest input index first.

use std::cmp::Ordering;

use bytes::{Bytes, BytesMut};
use tracing::debug;

use crate::constants::DEFAULT_MERGE_BUFSIZE;
use crate::stream::core::ByteStream;
use crate::stream::lines::{lines, Lines};
use crate::types::StreamError;

struct Cursor<S> {
    line: String,
    index: usize,
    rest: Lines<S>,
}

impl<S> Cursor<S> {
    fn cmp_key(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then(self.index.cmp(&other.index))
    }
}

/// Lazy merged line sequence; inputs are opened on the first pull.
pub struct MergeLines<S> {
    inputs: Option<Vec<S>>,
    cursors: Vec<Cursor<S>>,
    /// Error raised while advancing a cursor, reported after its pending line.
    failed: Option<StreamError>,
    done: bool,
    resorts: u64,
}

pub fn merge_lines<S: ByteStream>(streams: Vec<S>) -> MergeLines<S> {
    MergeLines::new(streams)
}

impl<S: ByteStream> MergeLines<S> {
    pub fn new(streams: Vec<S>) -> Self {
        Self { inputs: Some(streams), cursors: Vec::new(), failed: None, done: false, resorts: 0 }
    }

    /// Number of full re-sorts performed so far.
    pub fn resorts(&self) -> u64 {
        self.resorts
    }

    fn init(&mut self, inputs: Vec<S>) -> Result<(), StreamError> {
        for (index, stream) in inputs.into_iter().enumerate() {
            let mut rest = lines(stream);
            match rest.next() {
                Some(Ok(line)) => self.cursors.push(Cursor { line, index, rest }),
                Some(Err(e)) => return Err(e),
                None => debug!(index, "merge input empty"),
            }
        }
        self.cursors.sort_by(Cursor::cmp_key);
        Ok(())
    }

    fn in_order(&self) -> bool {
        match self.cursors.as_slice() {
            [first, second, ..] => first.cmp_key(second) == Ordering::Less,
            _ => true,
        }
    }
}

impl<S: ByteStream> Iterator for MergeLines<S> {
    type Item = Result<String, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if let Some(e) = self.failed.take() {
            self.done = true;
            return Some(Err(e));
        }
        if let Some(inputs) = self.inputs.take() {
            if let Err(e) = self.init(inputs) {
                self.done = true;
                return Some(Err(e));
            }
        }

        let head = self.cursors.first_mut()?;
        let line = match head.rest.next() {
            Some(Ok(next)) => std::mem::replace(&mut head.line, next),
            Some(Err(e)) => {
                self.failed = Some(e);
                self.cursors.remove(0).line
            }
            None => self.cursors.remove(0).line,
        };

        if !self.in_order() {
            self.cursors.sort_by(Cursor::cmp_key);
            self.resorts += 1;
        }
        Some(Ok(line))
    }
}

/// Merged lines re-chunked into byte buffers for streaming out.
/// A chunk is emitted once its buffer grows past `bufsize`.
pub struct MergeStream<S> {
    lines: MergeLines<S>,
    bufsize: usize,
    failed: Option<StreamError>,
    done: bool,
}

impl<S: ByteStream> MergeStream<S> {
    pub fn new(streams: Vec<S>) -> Self {
        Self::with_bufsize(streams, DEFAULT_MERGE_BUFSIZE)
    }

    pub fn with_bufsize(streams: Vec<S>, bufsize: usize) -> Self {
        Self { lines: MergeLines::new(streams), bufsize, failed: None, done: false }
    }
}

impl<S: ByteStream> ByteStream for MergeStream<S> {
    fn next_chunk(&mut self) -> Result<Option<Bytes>, StreamError> {
        if let Some(e) = self.failed.take() {
            self.done = true;
            return Err(e);
        }
        if self.done {
            return Ok(None);
        }

        let mut buf = BytesMut::new();
        loop {
            match self.lines.next() {
                Some(Ok(line)) => {
                    buf.extend_from_slice(line.as_bytes());
                    if buf.len() > self.bufsize {
                        return Ok(Some(buf.freeze()));
                    }
                }
                Some(Err(e)) if buf.is_empty() => {
                    self.done = true;
                    return Err(e);
                }
                Some(Err(e)) => {
                    // Hand out what was merged before the failure first.
                    self.failed = Some(e);
                    return Ok(Some(buf.freeze()));
                }
                None => {
                    self.done = true;
                    debug!(resorts = self.lines.resorts(), "merge finished");
                    return Ok(if buf.is_empty() { None } else { Some(buf.freeze()) });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::MemoryStream;

    fn input(text: &'static str) -> MemoryStream {
        MemoryStream::with_chunk_size(text.as_bytes(), 2)
    }

    #[test]
    fn synchronized_inputs_never_resort() {
        let mut merged = merge_lines(vec![input("a\nb\nc\n"), input("x\ny\n")]);
        let out: Vec<String> = merged.by_ref().collect::<Result<_, _>>().unwrap();
        assert_eq!(out, vec!["a\n", "b\n", "c\n", "x\n", "y\n"]);
        assert_eq!(merged.resorts(), 0);
    }

    #[test]
    fn interleaved_inputs_resort() {
        let mut merged = merge_lines(vec![input("a\nc\n"), input("b\nd\n")]);
        let out: Vec<String> = merged.by_ref().collect::<Result<_, _>>().unwrap();
        assert_eq!(out, vec!["a\n", "b\n", "c\n", "d\n"]);
        assert!(merged.resorts() > 0);
    }
}
