//! stream/lines.rs
//! Line iteration over a byte stream.
//!
//! Summary: each chunk is cut at its last `\n`; the completed block is split
//! into lines and the partial tail is carried into the next chunk. A final
//! fragment without a newline is yielded at end of stream. Lines keep their
//! terminating `\n`. Invalid UTF-8 is an error: the lines before it are
//! still yielded, then the iterator ends.

use std::collections::VecDeque;
use std::mem;

use crate::stream::core::ByteStream;
use crate::types::StreamError;

pub struct Lines<S> {
    upstream: S,
    /// Bytes after the last newline seen so far.
    rest: Vec<u8>,
    /// Complete lines split from the last block, not yet yielded.
    pending: VecDeque<Result<String, StreamError>>,
    done: bool,
}

/// Lazy, single-pass line iterator over `stream`.
pub fn lines<S: ByteStream>(stream: S) -> Lines<S> {
    Lines::new(stream)
}

impl<S: ByteStream> Lines<S> {
    pub fn new(upstream: S) -> Self {
        Self { upstream, rest: Vec::new(), pending: VecDeque::new(), done: false }
    }

    fn push_block(&mut self, chunk: &[u8], last_newline: usize) {
        self.rest.extend_from_slice(&chunk[..=last_newline]);
        let block = mem::replace(&mut self.rest, chunk[last_newline + 1..].to_vec());
        self.pending.extend(
            block
                .split_inclusive(|&b| b == b'\n')
                .map(|line| decode(line.to_vec())),
        );
    }
}

fn decode(line: Vec<u8>) -> Result<String, StreamError> {
    String::from_utf8(line).map_err(StreamError::from)
}

impl<S: ByteStream> Iterator for Lines<S> {
    type Item = Result<String, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(line) = self.pending.pop_front() {
                if line.is_err() {
                    self.done = true;
                    self.pending.clear();
                }
                return Some(line);
            }
            if self.done {
                return None;
            }
            match self.upstream.next_chunk() {
                Ok(Some(chunk)) => match chunk.iter().rposition(|&b| b == b'\n') {
                    Some(d) => self.push_block(&chunk, d),
                    None => self.rest.extend_from_slice(&chunk),
                },
                Ok(None) => {
                    self.done = true;
                    if !self.rest.is_empty() {
                        let tail = mem::take(&mut self.rest);
                        return Some(decode(tail));
                    }
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::MemoryStream;

    fn collect(data: &'static [u8], chunk: usize) -> Vec<String> {
        lines(MemoryStream::with_chunk_size(data, chunk))
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn keeps_newlines_and_tail() {
        assert_eq!(collect(b"a\nbb\nccc", 100), vec!["a\n", "bb\n", "ccc"]);
        assert_eq!(collect(b"a\nbb\nccc", 1), vec!["a\n", "bb\n", "ccc"]);
    }

    #[test]
    fn invalid_utf8_ends_the_lines() {
        let mut it = lines(MemoryStream::with_chunk_size(&b"ok\na\xff\nnever\n"[..], 100));
        assert_eq!(it.next().unwrap().unwrap(), "ok\n");
        assert!(matches!(it.next(), Some(Err(StreamError::Utf8(_)))));
        assert!(it.next().is_none());
    }

    #[test]
    fn empty_lines_survive() {
        assert_eq!(collect(b"\n\nx\n", 2), vec!["\n", "\n", "x\n"]);
        assert!(collect(b"", 2).is_empty());
    }
}
