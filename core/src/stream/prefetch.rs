//! stream/prefetch.rs
//! Optional chunk-at-a-time pipelining.
//!
//! Runs an upstream on a worker thread behind a bounded crossbeam channel so
//! reading and decoding overlap with the consumer. Chunk order is preserved
//! and at most `depth` chunks are in flight. Dropping the consumer
//! disconnects the channel and the worker stops at its next send.

use std::thread::{self, JoinHandle};

use bytes::Bytes;
use crossbeam::channel::{bounded, Receiver};
use tracing::debug;

use crate::constants::DEFAULT_PREFETCH_DEPTH;
use crate::stream::core::{BoxStream, ByteStream};
use crate::types::StreamError;

type Item = Result<Option<Bytes>, StreamError>;

pub struct Prefetch {
    rx: Receiver<Item>,
    worker: Option<JoinHandle<()>>,
    done: bool,
}

impl Prefetch {
    pub fn spawn(upstream: BoxStream) -> Self {
        Self::with_depth(upstream, DEFAULT_PREFETCH_DEPTH)
    }

    pub fn with_depth(mut upstream: BoxStream, depth: usize) -> Self {
        let (tx, rx) = bounded::<Item>(depth.max(1));
        let worker = thread::spawn(move || loop {
            let item = upstream.next_chunk();
            let last = !matches!(item, Ok(Some(_)));
            if tx.send(item).is_err() {
                debug!("prefetch consumer gone");
                break;
            }
            if last {
                break;
            }
        });
        Self { rx, worker: Some(worker), done: false }
    }

    fn join(&mut self) -> Result<(), StreamError> {
        match self.worker.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| StreamError::Pipeline("prefetch worker panicked")),
            None => Ok(()),
        }
    }
}

impl ByteStream for Prefetch {
    fn next_chunk(&mut self) -> Result<Option<Bytes>, StreamError> {
        if self.done {
            return Ok(None);
        }
        match self.rx.recv() {
            Ok(Ok(Some(chunk))) => Ok(Some(chunk)),
            Ok(Ok(None)) => {
                self.done = true;
                self.join()?;
                Ok(None)
            }
            Ok(Err(e)) => {
                self.done = true;
                Err(e)
            }
            Err(_) => {
                self.done = true;
                self.join()?;
                Err(StreamError::Pipeline("prefetch worker disconnected"))
            }
        }
    }
}
