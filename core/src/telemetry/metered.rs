//! telemetry/metered.rs
//! Stream wrapper that counts chunks, bytes and pull time into a shared meter.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;

use crate::stream::ByteStream;
use crate::types::StreamError;

#[derive(Debug, Default)]
struct MeterInner {
    chunks: AtomicU64,
    bytes: AtomicU64,
    nanos: AtomicU64,
}

/// Cloneable handle; all clones observe the same totals.
#[derive(Debug, Clone, Default)]
pub struct Meter {
    inner: Arc<MeterInner>,
}

impl Meter {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, len: usize, spent: Duration) {
        self.inner.chunks.fetch_add(1, Ordering::Relaxed);
        self.inner.bytes.fetch_add(len as u64, Ordering::Relaxed);
        self.inner.nanos.fetch_add(spent.as_nanos() as u64, Ordering::Relaxed);
    }

    pub fn chunks(&self) -> u64 {
        self.inner.chunks.load(Ordering::Relaxed)
    }

    pub fn bytes(&self) -> u64 {
        self.inner.bytes.load(Ordering::Relaxed)
    }

    /// Time spent inside the wrapped stream's `next_chunk`, upstream included.
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.inner.nanos.load(Ordering::Relaxed))
    }
}

pub struct MeteredStream<S> {
    inner: S,
    meter: Meter,
}

impl<S: ByteStream> MeteredStream<S> {
    pub fn new(inner: S, meter: Meter) -> Self {
        Self { inner, meter }
    }
}

impl<S: ByteStream> ByteStream for MeteredStream<S> {
    fn next_chunk(&mut self) -> Result<Option<Bytes>, StreamError> {
        let t = Instant::now();
        let next = self.inner.next_chunk()?;
        if let Some(chunk) = &next {
            self.meter.record(chunk.len(), t.elapsed());
        }
        Ok(next)
    }
}
