//! stream/io.rs
//! Stream sources and sinks: readers, files, memory buffers, stdout.

use std::fs::File;
use std::io::{self, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use tracing::debug;

use crate::constants::DEFAULT_READ_CHUNK_SIZE;
use crate::stream::core::{BoxStream, ByteStream};
use crate::types::StreamError;

/// Chunked source over any reader (file, network body, pipe).
pub struct ReaderStream<R> {
    inner: R,
    chunk_size: usize,
    done: bool,
}

impl<R: Read + Send> ReaderStream<R> {
    pub fn new(inner: R) -> Self {
        Self::with_chunk_size(inner, DEFAULT_READ_CHUNK_SIZE)
    }

    pub fn with_chunk_size(inner: R, chunk_size: usize) -> Self {
        Self { inner, chunk_size: chunk_size.max(1), done: false }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl ReaderStream<File> {
    /// Open a file-backed stream. Fails immediately if the file is missing.
    pub fn open(path: impl AsRef<Path>, chunk_size: usize) -> Result<Self, StreamError> {
        let file = File::open(path.as_ref())?;
        Ok(Self::with_chunk_size(file, chunk_size))
    }
}

impl<R: Read + Send> ByteStream for ReaderStream<R> {
    fn next_chunk(&mut self) -> Result<Option<Bytes>, StreamError> {
        if self.done {
            return Ok(None);
        }
        let mut buf = vec![0u8; self.chunk_size];
        let n = loop {
            match self.inner.read(&mut buf) {
                Ok(n) => break n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        };
        debug!(len = n, "read file");
        if n == 0 {
            self.done = true;
            return Ok(None);
        }
        buf.truncate(n);
        Ok(Some(Bytes::from(buf)))
    }
}

/// In-memory source; chunks are zero-copy slices of the buffer.
#[derive(Debug, Clone)]
pub struct MemoryStream {
    data: Bytes,
    chunk_size: usize,
}

impl MemoryStream {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self::with_chunk_size(data, DEFAULT_READ_CHUNK_SIZE)
    }

    pub fn with_chunk_size(data: impl Into<Bytes>, chunk_size: usize) -> Self {
        Self { data: data.into(), chunk_size: chunk_size.max(1) }
    }
}

impl ByteStream for MemoryStream {
    fn next_chunk(&mut self) -> Result<Option<Bytes>, StreamError> {
        if self.data.is_empty() {
            return Ok(None);
        }
        let n = self.chunk_size.min(self.data.len());
        Ok(Some(self.data.split_to(n)))
    }
}

/// Canonical input abstraction
pub enum InputSource {
    Reader(Box<dyn Read + Send>),
    File(PathBuf),
    Memory(Bytes),
    Stdin,
}

/// Canonical output abstraction
pub enum OutputSink {
    Writer(Box<dyn Write + Send>),
    File(PathBuf),
    Memory(SharedBuffer),
    Stdout,
}

/// Normalize an input source into a chunked stream.
pub fn open_input(src: InputSource, chunk_size: usize) -> Result<BoxStream, StreamError> {
    let stream: BoxStream = match src {
        InputSource::Reader(r) => Box::new(ReaderStream::with_chunk_size(r, chunk_size)),
        InputSource::File(p) => Box::new(ReaderStream::open(p, chunk_size)?),
        InputSource::Memory(b) => Box::new(MemoryStream::with_chunk_size(b, chunk_size)),
        InputSource::Stdin => Box::new(ReaderStream::with_chunk_size(io::stdin(), chunk_size)),
    };
    Ok(stream)
}

/// Normalize an output sink into a boxed writer.
pub fn open_output(sink: OutputSink) -> Result<Box<dyn Write + Send>, StreamError> {
    let writer: Box<dyn Write + Send> = match sink {
        OutputSink::Writer(w) => w,
        OutputSink::File(p) => Box::new(io::BufWriter::new(File::create(p)?)),
        OutputSink::Memory(buf) => Box::new(buf),
        OutputSink::Stdout => Box::new(io::stdout()),
    };
    Ok(writer)
}

/// Write every chunk of `stream` into `out`, then flush.
/// Returns the number of bytes written.
pub fn drain_to<S, W>(stream: &mut S, out: &mut W) -> Result<u64, StreamError>
where
    S: ByteStream + ?Sized,
    W: Write + ?Sized,
{
    let mut written = 0u64;
    while let Some(chunk) = stream.next_chunk()? {
        out.write_all(&chunk)?;
        written += chunk.len() as u64;
    }
    out.flush()?;
    Ok(written)
}

/// Cloneable in-memory writer. All clones append to the same buffer.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move everything written so far onto the end of `out`.
    pub fn drain_into(&self, out: &mut Vec<u8>) -> io::Result<()> {
        let mut guard = self.buf.lock().map_err(|_| io::Error::other("shared buffer poisoned"))?;
        out.append(&mut guard);
        Ok(())
    }

    /// Take everything written so far.
    pub fn take(&self) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        self.drain_into(&mut out)?;
        Ok(out)
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let mut guard = self.buf.lock().map_err(|_| io::Error::other("shared buffer poisoned"))?;
        guard.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
