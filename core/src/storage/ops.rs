//! storage/ops.rs
//! Helpers over any `BlobStore`: full listing, streamed upload, disk usage
//! and suffix-based deletion.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::{debug, info};

use crate::storage::types::{BlobStore, ObjectMeta, StorageError};
use crate::stream::{ByteStream, StreamReader};
use crate::types::StreamError;

/// Every object under `prefix`, following pagination markers.
pub fn list_all(store: &dyn BlobStore, prefix: &str) -> Result<Vec<ObjectMeta>, StorageError> {
    let mut out = Vec::new();
    let mut marker: Option<String> = None;
    loop {
        let page = store.list(prefix, marker.as_deref())?;
        let last = page.entries.last().map(|m| m.key.clone());
        out.extend(page.entries);
        match last {
            Some(key) if page.is_truncated => marker = Some(key),
            _ => return Ok(out),
        }
    }
}

/// Upload a stream through the sized-read adapter.
///
/// A stream failure that crossed the `Read` boundary comes back as the
/// original `StreamError`, so corrupt input stays classified as corrupt.
pub fn put_stream<S: ByteStream>(store: &dyn BlobStore, key: &str, stream: S) -> Result<u64, StreamError> {
    let mut reader = StreamReader::new(stream);
    let written = store.put(key, &mut reader).map_err(unwrap_stream_error)?;
    debug!(key, written, "put stream");
    Ok(written)
}

fn unwrap_stream_error(err: StorageError) -> StreamError {
    let io_err = match err {
        StorageError::Io(io_err) if io_err.get_ref().is_some_and(|inner| inner.is::<StreamError>()) => io_err,
        other => return other.into(),
    };
    let kind = io_err.kind();
    match io_err.into_inner().map(|inner| inner.downcast::<StreamError>()) {
        Some(Ok(inner)) => *inner,
        Some(Err(inner)) => StorageError::Io(std::io::Error::new(kind, inner)).into(),
        None => StorageError::Io(kind.into()).into(),
    }
}

/// Object count and total size under one directory-like key prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuRow {
    pub name: String,
    pub count: u64,
    pub size: u64,
}

impl fmt::Display for DuRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>10} {:>5} {}", self.size, self.count, self.name)
    }
}

/// Group objects by the key part before the last `pathsep`. Keys without a
/// separator are grouped under the empty name.
///
/// With `summary`, every directory's own totals are also added to each of
/// its ancestors. Rows come out largest first.
pub fn disk_usage(entries: &[ObjectMeta], pathsep: &str, summary: bool) -> Vec<DuRow> {
    let mut own: BTreeMap<String, (u64, u64)> = BTreeMap::new();
    for meta in entries {
        let dirname = meta.key.rsplit_once(pathsep).map_or("", |(d, _)| d);
        let slot = own.entry(dirname.to_string()).or_default();
        slot.0 += 1;
        slot.1 += meta.size;
    }

    let mut totals = own.clone();
    if summary && !pathsep.is_empty() {
        for (dir, (count, size)) in &own {
            let mut current = dir.as_str();
            while let Some((parent, _)) = current.rsplit_once(pathsep) {
                let slot = totals.entry(parent.to_string()).or_default();
                slot.0 += count;
                slot.1 += size;
                current = parent;
            }
        }
    }

    let mut rows: Vec<DuRow> = totals
        .into_iter()
        .map(|(name, (count, size))| DuRow { name, count, size })
        .collect();
    // stable: equal sizes keep name order
    rows.sort_by(|a, b| b.size.cmp(&a.size));
    rows
}

/// Delete every object under `prefix` whose key ends with `suffix`.
/// Dry runs only report. Returns the matching keys.
pub fn delete_by_suffix(
    store: &dyn BlobStore,
    prefix: &str,
    suffix: &str,
    dry: bool,
) -> Result<Vec<String>, StorageError> {
    let targets: Vec<String> = list_all(store, prefix)?
        .into_iter()
        .map(|m| m.key)
        .filter(|k| k.ends_with(suffix))
        .collect();

    if targets.is_empty() {
        info!(prefix, suffix, "no object found");
    } else if dry {
        info!(count = targets.len(), "(dry) remove objects");
        debug!(?targets, "(dry) remove objects");
    } else {
        let removed = store.delete(&targets)?;
        info!(count = removed, "removed objects");
    }
    Ok(targets)
}
