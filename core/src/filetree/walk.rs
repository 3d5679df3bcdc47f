//! filetree/walk.rs
//! Directory walk and the per-file batch driver.

use std::fs::{self, Metadata};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use jwalk::{DirEntryIter, Parallelism, WalkDir};
use serde::Serialize;
use tracing::{debug, warn};

use crate::filetree::processor::FileProcessor;

/// Depth-first walk yielding regular files, sorted by name within each
/// directory. Symlinks are neither yielded nor followed. Unreadable
/// directories are reported as errors and the walk continues; an entry
/// that vanishes between listing and `lstat` is skipped.
pub struct Walk {
    entries: DirEntryIter<((), ())>,
}

pub fn walk(top: impl Into<PathBuf>) -> Walk {
    let entries = WalkDir::new(top.into())
        .sort(true)
        .skip_hidden(false)
        .follow_links(false)
        .parallelism(Parallelism::Serial)
        .into_iter();
    Walk { entries }
}

impl Iterator for Walk {
    type Item = io::Result<(PathBuf, Metadata)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(io::Error::other(e))),
            };
            let path = entry.path();
            match fs::symlink_metadata(&path) {
                Ok(meta) if meta.is_file() => return Some(Ok((path, meta))),
                Ok(_) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    debug!(path = %path.display(), "vanished during walk");
                }
                Err(e) => return Some(Err(io::Error::new(e.kind(), format!("{}: {e}", path.display())))),
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WalkSummary {
    /// Regular files visited.
    pub seen: u64,
    /// Successful `process` calls.
    pub processed: u64,
    /// Files (or directories) that failed; the walk went on without them.
    pub failed: u64,
}

/// Offer every file under `top` to each processor in turn.
///
/// A processor whose `check` passes gets `process`; returning `true` stops
/// later processors for that file. Failures are logged and counted, never
/// propagated: one bad file must not abort the batch.
pub fn process_walk(top: &Path, processors: &mut [&mut dyn FileProcessor]) -> WalkSummary {
    let mut summary = WalkSummary::default();
    for item in walk(top) {
        let (path, meta) = match item {
            Ok(found) => found,
            Err(e) => {
                warn!(error = %e, "walk failed");
                summary.failed += 1;
                continue;
            }
        };
        summary.seen += 1;

        for proc in processors.iter_mut() {
            let chk = proc.check(&path, &meta);
            debug!(processor = proc.name(), path = %path.display(), chk, "check");
            if !chk {
                continue;
            }
            match proc.process(&path, &meta) {
                Ok(stop) => {
                    summary.processed += 1;
                    debug!(processor = proc.name(), path = %path.display(), stop, "process");
                    if stop {
                        break;
                    }
                }
                Err(e) => {
                    warn!(processor = proc.name(), path = %path.display(), error = %e, "process failed, skipping");
                    summary.failed += 1;
                    break;
                }
            }
        }
    }
    summary
}
