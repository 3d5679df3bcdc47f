//! serve/read.rs
//! Request path resolution and read-source selection.

use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::compression::constants::modes;
use crate::compression::registry::registry;
use crate::constants::{DEFAULT_READ_CHUNK_SIZE, PRECOMPRESSED_ENCODINGS};
use crate::serve::{ServeConfig, ServeError};
use crate::stream::{BoxStream, PipelineBuilder, ReaderStream};
use crate::types::StreamError;
use crate::utils::split_ext;

/// What to answer a read request with.
pub struct ReadResponse {
    /// File the body is read from.
    pub path: PathBuf,
    /// `Content-Encoding` to send, when serving a pre-compressed sibling.
    pub content_encoding: Option<&'static str>,
    pub content_type: String,
    pub body: BoxStream,
}

impl fmt::Debug for ReadResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadResponse")
            .field("path", &self.path)
            .field("content_encoding", &self.content_encoding)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// Join `uri_path` onto the working directory.
///
/// `.` and empty segments are dropped and `..` pops a segment; popping past
/// the working directory is rejected, as is a symlink leading out of it.
pub fn resolve_path(config: &ServeConfig, uri_path: &str) -> Result<PathBuf, ServeError> {
    let escape = || {
        warn!(working_dir = %config.working_dir.display(), path = uri_path, "out of path");
        ServeError::PathEscape { path: uri_path.to_string() }
    };

    let mut segments: Vec<&str> = Vec::new();
    for seg in uri_path.split(['/', '\\']) {
        match seg {
            "" | "." => {}
            ".." => {
                segments.pop().ok_or_else(escape)?;
            }
            s if s.contains('\0') => return Err(escape()),
            s => segments.push(s),
        }
    }

    let mut target = config.working_dir.clone();
    target.extend(segments);
    if !stays_inside(&config.working_dir, &target) {
        return Err(escape());
    }
    Ok(target)
}

/// Symlinks may still point outside: compare the deepest existing ancestor of
/// `target` after canonicalisation. A missing working directory contains
/// nothing, so anything below it is reported missing later.
fn stays_inside(root: &Path, target: &Path) -> bool {
    let Ok(root) = root.canonicalize() else {
        return true;
    };
    let existing = target.ancestors().find(|p| fs::symlink_metadata(p).is_ok());
    match existing.map(Path::canonicalize) {
        Some(Ok(real)) => real.starts_with(&root),
        // dangling symlink
        Some(Err(_)) => false,
        None => true,
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s = OsString::from(path.as_os_str());
    s.push(suffix);
    PathBuf::from(s)
}

fn open_raw(path: &Path) -> Result<BoxStream, StreamError> {
    Ok(Box::new(ReaderStream::open(path, DEFAULT_READ_CHUNK_SIZE)?))
}

/// Pick the body for a read of `uri_path`.
///
/// In order: a `<name>.br`/`<name>.gz` sibling when the client accepts that
/// encoding, served as-is; the file itself; `Forbidden` for anything else that
/// exists at the path; a `<name>.*` sibling decoded through the pipeline.
pub fn open_for_read(
    config: &ServeConfig,
    uri_path: &str,
    accept_encoding: &str,
) -> Result<ReadResponse, ServeError> {
    let target = resolve_path(config, uri_path)?;
    let accepts: Vec<&str> = accept_encoding.split(',').map(str::trim).collect();
    let respond = |path: PathBuf, content_encoding, body| ReadResponse {
        path,
        content_encoding,
        content_type: config.content_type.clone(),
        body,
    };

    for &(encoding, suffix) in PRECOMPRESSED_ENCODINGS {
        if !accepts.contains(&encoding) {
            continue;
        }
        let candidate = with_suffix(&target, suffix);
        if candidate.is_file() {
            info!(encoding, path = %candidate.display(), "compressed");
            let body = open_raw(&candidate)?;
            return Ok(respond(candidate, Some(encoding), body));
        }
    }

    if target.is_file() {
        info!(path = %target.display(), "raw");
        let body = open_raw(&target)?;
        return Ok(respond(target, None, body));
    }

    if fs::symlink_metadata(&target).is_ok() {
        return Err(ServeError::Forbidden { path: uri_path.to_string() });
    }

    let not_found = || ServeError::NotFound { path: uri_path.to_string() };
    let (Some(parent), Some(file_name)) = (target.parent(), target.file_name()) else {
        return Err(not_found());
    };
    let prefix = format!("{}.", file_name.to_string_lossy());

    let entries = match fs::read_dir(parent) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(not_found()),
        Err(e) => return Err(e.into()),
    };
    let mut siblings = Vec::new();
    for entry in entries {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with(&prefix) && entry.file_type()?.is_file() {
            siblings.push(entry.path());
        }
    }
    siblings.sort();
    debug!(path = %target.display(), candidates = siblings.len(), "compressed siblings");

    // Prefer a sibling whose suffix names a codec we can decode.
    let known = siblings.iter().position(|p| {
        let name = p.to_string_lossy();
        registry().lookup_by_suffix(split_ext(&name).1).is_some()
    });
    if siblings.is_empty() {
        return Err(not_found());
    }
    let found = siblings.swap_remove(known.unwrap_or(0));

    let name = found
        .to_str()
        .ok_or_else(|| StreamError::Validation(format!("non UTF-8 path: {}", found.display())))?;
    let (_, body) = PipelineBuilder::new().build(name, modes::DECOMPRESS, None)?;
    info!(path = name, "auto decompress");
    Ok(respond(found, None, body))
}
