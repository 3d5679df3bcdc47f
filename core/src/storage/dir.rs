//! storage/dir.rs
//! Blob store over a local directory: key `a/b/c` lives at `<root>/a/b/c`.

use std::fs::{self, File};
use std::io::{self, ErrorKind, Read};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::constants::{DEFAULT_LIST_PAGE_SIZE, DEFAULT_READ_CHUNK_SIZE};
use crate::filetree::walk;
use crate::storage::types::{BlobStore, ListPage, ObjectMeta, StorageError};
use crate::stream::{BoxStream, ReaderStream};

/// Name prefix of uploads not yet renamed into place.
const TMP_PREFIX: &str = ".tmp-put-";

#[derive(Debug, Clone)]
pub struct DirBlobStore {
    root: PathBuf,
    page_size: usize,
}

impl DirBlobStore {
    /// Creates `root` if it does not exist.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root, page_size: DEFAULT_LIST_PAGE_SIZE })
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Keys are `/`-separated relative paths without empty, `.` or `..`
    /// segments, so they can never leave the root. Names carrying the
    /// upload prefix are reserved.
    fn key_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let invalid = key.is_empty()
            || key.contains('\\')
            || key.split('/').any(|seg| seg.is_empty() || seg == "." || seg == ".." || seg.starts_with(TMP_PREFIX));
        if invalid {
            return Err(StorageError::InvalidKey { key: key.to_string() });
        }
        Ok(key.split('/').fold(self.root.clone(), |p, seg| p.join(seg)))
    }

    fn meta(key: String, md: &fs::Metadata) -> io::Result<ObjectMeta> {
        Ok(ObjectMeta {
            key,
            size: md.len(),
            last_modified: DateTime::<Utc>::from(md.modified()?),
        })
    }

    /// Every stored key, sorted. In-flight uploads are not keys.
    fn collect_keys(&self) -> io::Result<Vec<(String, fs::Metadata)>> {
        let mut out = Vec::new();
        for item in walk(&self.root) {
            let (path, md) = item?;
            let Ok(rel) = path.strip_prefix(&self.root) else { continue };
            let segs: Vec<String> = rel.components().map(|c| c.as_os_str().to_string_lossy().into_owned()).collect();
            if segs.last().map_or(true, |name| name.starts_with(TMP_PREFIX)) {
                continue;
            }
            out.push((segs.join("/"), md));
        }
        out.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(out)
    }
}

fn not_found(key: &str, e: io::Error) -> StorageError {
    if e.kind() == ErrorKind::NotFound {
        StorageError::NotFound { key: key.to_string() }
    } else {
        StorageError::Io(e)
    }
}

impl BlobStore for DirBlobStore {
    fn get(&self, key: &str) -> Result<BoxStream, StorageError> {
        let path = self.key_path(key)?;
        let file = File::open(&path).map_err(|e| not_found(key, e))?;
        Ok(Box::new(ReaderStream::with_chunk_size(file, DEFAULT_READ_CHUNK_SIZE)))
    }

    fn put(&self, key: &str, body: &mut dyn Read) -> Result<u64, StorageError> {
        let path = self.key_path(key)?;
        let parent = path.parent().unwrap_or(self.root.as_path());
        fs::create_dir_all(parent)?;
        // Dropping the temp file on any error removes it.
        let mut tmp = tempfile::Builder::new().prefix(TMP_PREFIX).tempfile_in(parent)?;
        let written = io::copy(body, tmp.as_file_mut())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| e.error)?;
        debug!(key, written, "put");
        Ok(written)
    }

    fn head(&self, key: &str) -> Result<Option<ObjectMeta>, StorageError> {
        let path = self.key_path(key)?;
        match fs::metadata(&path) {
            Ok(md) if md.is_file() => Ok(Some(Self::meta(key.to_string(), &md)?)),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self, prefix: &str, marker: Option<&str>) -> Result<ListPage, StorageError> {
        let mut all = self.collect_keys()?;
        all.retain(|(k, _)| k.starts_with(prefix) && marker.map_or(true, |m| k.as_str() > m));

        let is_truncated = all.len() > self.page_size;
        let entries = all
            .into_iter()
            .take(self.page_size)
            .map(|(k, md)| Self::meta(k, &md))
            .collect::<io::Result<Vec<_>>>()?;
        Ok(ListPage { entries, is_truncated })
    }

    fn delete(&self, keys: &[String]) -> Result<usize, StorageError> {
        let mut removed = 0;
        for key in keys {
            match fs::remove_file(self.key_path(key)?) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(removed)
    }
}
