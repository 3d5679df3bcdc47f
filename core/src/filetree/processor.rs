//! filetree/processor.rs
//! Per-file actions driven by `process_walk`.

use std::collections::HashSet;
use std::fs::{self, Metadata, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::ProcessConfig;
use crate::filetree::filter::FileFilter;
use crate::storage::{list_all, put_stream, BlobStore, StorageError};
use crate::stream::{drain_to, PipelineBuilder};
use crate::types::StreamError;

pub trait FileProcessor {
    fn name(&self) -> &'static str;

    fn filter(&self) -> &FileFilter;

    /// Whether this processor wants the file at all.
    fn check(&self, path: &Path, meta: &Metadata) -> bool {
        self.filter().matches(path, meta)
    }

    /// Act on one file. `Ok(true)` means later processors skip it.
    fn process(&mut self, path: &Path, meta: &Metadata) -> Result<bool, StreamError>;
}

fn path_str(path: &Path) -> Result<&str, StreamError> {
    path.to_str()
        .ok_or_else(|| StreamError::Validation(format!("non UTF-8 path: {}", path.display())))
}

fn mtime(meta: &Metadata) -> DateTime<Local> {
    DateTime::<Local>::from(meta.modified().unwrap_or(SystemTime::UNIX_EPOCH))
}

/// Logs what it sees.
pub struct DebugProcessor {
    filter: FileFilter,
}

impl DebugProcessor {
    pub fn new(filter: FileFilter) -> Self {
        Self { filter }
    }
}

impl FileProcessor for DebugProcessor {
    fn name(&self) -> &'static str {
        "debug"
    }

    fn filter(&self) -> &FileFilter {
        &self.filter
    }

    fn process(&mut self, path: &Path, meta: &Metadata) -> Result<bool, StreamError> {
        info!(path = %path.display(), size = meta.len(), mtime = %mtime(meta), "debug");
        Ok(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListEntry {
    pub path: PathBuf,
    pub size: u64,
    pub modified: DateTime<Local>,
}

/// Collects matching files.
pub struct ListProcessor {
    filter: FileFilter,
    entries: Vec<ListEntry>,
}

impl ListProcessor {
    pub fn new(filter: FileFilter) -> Self {
        Self { filter, entries: Vec::new() }
    }

    pub fn entries(&self) -> &[ListEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<ListEntry> {
        self.entries
    }
}

impl FileProcessor for ListProcessor {
    fn name(&self) -> &'static str {
        "list"
    }

    fn filter(&self) -> &FileFilter {
        &self.filter
    }

    fn process(&mut self, path: &Path, meta: &Metadata) -> Result<bool, StreamError> {
        self.entries.push(ListEntry {
            path: path.to_path_buf(),
            size: meta.len(),
            modified: mtime(meta),
        });
        Ok(false)
    }
}

pub struct DeleteProcessor {
    filter: FileFilter,
    dry: bool,
}

impl DeleteProcessor {
    pub fn new(filter: FileFilter, dry: bool) -> Self {
        Self { filter, dry }
    }
}

impl FileProcessor for DeleteProcessor {
    fn name(&self) -> &'static str {
        "delete"
    }

    fn filter(&self) -> &FileFilter {
        &self.filter
    }

    fn process(&mut self, path: &Path, meta: &Metadata) -> Result<bool, StreamError> {
        if self.dry {
            info!(path = %path.display(), size = meta.len(), "(dry) delete");
        } else {
            info!(path = %path.display(), size = meta.len(), "(wet) delete");
            fs::remove_file(path)?;
        }
        Ok(true)
    }
}

/// Re-encodes a file in place: writes `<name>` converted to the configured
/// mode next to it, keeps the mtime, then removes the original.
pub struct CompressProcessor {
    filter: FileFilter,
    config: ProcessConfig,
    builder: PipelineBuilder<'static>,
}

impl CompressProcessor {
    pub fn new(filter: FileFilter, config: ProcessConfig) -> Self {
        Self { filter, config, builder: PipelineBuilder::new() }
    }

    pub fn with_builder(mut self, builder: PipelineBuilder<'static>) -> Self {
        self.builder = builder;
        self
    }

    fn write_new(&self, stream: &mut dyn crate::stream::ByteStream, target: &Path, meta: &Metadata) -> Result<u64, StreamError> {
        // create_new: never clobber an existing file of the target name
        let mut file = OpenOptions::new().write(true).create_new(true).open(target)?;
        let written = drain_to(stream, &mut file)?;
        file.flush()?;
        if let Ok(modified) = meta.modified() {
            file.set_modified(modified)?;
        }
        fs::set_permissions(target, meta.permissions())?;
        Ok(written)
    }
}

impl FileProcessor for CompressProcessor {
    fn name(&self) -> &'static str {
        "compress"
    }

    fn filter(&self) -> &FileFilter {
        &self.filter
    }

    fn process(&mut self, path: &Path, meta: &Metadata) -> Result<bool, StreamError> {
        let name = path_str(path)?;
        let (new_name, mut stream) = self.builder.build(name, &self.config.mode, None)?;
        if new_name == name {
            debug!(path = name, "unchanged");
            return Ok(false);
        }
        let target = PathBuf::from(&new_name);

        if self.config.dry {
            let size = drain_to(&mut stream, &mut io::sink())?;
            info!(from = name, to = %new_name, size_from = meta.len(), size_to = size, "(dry) compress");
            return Ok(true);
        }

        match self.write_new(&mut stream, &target, meta) {
            Ok(size) => {
                info!(from = name, to = %new_name, size_from = meta.len(), size_to = size, "compress");
                fs::remove_file(path)?;
                Ok(true)
            }
            Err(e) => {
                // Only remove what this call created.
                if !matches!(&e, StreamError::Io(io_err) if io_err.kind() == io::ErrorKind::AlreadyExists) {
                    let _ = fs::remove_file(&target);
                }
                Err(e)
            }
        }
    }
}

/// Uploads files into a blob store under `prefix + path relative to top`,
/// converted to the configured mode. Keys already present are skipped.
pub struct UploadProcessor {
    filter: FileFilter,
    config: ProcessConfig,
    builder: PipelineBuilder<'static>,
    store: Arc<dyn BlobStore>,
    prefix: String,
    top: PathBuf,
    skip_names: HashSet<String>,
}

impl UploadProcessor {
    /// Lists `prefix` once up front to learn which keys already exist.
    pub fn new(
        store: Arc<dyn BlobStore>,
        prefix: impl Into<String>,
        top: impl Into<PathBuf>,
        filter: FileFilter,
        config: ProcessConfig,
    ) -> Result<Self, StorageError> {
        let prefix = prefix.into();
        let skip_names = list_all(store.as_ref(), &prefix)?
            .into_iter()
            .map(|m| m.key)
            .collect();
        Ok(Self {
            filter,
            config,
            builder: PipelineBuilder::new(),
            store,
            prefix,
            top: top.into(),
            skip_names,
        })
    }

    fn object_key(&self, new_name: &str) -> Result<String, StreamError> {
        let rel = Path::new(new_name).strip_prefix(&self.top).map_err(|_| {
            StreamError::Validation(format!("{new_name} is not below {}", self.top.display()))
        })?;
        let rel: Vec<String> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Ok(format!("{}{}", self.prefix, rel.join("/")))
    }
}

impl FileProcessor for UploadProcessor {
    fn name(&self) -> &'static str {
        "upload"
    }

    fn filter(&self) -> &FileFilter {
        &self.filter
    }

    fn process(&mut self, path: &Path, meta: &Metadata) -> Result<bool, StreamError> {
        let name = path_str(path)?;
        let (new_name, mut stream) = self.builder.build(name, &self.config.mode, None)?;
        let key = self.object_key(&new_name)?;
        if self.skip_names.contains(&key) {
            info!(key = %key, "already exists");
            return Ok(true);
        }

        if self.config.dry {
            let size = drain_to(&mut stream, &mut io::sink())?;
            info!(from = name, key = %key, size_from = meta.len(), size_to = size, "(dry) upload");
        } else {
            let size = put_stream(self.store.as_ref(), &key, stream)?;
            info!(from = name, key = %key, size_from = meta.len(), size_to = size, "upload");
            self.skip_names.insert(key);
        }
        Ok(false)
    }
}
