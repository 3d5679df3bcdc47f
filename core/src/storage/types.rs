//! storage/types.rs
//! Blob store interface, object metadata and storage errors.

use std::io::{self, Read};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::stream::BoxStream;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object not found: {key}")]
    NotFound { key: String },

    #[error("invalid object key: {key:?}")]
    InvalidKey { key: String },

    #[error("storage I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("store lock poisoned")]
    Poisoned,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectMeta {
    pub key: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

/// One page of a listing. Continue with `marker = last key` while
/// `is_truncated` holds.
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    pub entries: Vec<ObjectMeta>,
    pub is_truncated: bool,
}

pub trait BlobStore: Send + Sync {
    /// Object body as a chunked stream.
    fn get(&self, key: &str) -> Result<BoxStream, StorageError>;

    /// Store everything `body` yields under `key`; returns bytes stored.
    fn put(&self, key: &str, body: &mut dyn Read) -> Result<u64, StorageError>;

    fn head(&self, key: &str) -> Result<Option<ObjectMeta>, StorageError>;

    /// Keys starting with `prefix`, ascending, strictly after `marker`.
    fn list(&self, prefix: &str, marker: Option<&str>) -> Result<ListPage, StorageError>;

    /// Delete keys; missing keys are ignored. Returns how many existed.
    fn delete(&self, keys: &[String]) -> Result<usize, StorageError>;
}
