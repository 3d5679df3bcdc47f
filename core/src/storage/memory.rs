//! storage/memory.rs
//! In-memory blob store with configurable page size.

use std::collections::BTreeMap;
use std::io::Read;
use std::ops::Bound;
use std::sync::RwLock;

use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::constants::DEFAULT_LIST_PAGE_SIZE;
use crate::storage::types::{BlobStore, ListPage, ObjectMeta, StorageError};
use crate::stream::{BoxStream, MemoryStream};

#[derive(Debug)]
struct Object {
    body: Bytes,
    last_modified: DateTime<Utc>,
}

#[derive(Debug)]
pub struct MemoryBlobStore {
    objects: RwLock<BTreeMap<String, Object>>,
    page_size: usize,
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_LIST_PAGE_SIZE)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self { objects: RwLock::new(BTreeMap::new()), page_size: page_size.max(1) }
    }

    /// Insert a body directly.
    pub fn insert(&self, key: &str, body: impl Into<Bytes>) -> Result<(), StorageError> {
        let mut objects = self.objects.write().map_err(|_| StorageError::Poisoned)?;
        objects.insert(key.to_string(), Object { body: body.into(), last_modified: Utc::now() });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.objects.read().map(|o| o.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<BoxStream, StorageError> {
        let objects = self.objects.read().map_err(|_| StorageError::Poisoned)?;
        let object = objects
            .get(key)
            .ok_or_else(|| StorageError::NotFound { key: key.to_string() })?;
        Ok(Box::new(MemoryStream::new(object.body.clone())))
    }

    fn put(&self, key: &str, body: &mut dyn Read) -> Result<u64, StorageError> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey { key: key.to_string() });
        }
        let mut buf = Vec::new();
        body.read_to_end(&mut buf)?;
        let size = buf.len() as u64;
        self.insert(key, buf)?;
        Ok(size)
    }

    fn head(&self, key: &str) -> Result<Option<ObjectMeta>, StorageError> {
        let objects = self.objects.read().map_err(|_| StorageError::Poisoned)?;
        Ok(objects.get(key).map(|o| ObjectMeta {
            key: key.to_string(),
            size: o.body.len() as u64,
            last_modified: o.last_modified,
        }))
    }

    fn list(&self, prefix: &str, marker: Option<&str>) -> Result<ListPage, StorageError> {
        let objects = self.objects.read().map_err(|_| StorageError::Poisoned)?;
        let start = match marker {
            Some(m) if m >= prefix => Bound::Excluded(m.to_string()),
            _ => Bound::Included(prefix.to_string()),
        };
        let mut matching = objects
            .range::<String, _>((start, Bound::Unbounded))
            .take_while(|(k, _)| k.starts_with(prefix));

        let entries: Vec<ObjectMeta> = matching
            .by_ref()
            .take(self.page_size)
            .map(|(k, o)| ObjectMeta {
                key: k.clone(),
                size: o.body.len() as u64,
                last_modified: o.last_modified,
            })
            .collect();
        let is_truncated = matching.next().is_some();
        Ok(ListPage { entries, is_truncated })
    }

    fn delete(&self, keys: &[String]) -> Result<usize, StorageError> {
        let mut objects = self.objects.write().map_err(|_| StorageError::Poisoned)?;
        Ok(keys.iter().filter(|k| objects.remove(k.as_str()).is_some()).count())
    }
}
