//! serve/list.rs
//! Day index of the log files below a request path.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path};

use tracing::{debug, warn};

use crate::compression::registry::registry;
use crate::filetree::{name_date, walk};
use crate::serve::{resolve_path, ServeConfig, ServeError};
use crate::utils::split_ext;

/// directory uri -> `YYYY-MM-DD` -> uri of the uncompressed name.
pub type DateIndex = BTreeMap<String, BTreeMap<String, String>>;

/// Suffixes, besides codec suffixes, that mark a log file.
const PLAIN_SUFFIXES: &[&str] = &[".log", ".txt"];

fn to_uri(config: &ServeConfig, path: &Path) -> String {
    let rel = path.strip_prefix(&config.working_dir).unwrap_or(path);
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn register(config: &ServeConfig, index: &mut DateIndex, path: &Path) {
    let Some(file_name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
        return;
    };
    let Some(day) = name_date(&file_name) else {
        return;
    };
    let uri = to_uri(config, path);
    let (base, ext) = split_ext(&uri);
    let value = if registry().lookup_by_suffix(ext).is_some() { base } else { uri.as_str() };
    let dir = path.parent().map(|p| to_uri(config, p)).unwrap_or_default();
    index
        .entry(dir)
        .or_default()
        .entry(day.format("%Y-%m-%d").to_string())
        .or_insert_with(|| value.to_string());
}

fn is_log_name(name: &str) -> bool {
    let ext = split_ext(name).1;
    PLAIN_SUFFIXES.contains(&ext) || registry().lookup_by_suffix(ext).is_some()
}

fn register_tree(config: &ServeConfig, index: &mut DateIndex, top: &Path, file_prefix: &str) {
    for item in walk(top) {
        let path = match item {
            Ok((path, _)) => path,
            Err(e) => {
                warn!(error = %e, "list walk failed");
                continue;
            }
        };
        let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        if name.starts_with(file_prefix) && is_log_name(&name) {
            register(config, index, &path);
        }
    }
}

/// Index dated log files under `uri_path`.
///
/// A directory is walked; otherwise every entry of the parent whose name
/// starts with the last segment is taken (files directly, directories
/// walked). Walked files must start with `file_prefix` and carry a log or
/// codec suffix. When two files share a day, the first in walk order wins.
pub fn list_dates(config: &ServeConfig, uri_path: &str, file_prefix: &str) -> Result<DateIndex, ServeError> {
    let target = resolve_path(config, uri_path)?;
    let mut index = DateIndex::new();

    if target.is_dir() {
        register_tree(config, &mut index, &target, file_prefix);
        return Ok(index);
    }

    let (Some(parent), Some(stem)) = (target.parent(), target.file_name()) else {
        return Ok(index);
    };
    let stem = stem.to_string_lossy();
    let Ok(entries) = fs::read_dir(parent) else {
        return Ok(index);
    };
    let mut matched: Vec<_> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.file_name().is_some_and(|n| n.to_string_lossy().starts_with(&*stem)))
        .collect();
    matched.sort();

    for path in matched {
        // symlinks are never followed, same as the walk
        let Ok(meta) = fs::symlink_metadata(&path) else {
            continue;
        };
        if meta.is_file() {
            register(config, &mut index, &path);
        } else if meta.is_dir() {
            register_tree(config, &mut index, &path, file_prefix);
        }
    }
    debug!(path = uri_path, dirs = index.len(), "list dates");
    Ok(index)
}
