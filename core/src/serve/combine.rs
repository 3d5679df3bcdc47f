//! serve/combine.rs
//! Whole-period reads: every dated file below a path, concatenated or merged.

use tracing::debug;

use crate::serve::{list_dates, open_for_read, DateIndex, ServeConfig, ServeError};
use crate::stream::{BoxStream, CatStream, MergeStream};

fn open_all(config: &ServeConfig, uri_path: &str, index: &DateIndex) -> Result<Vec<BoxStream>, ServeError> {
    let uris: Vec<&String> = index.values().flat_map(|days| days.values()).collect();
    if uris.is_empty() {
        return Err(ServeError::NotFound { path: uri_path.to_string() });
    }
    debug!(path = uri_path, files = uris.len(), "open dated files");
    uris.into_iter()
        .map(|uri| open_for_read(config, uri, "").map(|r| r.body))
        .collect()
}

/// Dated files below `uri_path` whose names start with `file_prefix`,
/// decoded and concatenated directory by directory, oldest day first.
pub fn open_concat(config: &ServeConfig, uri_path: &str, file_prefix: &str) -> Result<BoxStream, ServeError> {
    let index = list_dates(config, uri_path, file_prefix)?;
    Ok(Box::new(CatStream::new(open_all(config, uri_path, &index)?)))
}

/// Like `open_concat`, but the lines of all files are merged in sort order.
pub fn open_merged(config: &ServeConfig, uri_path: &str, file_prefix: &str) -> Result<BoxStream, ServeError> {
    let index = list_dates(config, uri_path, file_prefix)?;
    Ok(Box::new(MergeStream::new(open_all(config, uri_path, &index)?)))
}
