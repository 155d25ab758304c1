//! Listing line rendering
//!
//! `<permissions> <links> <owner>  <group> <size> <modtime> <path>\r\n`
//!
//! Owner and group are not resolved and always read `unknown`; the link
//! count is always 1.

use chrono::{DateTime, Utc};
use log::warn;

use crate::error::MetadataError;
use crate::storage::metadata::{MetadataRecord, MetadataSource};

const LINK_COUNT: u32 = 1;
const UNKNOWN_IDENTITY: &str = "unknown";
const MODTIME_FORMAT: &str = "%a %b %e %H:%M:%S UTC %Y";

/// Renders one listing line for a metadata record
pub fn format_record(record: &MetadataRecord) -> String {
    let modified: DateTime<Utc> = record.modified.into();

    format!(
        "{} {} {}  {} {} {} {}\r\n",
        record.permissions,
        LINK_COUNT,
        UNKNOWN_IDENTITY,
        UNKNOWN_IDENTITY,
        record.size,
        modified.format(MODTIME_FORMAT),
        record.path
    )
}

/// Looks up `path` and renders its listing line
pub fn format_metadata(source: &dyn MetadataSource, path: &str) -> Result<String, MetadataError> {
    source
        .stat(path)
        .map(|record| format_record(&record))
        .map_err(|e| MetadataError::new(path, e))
}

/// Renders a line for every entry under `path`.
///
/// Only a failure on `path` itself is an error. Children that can no longer
/// be read, such as dangling symlinks or files removed mid-listing, are
/// left out.
pub fn format_listing(
    source: &dyn MetadataSource,
    path: &str,
) -> Result<Vec<String>, MetadataError> {
    let entries = source.entries(path).map_err(|e| MetadataError::new(path, e))?;
    if entries.len() == 1 && entries[0] == path {
        return format_metadata(source, path).map(|line| vec![line]);
    }

    let mut lines = Vec::with_capacity(entries.len());
    for entry in &entries {
        match format_metadata(source, entry) {
            Ok(line) => lines.push(line),
            Err(e) => warn!("Skipping unreadable entry {}: {}", entry, e.source),
        }
    }
    Ok(lines)
}
