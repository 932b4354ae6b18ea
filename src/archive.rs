//! Result archive extraction.
//!
//! The detection job writes a gzip-compressed tar archive whose `output`
//! member holds the JSON Lines results. Extraction streams through the
//! archive once: entries are visited in order, non-matching entries are
//! skipped unread, and the first entry whose name matches exactly is
//! handed to the caller. Later duplicates are never visited.
//!
//! The gzip layer may consist of several concatenated members; they are
//! decoded as one continuous tar stream.

use std::io::Read;

use flate2::read::MultiGzDecoder;
use tracing::debug;

use crate::{HuginnError, Result};

/// Name of the archive member that holds the results.
pub const RESULT_ENTRY_NAME: &str = "output";

/// Find the first entry named `name` and pass its contents to `f`.
///
/// Returns `Ok(None)` if the archive ends without a matching entry.
/// Malformed gzip data, a malformed tar header, or a truncated archive
/// return [`HuginnError::Archive`].
pub fn with_entry<R, T, F>(reader: R, name: &str, f: F) -> Result<Option<T>>
where
    R: Read,
    F: FnOnce(&mut dyn Read) -> Result<T>,
{
    let mut archive = tar::Archive::new(MultiGzDecoder::new(reader));
    let entries = archive.entries().map_err(HuginnError::Archive)?;

    for entry in entries {
        let mut entry = entry.map_err(HuginnError::Archive)?;
        let matches = entry.path_bytes().as_ref() == name.as_bytes();
        if !matches {
            debug!(entry = %String::from_utf8_lossy(&entry.path_bytes()), "skipping archive entry");
            continue;
        }

        debug!(entry = name, size = entry.size(), "found result entry");
        return f(&mut entry).map(Some);
    }

    Ok(None)
}

/// Read the first entry named `name` fully into memory.
pub fn extract_entry<R: Read>(reader: R, name: &str) -> Result<Option<Vec<u8>>> {
    with_entry(reader, name, |entry| {
        let mut buf = Vec::new();
        entry.read_to_end(&mut buf).map_err(HuginnError::Archive)?;
        Ok(buf)
    })
}
