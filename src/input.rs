use crate::error::{Result, ResolverError};
use std::fs;
use std::path::Path;
use tracing::debug;
use uuid::Uuid;

/// Read the line-delimited identifier list. Lines are trimmed and blank
/// lines skipped; any remaining line that is not a UUID aborts the run.
/// Parsing through `Uuid` normalizes every accepted textual form to the
/// canonical lowercase hyphenated rendering used in request paths.
pub fn read_identifiers(path: &Path) -> Result<Vec<Uuid>> {
    let contents = fs::read_to_string(path)?;

    let mut ids = Vec::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let id = Uuid::parse_str(line).map_err(|e| {
            ResolverError::Config(format!("invalid identifier '{}': {}", line, e))
        })?;
        ids.push(id);
    }

    debug!("Read {} identifiers from {}", ids.len(), path.display());
    Ok(ids)
}
