//! JSONL record loader.
//!
//! Reads one JSON object per non-empty line. Lines that are not valid UTF-8,
//! not valid JSON, or not a JSON object are skipped and only counted.

use std::io::{BufRead, BufReader};
use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::PipelineError;

/// A parsed JSON object from one line of the source.
pub type RawRecord = Map<String, Value>;

/// Records loaded from a source, in file order.
#[derive(Debug, Clone, Default)]
pub struct LoadedRecords {
    pub records: Vec<RawRecord>,
    /// Non-empty lines that could not be turned into a record.
    pub skipped_lines: usize,
}

/// Parse a single trimmed line. Returns `None` for anything that is not a
/// JSON object.
fn parse_line(line: &str) -> Option<RawRecord> {
    match serde_json::from_str::<Value>(line) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Parse JSONL text into records (useful for testing).
pub fn parse_records_str(content: &str) -> LoadedRecords {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut loaded = LoadedRecords::default();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_line(line) {
            Some(record) => loaded.records.push(record),
            None => loaded.skipped_lines += 1,
        }
    }
    loaded
}

/// Load records from a JSONL file.
///
/// Fails if the file is missing or unreadable, or if no line yields a record.
pub fn load_records(path: &Path) -> Result<LoadedRecords, PipelineError> {
    if !path.exists() {
        return Err(PipelineError::SourceNotFound(path.to_path_buf()));
    }

    let file = std::fs::File::open(path).map_err(|source| PipelineError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let mut loaded = LoadedRecords::default();
    for (index, chunk) in reader.split(b'\n').enumerate() {
        let bytes = chunk.map_err(|source| PipelineError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let bytes = match (index, bytes.strip_prefix(b"\xef\xbb\xbf")) {
            (0, Some(rest)) => rest,
            _ => &bytes[..],
        };
        let Ok(line) = std::str::from_utf8(bytes) else {
            loaded.skipped_lines += 1;
            continue;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_line(line) {
            Some(record) => loaded.records.push(record),
            None => {
                debug!("skipping malformed line {} in {}", index + 1, path.display());
                loaded.skipped_lines += 1;
            }
        }
    }

    if loaded.records.is_empty() {
        return Err(PipelineError::NoRecords(path.to_path_buf()));
    }
    if loaded.skipped_lines > 0 {
        warn!(
            "skipped {} malformed line(s) in {}",
            loaded.skipped_lines,
            path.display()
        );
    }
    debug!(
        "loaded {} record(s) from {}",
        loaded.records.len(),
        path.display()
    );

    Ok(loaded)
}
