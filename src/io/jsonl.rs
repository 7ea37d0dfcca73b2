//! Newline-delimited JSON record files.
//!
//! Writers go through a `LineWriter`, so every completed record reaches the
//! file immediately and an interrupted run leaves only whole lines behind.

use std::fs::File;
use std::io::{self, BufRead, BufReader, LineWriter, Write};
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::domain::Record;
use crate::error::AppError;

/// A line that could not be read as a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineError {
    /// 1-based line number.
    pub line: usize,
    pub message: String,
}

/// Records loaded from a labeled file plus what had to be skipped.
#[derive(Debug, Clone)]
pub struct LoadedRecords {
    pub records: Vec<Record>,
    pub skipped: Vec<LineError>,
    pub lines_read: usize,
}

/// Count lines in a file (used for progress percentages).
///
/// Lines are counted as raw bytes, so undecodable content does not stop the count.
pub fn count_lines(path: &Path) -> Result<usize, AppError> {
    let mut count = 0usize;
    for line in open_lines(path)? {
        line.map_err(|e| read_error(path, e))?;
        count += 1;
    }
    Ok(count)
}

/// Open a file for line-by-line reading as raw bytes.
pub fn open_lines(path: &Path) -> Result<RawLines, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open '{}': {e}", path.display())))?;
    Ok(RawLines {
        reader: BufReader::new(file),
    })
}

/// Iterator over the lines of a file without UTF-8 validation.
///
/// The `\n` (or `\r\n`) terminator is stripped. Only I/O failures are errors;
/// decoding is left to the caller.
pub struct RawLines {
    reader: BufReader<File>,
}

impl Iterator for RawLines {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut buf = Vec::new();
        match self.reader.read_until(b'\n', &mut buf) {
            Ok(0) => None,
            Ok(_) => {
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                    if buf.last() == Some(&b'\r') {
                        buf.pop();
                    }
                }
                Some(Ok(buf))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// Load every JSON-object line. Blank lines are ignored; anything else that
/// does not decode or parse is skipped and reported.
pub fn read_records(path: &Path) -> Result<LoadedRecords, AppError> {
    let mut records = Vec::new();
    let mut skipped = Vec::new();
    let mut lines_read = 0usize;

    for (idx, line) in open_lines(path)?.enumerate() {
        let bytes = line.map_err(|e| read_error(path, e))?;
        lines_read += 1;

        let parsed = match std::str::from_utf8(&bytes) {
            Ok(text) if text.trim().is_empty() => continue,
            Ok(text) => Record::from_json_line(text).map_err(|e| e.to_string()),
            Err(e) => Err(format!("invalid UTF-8: {e}")),
        };
        match parsed {
            Ok(record) => records.push(record),
            Err(message) => {
                warn!(line = idx + 1, error = %message, "skipping unreadable record");
                skipped.push(LineError {
                    line: idx + 1,
                    message,
                });
            }
        }
    }

    Ok(LoadedRecords {
        records,
        skipped,
        lines_read,
    })
}

/// Write all records to `path`, one per line.
pub fn write_records(path: &Path, records: &[Record]) -> Result<(), AppError> {
    let mut writer = JsonlWriter::create(path)?;
    for record in records {
        writer.write_record(record)?;
    }
    writer.finish()
}

/// Line-at-a-time NDJSON writer.
pub struct JsonlWriter {
    inner: LineWriter<File>,
    path: PathBuf,
}

impl JsonlWriter {
    pub fn create(path: &Path) -> Result<Self, AppError> {
        let file = File::create(path)
            .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", path.display())))?;
        Ok(Self {
            inner: LineWriter::new(file),
            path: path.to_path_buf(),
        })
    }

    pub fn write_record(&mut self, record: &Record) -> Result<(), AppError> {
        let line = record
            .to_json_line()
            .map_err(|e| AppError::new(2, format!("Failed to serialize record: {e}")))?;
        self.write_raw(line.as_bytes())
    }

    /// Write a line exactly as given, byte for byte (a trailing newline is added).
    pub fn write_raw(&mut self, line: &[u8]) -> Result<(), AppError> {
        self.inner
            .write_all(line)
            .and_then(|()| self.inner.write_all(b"\n"))
            .map_err(|e| {
                AppError::new(2, format!("Failed to write '{}': {e}", self.path.display()))
            })
    }

    pub fn finish(mut self) -> Result<(), AppError> {
        self.inner.flush().map_err(|e| {
            AppError::new(2, format!("Failed to flush '{}': {e}", self.path.display()))
        })
    }
}

fn read_error(path: &Path, e: std::io::Error) -> AppError {
    AppError::new(2, format!("Failed to read '{}': {e}", path.display()))
}
