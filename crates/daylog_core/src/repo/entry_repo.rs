//! Entry repository contract and CSV-file implementation.
//!
//! # Responsibility
//! - Provide the append-only record-store API over a flat delimited file.
//! - Keep delimited-encoding details inside the persistence boundary.
//!
//! # Invariants
//! - `append` is whole-table: read everything, concatenate one row, write
//!   everything back; a write either fully lands or leaves the prior file
//!   intact (temp file + rename).
//! - Rows are never schema-validated on write; ragged history is read back
//!   with missing cells as `None`.
//! - In-process appends are serialized by a mutex. Writers in other
//!   processes still race whole-table last-write-wins; nothing here
//!   coordinates across processes.

use crate::model::entry::{Entry, DATE_COLUMN};
use crate::model::schema::Schema;
use log::{info, warn};
use parking_lot::Mutex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error raised by record-store reads and appends.
#[derive(Debug)]
pub enum RepoError {
    Io {
        path: String,
        source: std::io::Error,
    },
    Malformed {
        path: String,
        line: usize,
        message: String,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "record store `{path}` is unreachable: {source}")
            }
            Self::Malformed {
                path,
                line,
                message,
            } => write!(f, "record store `{path}` line {line} is malformed: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Malformed { .. } => None,
        }
    }
}

/// The full table of committed entries in insertion order.
///
/// Cells are raw strings; `None` marks a cell absent from its row (schema
/// drift or hand-edited history). Columns are `Date` first, then one column
/// per question in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryTable {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl EntryTable {
    /// An empty table carrying a known column set.
    pub fn empty(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of `name` in the column set, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// All cells of one column in row order; `None` per missing cell.
    ///
    /// Returns `None` when the column itself does not exist.
    pub fn column_values(&self, name: &str) -> Option<Vec<Option<&str>>> {
        let index = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(index).and_then(|cell| cell.as_deref()))
                .collect(),
        )
    }

    /// Adds a column if absent, padding existing rows with empty cells.
    fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(index) = self.column_index(name) {
            return index;
        }
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.push(None);
        }
        self.columns.len() - 1
    }

    pub(crate) fn push_row(&mut self, mut cells: Vec<Option<String>>) {
        cells.resize(self.columns.len(), None);
        self.rows.push(cells);
    }
}

/// Append-only store of daily entries.
pub trait EntryRepository {
    /// Returns every committed entry in insertion order. A store whose
    /// backing resource does not exist yet reads as an empty table carrying
    /// the current schema's column set.
    fn read_all(&self) -> RepoResult<EntryTable>;

    /// Commits one entry: whole-table read, concatenate, write back.
    fn append(&self, entry: &Entry) -> RepoResult<()>;
}

/// Record store backed by a comma-delimited file at a fixed path.
///
/// The file is created on first append. Question headers may contain commas
/// and quotes, so fields use RFC-4180-style quoting. Concurrent appends
/// from other processes race last-write-wins on the whole file.
pub struct CsvEntryRepository {
    path: PathBuf,
    schema_columns: Vec<String>,
    append_lock: Mutex<()>,
}

impl CsvEntryRepository {
    /// Creates a store at `path` for the given active schema.
    ///
    /// The schema only supplies the column set reported while the backing
    /// file does not exist yet; it is never enforced on reads or writes.
    pub fn new(path: impl Into<PathBuf>, schema: &Schema) -> Self {
        let mut schema_columns = Vec::with_capacity(schema.question_count() + 1);
        schema_columns.push(DATE_COLUMN.to_string());
        schema_columns.extend(schema.questions().map(str::to_string));
        Self {
            path: path.into(),
            schema_columns,
            append_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn path_text(&self) -> String {
        self.path.display().to_string()
    }

    fn io_error(&self, source: std::io::Error) -> RepoError {
        RepoError::Io {
            path: self.path_text(),
            source,
        }
    }

    fn read_table(&self) -> RepoResult<EntryTable> {
        if !self.path.exists() {
            return Ok(EntryTable::empty(self.schema_columns.clone()));
        }

        let text = fs::read_to_string(&self.path).map_err(|err| self.io_error(err))?;
        let mut lines = text.lines().enumerate();

        let columns = match lines.next() {
            Some((_, header)) => parse_row(header).map_err(|message| RepoError::Malformed {
                path: self.path_text(),
                line: 1,
                message,
            })?,
            // Zero-byte file, e.g. interrupted external tooling.
            None => return Ok(EntryTable::empty(self.schema_columns.clone())),
        };

        let mut table = EntryTable::empty(columns);
        for (index, line) in lines {
            if line.is_empty() {
                continue;
            }
            let cells = parse_row(line).map_err(|message| RepoError::Malformed {
                path: self.path_text(),
                line: index + 1,
                message,
            })?;
            if cells.len() > table.columns.len() {
                warn!(
                    "event=store_read module=repo status=ragged path={} line={} cells={} columns={}",
                    self.path_text(),
                    index + 1,
                    cells.len(),
                    table.columns.len()
                );
            }
            let row = cells
                .into_iter()
                .take(table.columns.len())
                .map(|cell| if cell.is_empty() { None } else { Some(cell) })
                .collect();
            table.push_row(row);
        }

        Ok(table)
    }

    fn write_table(&self, table: &EntryTable) -> RepoResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
            }
        }

        let mut text = encode_row(table.columns.iter().map(|c| Some(c.as_str())));
        text.push('\n');
        for row in table.rows() {
            text.push_str(&encode_row(row.iter().map(|cell| cell.as_deref())));
            text.push('\n');
        }

        // Write-then-rename keeps the prior table intact if the write fails.
        let tmp_path = self.path.with_extension("csv.tmp");
        fs::write(&tmp_path, text).map_err(|err| self.io_error(err))?;
        fs::rename(&tmp_path, &self.path).map_err(|err| self.io_error(err))?;
        Ok(())
    }
}

impl EntryRepository for CsvEntryRepository {
    fn read_all(&self) -> RepoResult<EntryTable> {
        // Snapshot under the lock so a read never observes a half-renamed
        // in-process append.
        let _guard = self.append_lock.lock();
        self.read_table()
    }

    fn append(&self, entry: &Entry) -> RepoResult<()> {
        let started_at = Instant::now();
        let _guard = self.append_lock.lock();

        let result = (|| {
            let mut table = self.read_table()?;

            // Union the entry's fields with the file's header: new columns
            // go to the end and prior rows read back with empty cells.
            let mut row = vec![None; table.columns.len()];
            for (column, cell) in entry.columns().into_iter().zip(entry.cells()) {
                let index = table.ensure_column(&column);
                row.resize(table.columns.len(), None);
                row[index] = Some(cell);
            }
            table.push_row(row);

            self.write_table(&table)
        })();

        match &result {
            Ok(()) => info!(
                "event=store_append module=repo status=ok path={} date={} duration_ms={}",
                self.path_text(),
                entry.date(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=store_append module=repo status=error path={} duration_ms={} error={}",
                self.path_text(),
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }
}

fn encode_row<'a>(cells: impl Iterator<Item = Option<&'a str>>) -> String {
    let mut line = String::new();
    for (index, cell) in cells.enumerate() {
        if index > 0 {
            line.push(',');
        }
        if let Some(cell) = cell {
            line.push_str(&escape_field(cell));
        }
    }
    line
}

fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn parse_row(line: &str) -> Result<Vec<String>, String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    current.push('"');
                }
                '"' => in_quotes = false,
                other => current.push(other),
            }
        } else {
            match ch {
                '"' => in_quotes = true,
                ',' => cells.push(std::mem::take(&mut current)),
                other => current.push(other),
            }
        }
    }

    if in_quotes {
        return Err("unterminated quoted field".to_string());
    }
    cells.push(current);
    Ok(cells)
}
