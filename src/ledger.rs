//! Durable append-only ledger of simulation records.
//!
//! Records accumulate in an in-memory buffer and reach disk in batches:
//! a flush rewrites the whole file through a temp file and an atomic
//! rename, so a reader never observes a half-written ledger. All
//! operations share one coarse lock; append may be called from the tick
//! driver while flush runs from another thread.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Local;
use tracing::warn;

use crate::error::LedgerError;
use crate::sim::record::SimulationRecord;

/// Column header of the ledger file.
pub const LEDGER_HEADER: &str = "Date/Time,Tick,Production,Consumption,Balance";

/// Suffix of the transient temp file used during flush.
const TEMP_SUFFIX: &str = ".tmp";

/// Wall-clock format of the first column.
const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Append-only log of [`SimulationRecord`]s backed by a CSV file.
///
/// Construction does not touch the disk; call
/// [`load_from_file`](Self::load_from_file) to pick up records persisted
/// by an earlier run. A failed flush keeps every buffered record for the
/// next attempt.
pub struct Ledger {
    buffer: Mutex<Vec<SimulationRecord>>,
    path: PathBuf,
    temp_path: PathBuf,
}

impl Ledger {
    /// Creates a ledger writing to `path`. The temp file lives next to
    /// it under the same name plus `.tmp`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut temp = path.clone().into_os_string();
        temp.push(TEMP_SUFFIX);
        Self {
            buffer: Mutex::new(Vec::new()),
            path,
            temp_path: PathBuf::from(temp),
        }
    }

    /// Path of the main ledger file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Adds a record to the in-memory buffer. No disk I/O.
    pub fn append(&self, record: SimulationRecord) {
        self.lock().push(record);
    }

    /// Number of buffered (unflushed) records.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when no records are buffered.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Immutable copy of the buffered records.
    pub fn snapshot(&self) -> Vec<SimulationRecord> {
        self.lock().clone()
    }

    /// Writes all buffered records to disk and clears the buffer.
    ///
    /// Existing file content is preserved: the flush reads the current
    /// lines, rewrites them plus the new batch to the temp file, and
    /// atomically renames it over the main file. The buffer is cleared
    /// only after the rename succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] on any I/O failure. The buffer is left
    /// untouched so the records can be retried, and the temp file is
    /// removed best-effort.
    pub fn flush(&self) -> Result<usize, LedgerError> {
        let mut buffer = self.lock();
        if buffer.is_empty() {
            return Ok(0);
        }
        match self.write_batch(&buffer) {
            Ok(()) => {
                let flushed = buffer.len();
                buffer.clear();
                Ok(flushed)
            }
            Err(err) => {
                let _ = fs::remove_file(&self.temp_path);
                warn!(
                    buffered = buffer.len(),
                    %err,
                    "ledger flush failed; buffered records retained"
                );
                Err(LedgerError::io("flush", &self.path, err))
            }
        }
    }

    fn write_batch(&self, records: &[SimulationRecord]) -> io::Result<()> {
        let existing = match fs::read_to_string(&self.path) {
            Ok(content) => content.lines().map(str::to_owned).collect(),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(err),
        };

        let file = File::create(&self.temp_path)?;
        let mut writer = BufWriter::new(file);

        if existing.is_empty() {
            writeln!(writer, "{LEDGER_HEADER}")?;
        } else {
            for line in &existing {
                writeln!(writer, "{line}")?;
            }
        }

        let stamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        for record in records {
            writeln!(
                writer,
                "{stamp},{},{:.2},{:.2},{:.2}",
                record.tick(),
                record.production(),
                record.consumption(),
                record.balance()
            )?;
        }

        writer.flush()?;
        drop(writer);
        fs::rename(&self.temp_path, &self.path)
    }

    /// Replaces the buffer with the records parsed from the ledger file.
    ///
    /// Malformed lines (short rows, non-numeric or negative fields) are
    /// logged and skipped; a missing file is a no-op. Returns the number
    /// of records loaded.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] only when the file exists but cannot be
    /// opened or read at all.
    pub fn load_from_file(&self) -> Result<usize, LedgerError> {
        let mut buffer = self.lock();
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(err) => return Err(LedgerError::io("load", &self.path, err)),
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(BufReader::new(file));

        let mut loaded = Vec::new();
        for row in reader.records() {
            let row = match row {
                Ok(row) => row,
                Err(err) => {
                    warn!(%err, "skipping unreadable ledger line");
                    continue;
                }
            };
            match parse_row(&row) {
                Some(record) => loaded.push(record),
                None => {
                    let line = row.position().map(|p| p.line()).unwrap_or_default();
                    warn!(line, "skipping malformed ledger line");
                }
            }
        }

        *buffer = loaded;
        Ok(buffer.len())
    }

    /// Empties the buffer and rewrites the file to header-only, using
    /// the same temp-and-rename protocol as [`flush`](Self::flush).
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the rewrite fails; the buffer is
    /// cleared regardless.
    pub fn clear(&self) -> Result<(), LedgerError> {
        let mut buffer = self.lock();
        buffer.clear();
        self.write_header_only().map_err(|err| {
            let _ = fs::remove_file(&self.temp_path);
            warn!(%err, "ledger clear failed to rewrite the file");
            LedgerError::io("clear", &self.path, err)
        })
    }

    fn write_header_only(&self) -> io::Result<()> {
        let file = File::create(&self.temp_path)?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{LEDGER_HEADER}")?;
        writer.flush()?;
        drop(writer);
        fs::rename(&self.temp_path, &self.path)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<SimulationRecord>> {
        // A poisoning panic cannot leave the Vec half-updated; recover
        // the guard rather than propagating the poison.
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Parses one data row: `timestamp,tick,production,consumption,balance`.
/// Returns `None` for short rows, non-numeric fields, or values the
/// record validation rejects.
fn parse_row(row: &csv::StringRecord) -> Option<SimulationRecord> {
    if row.len() < 5 {
        return None;
    }
    let tick: u64 = row.get(1)?.trim().parse().ok()?;
    let production: f64 = row.get(2)?.trim().parse().ok()?;
    let consumption: f64 = row.get(3)?.trim().parse().ok()?;
    SimulationRecord::new(tick, consumption, production).ok()
}
