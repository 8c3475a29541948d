//! # Storage Module
//!
//! Appends fused records to the durable output log.
//!
//! The log is a plain text file: a fixed two-line descriptive header written
//! exactly once, followed by one line per record. Each batch goes out in a
//! single write call and is forced to durable storage before the call
//! returns, so a crash mid-batch cannot corrupt previously committed lines.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Result, SolarLogError};
use crate::record::FusedRecord;

/// First header line: provenance of the recorded data
const HEADER_DESCRIPTION: &str = "Solar irradiance and temperature records pushed by the remote \
sensor node over the wireless link, fused with the GPS position and magnetic heading sampled on \
the vehicle for photovoltaic integration analysis";

/// Second header line: column legend
const HEADER_COLUMNS: &str =
    "Date Time Latitude[deg] Longitude[deg] Heading[deg] Cardinal Irradiance[W/m2] \
Temperature[degC] TempDeviation[degC]";

/// Append-only writer for the output log
pub struct RecordWriter {
    path: PathBuf,
}

impl RecordWriter {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the two-line header if the log file does not yet exist
    ///
    /// Idempotent across repeated invocations and process restarts against
    /// the same path.
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the file cannot be created or written
    pub fn ensure_header(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }

        self.write_header()
            .map_err(|e| SolarLogError::Persistence(format!("{}: {}", self.path.display(), e)))?;

        info!("Created output log at {}", self.path.display());
        Ok(())
    }

    /// Append one batch of records to the log
    ///
    /// All lines of the batch go out in a single write call, and the data is
    /// synced to durable storage before returning.
    ///
    /// # Errors
    ///
    /// Returns `Persistence` on any write or sync failure; the caller treats
    /// this as fatal rather than silently losing buffered data
    pub fn append_records(&self, records: &[FusedRecord]) -> Result<()> {
        self.write_batch(records)
            .map_err(|e| SolarLogError::Persistence(format!("{}: {}", self.path.display(), e)))?;

        debug!(
            "Appended {} record(s) to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }

    fn write_header(&self) -> io::Result<()> {
        let mut file = File::create(&self.path)?;
        writeln!(file, "{}", HEADER_DESCRIPTION)?;
        writeln!(file, "{}", HEADER_COLUMNS)?;
        file.sync_all()
    }

    fn write_batch(&self, records: &[FusedRecord]) -> io::Result<()> {
        let mut batch = String::new();
        for record in records {
            batch.push_str(&record.format_line());
            batch.push('\n');
        }

        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        file.write_all(batch.as_bytes())?;
        file.sync_data()
    }
}
