//! CSV output for one search job
//!
//! The header row is written when the sink is created. After that the sink
//! only appends, one row per message in the order received.

use crate::domain::context::ResultExt;
use crate::domain::{ExportError, MessageRecord, Result, CSV_HEADER};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only CSV writer
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    rows: u64,
    path: Option<PathBuf>,
}

impl CsvSink<File> {
    /// Creates (or truncates) the file at `path` and writes the header
    ///
    /// Missing parent directories are created.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;

        let mut sink = Self::from_writer(file)?;
        sink.path = Some(path.to_path_buf());
        Ok(sink)
    }
}

impl<W: Write> CsvSink<W> {
    /// Wraps `writer` and writes the header row
    pub fn from_writer(writer: W) -> Result<Self> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(CSV_HEADER)?;
        Ok(Self {
            writer,
            rows: 0,
            path: None,
        })
    }

    /// Appends one row per record
    pub fn append_page(&mut self, page: &[MessageRecord]) -> Result<()> {
        for record in page {
            self.writer.write_record(record.csv_row())?;
        }
        self.rows += page.len() as u64;
        Ok(())
    }

    /// Data rows written so far (header excluded)
    pub fn rows_written(&self) -> u64 {
        self.rows
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Flushes buffered rows and hands back the underlying writer
    pub fn finish(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| ExportError::Io(format!("Failed to flush CSV output: {}", e.error())))
    }
}
