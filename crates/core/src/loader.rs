//! Batch loader: raw rows in, one wholesale catalog replacement out.
//!
//! Rows are normalized independently. A row that cannot be turned into a
//! [`NewMovie`] is skipped and reported in the [`ImportSummary`]; it never
//! aborts the run. Only input-source failures and store failures are fatal,
//! and an input failure mid-file is detected before the catalog is touched.

use std::io::Read;
use std::path::Path;

use chrono::Utc;
use serde::Serialize;

use crate::catalog::SharedCatalog;
use crate::csv_source::{CsvSource, RowResult};
use crate::error::ImportError;
use crate::movie::{NewMovie, RawMovieRow};
use crate::types::Timestamp;

// ── Constants ────────────────────────────────────────────────────────

/// Rows inserted per statement when the caller does not choose.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

// ── Types ────────────────────────────────────────────────────────────

/// A data row that was left out of the import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    /// 1-based data row number (the header row is not counted).
    pub row: usize,
    pub reason: String,
}

/// Outcome of one import run.
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    /// Data rows seen, skipped ones included.
    pub total_rows: usize,
    pub imported: usize,
    pub skipped: usize,
    pub skipped_rows: Vec<SkippedRow>,
    /// Records removed from the catalog before inserting.
    pub deleted: u64,
    pub finished_at: Timestamp,
}

/// Normalized rows awaiting commit.
#[derive(Debug, Default)]
pub struct PreparedBatch {
    pub movies: Vec<NewMovie>,
    pub skipped: Vec<SkippedRow>,
    pub total_rows: usize,
}

impl PreparedBatch {
    /// Normalize the next data row, or record why it was skipped.
    fn push(&mut self, result: RowResult) {
        self.total_rows += 1;
        let row = self.total_rows;

        let outcome =
            result.and_then(|raw| NewMovie::from_raw(&raw).map_err(|e| e.to_string()));
        match outcome {
            Ok(movie) => self.movies.push(movie),
            Err(reason) => {
                tracing::warn!(row, %reason, "Skipping movie row");
                self.skipped.push(SkippedRow { row, reason });
            }
        }
    }
}

/// Normalize every row, collecting failures instead of stopping on them.
pub fn prepare<I>(rows: I) -> PreparedBatch
where
    I: IntoIterator<Item = RowResult>,
{
    let mut batch = PreparedBatch::default();
    for result in rows {
        batch.push(result);
    }
    batch
}

/// Like [`prepare`], but stops at the first input failure.
pub fn try_prepare<I>(rows: I) -> Result<PreparedBatch, ImportError>
where
    I: IntoIterator<Item = Result<RowResult, ImportError>>,
{
    let mut batch = PreparedBatch::default();
    for result in rows {
        batch.push(result?);
    }
    Ok(batch)
}

// ── Loader ───────────────────────────────────────────────────────────

pub struct BatchLoader {
    store: SharedCatalog,
    chunk_size: usize,
}

impl BatchLoader {
    pub fn new(store: SharedCatalog) -> Self {
        Self {
            store,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Override the insert chunk size. Zero is treated as one.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Import a CSV file. Fails before touching the catalog if the file
    /// cannot be opened, lacks required columns or fails while being read.
    pub async fn import_file(&self, path: &Path) -> Result<ImportSummary, ImportError> {
        tracing::info!(path = %path.display(), "Importing movies");
        let mut source = CsvSource::open(path)?;
        let batch = try_prepare(source.rows())?;
        self.commit(batch).await
    }

    /// Import CSV data from any reader.
    pub async fn import_reader<R: Read>(&self, reader: R) -> Result<ImportSummary, ImportError> {
        let mut source = CsvSource::from_reader(reader)?;
        let batch = try_prepare(source.rows())?;
        self.commit(batch).await
    }

    /// Import already-parsed raw rows.
    pub async fn import_rows<I>(&self, rows: I) -> Result<ImportSummary, ImportError>
    where
        I: IntoIterator<Item = RawMovieRow>,
    {
        let batch = prepare(rows.into_iter().map(Ok));
        self.commit(batch).await
    }

    /// Replace the catalog with a prepared batch.
    pub async fn commit(&self, batch: PreparedBatch) -> Result<ImportSummary, ImportError> {
        if batch.movies.is_empty() {
            tracing::warn!(
                total_rows = batch.total_rows,
                "No movies were imported; the catalog will be emptied"
            );
        }

        let outcome = self
            .store
            .replace_all(&batch.movies, self.chunk_size)
            .await?;

        let summary = ImportSummary {
            total_rows: batch.total_rows,
            imported: batch.movies.len(),
            skipped: batch.skipped.len(),
            skipped_rows: batch.skipped,
            deleted: outcome.deleted,
            finished_at: Utc::now(),
        };

        tracing::info!(
            total_rows = summary.total_rows,
            imported = summary.imported,
            skipped = summary.skipped,
            deleted = summary.deleted,
            "Movie import finished"
        );

        Ok(summary)
    }
}
