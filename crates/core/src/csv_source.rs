//! CSV input for the batch loader.
//!
//! Resolves the required columns from the header row once, then yields one
//! [`RawMovieRow`] per data record. Every cell is handed to the normalizer as
//! text. A record that the CSV reader rejects (wrong field count, invalid
//! UTF-8) comes back as an inner `Err` carrying the reason so the loader can
//! skip it. A failure of the underlying reader ends the input and is fatal.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::error::ImportError;
use crate::movie::{
    RawMovieRow, RawValue, COL_GENRE, COL_GROSS, COL_ONE_LINE, COL_RATING, COL_RUNTIME,
    COL_STARS, COL_TITLE, COL_VOTES, COL_YEAR, REQUIRED_COLUMNS,
};

const UTF8_BOM: char = '\u{feff}';

/// One data record: the extracted row, or the reason it was rejected.
pub type RowResult = Result<RawMovieRow, String>;

/// Position of each required column in a record.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    title: usize,
    year: usize,
    genre: usize,
    rating: usize,
    one_line: usize,
    stars: usize,
    votes: usize,
    runtime: usize,
    gross: usize,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord) -> Result<Self, ImportError> {
        let map: HashMap<&str, usize> = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.trim_start_matches(UTF8_BOM).trim(), idx))
            .collect();

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|col| !map.contains_key(*col))
            .map(|col| col.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ImportError::MissingColumns(missing));
        }

        let at = |col: &str| map[col];
        Ok(Self {
            title: at(COL_TITLE),
            year: at(COL_YEAR),
            genre: at(COL_GENRE),
            rating: at(COL_RATING),
            one_line: at(COL_ONE_LINE),
            stars: at(COL_STARS),
            votes: at(COL_VOTES),
            runtime: at(COL_RUNTIME),
            gross: at(COL_GROSS),
        })
    }

    fn extract(&self, record: &StringRecord) -> RawMovieRow {
        let cell = |idx: usize| RawValue::from(record.get(idx));
        RawMovieRow {
            title: cell(self.title),
            year: cell(self.year),
            genre: cell(self.genre),
            rating: cell(self.rating),
            one_line: cell(self.one_line),
            stars: cell(self.stars),
            votes: cell(self.votes),
            runtime: cell(self.runtime),
            gross: cell(self.gross),
        }
    }
}

/// A CSV movie source with a validated header.
#[derive(Debug)]
pub struct CsvSource<R> {
    reader: csv::Reader<R>,
    columns: ColumnIndex,
}

impl CsvSource<File> {
    /// Open `path` and validate its header row.
    pub fn open(path: &Path) -> Result<Self, ImportError> {
        let file = File::open(path).map_err(|source| ImportError::Open {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(file)
    }
}

impl<R: Read> CsvSource<R> {
    /// Wrap any reader and validate its header row.
    pub fn from_reader(rdr: R) -> Result<Self, ImportError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(rdr);
        let headers = reader.headers().map_err(ImportError::Header)?.clone();
        let columns = ColumnIndex::resolve(&headers)?;
        Ok(Self { reader, columns })
    }

    /// Iterate over the data records in file order.
    ///
    /// The outer `Err` means the input could not be read past this point;
    /// the csv reader stops after it, so it is always the last item.
    pub fn rows(&mut self) -> impl Iterator<Item = Result<RowResult, ImportError>> + '_ {
        let columns = self.columns;
        self.reader.records().map(move |result| match result {
            Ok(record) => Ok(Ok(columns.extract(&record))),
            Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => Err(ImportError::Read(e)),
            Err(e) => Ok(Err(format!("Malformed CSV record: {e}"))),
        })
    }
}
