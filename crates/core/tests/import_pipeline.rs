//! End-to-end import tests: CSV file -> loader -> in-memory catalog -> queries.

use std::io::{Cursor, Read, Write};
use std::sync::Arc;

use assert_matches::assert_matches;
use marquee_core::catalog::CatalogStore;
use marquee_core::error::ImportError;
use marquee_core::loader::BatchLoader;
use marquee_core::memory::InMemoryCatalog;
use marquee_core::queries::MovieQueries;
use rust_decimal::Decimal;
use tempfile::NamedTempFile;

const HEADER: &str = "MOVIES,YEAR,GENRE,RATING,ONE-LINE,STARS,VOTES,RunTime,Gross";

fn write_csv(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file.flush().unwrap();
    file
}

fn setup() -> (Arc<InMemoryCatalog>, BatchLoader, MovieQueries) {
    let store = Arc::new(InMemoryCatalog::new());
    let loader = BatchLoader::new(store.clone()).with_chunk_size(2);
    let queries = MovieQueries::new(store.clone());
    (store, loader, queries)
}

/// Serves `data`, then fails every further read.
struct FailingReader(Cursor<Vec<u8>>);

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self.0.read(buf)? {
            0 => Err(std::io::Error::other("disk read error")),
            n => Ok(n),
        }
    }
}

fn titles(movies: &[marquee_core::movie::Movie]) -> Vec<String> {
    movies.iter().map(|m| m.title.clone()).collect()
}

#[tokio::test]
async fn two_movie_catalog_answers_every_query() {
    let (_store, loader, queries) = setup();
    let file = write_csv(&[
        "A,2020,Drama,8.5,One line,Star A,\"1,000\",100,$1M",
        "B,2021,Drama,9.0,One line,Star B,\"2,000\",110,$2M",
    ]);

    let summary = loader.import_file(file.path()).await.unwrap();
    assert_eq!(summary.imported, 2);

    let by_gross = queries.top_by_gross(None).await.unwrap();
    assert_eq!(titles(&by_gross), vec!["B", "A"]);
    assert_eq!(by_gross[0].gross, Some(Decimal::new(200_000_000, 2)));

    assert_eq!(titles(&queries.top_by_votes().await.unwrap()), vec!["B", "A"]);
    assert_eq!(
        titles(&queries.top_by_rating(None, Some(1000)).await.unwrap()),
        vec!["B", "A"]
    );

    let stats = queries.year_stats(None, None, None).await.unwrap();
    let years: Vec<(i32, i64)> = stats.iter().map(|s| (s.year, s.total_movies)).collect();
    assert_eq!(years, vec![(2020, 1), (2021, 1)]);
}

#[tokio::test]
async fn malformed_rows_are_skipped_and_reported() {
    let (store, loader, _queries) = setup();
    let file = write_csv(&[
        "Good One,2019,Comedy,7.1,Line,Stars,500,95,NA",
        "Broken,2019",
        "Good Two,,Comedy,NA,Line,Stars,NA,NA,$0.5K",
        "Too,many,fields,1,2,3,4,5,6,7,8",
        "Good Three,2001,Drama,6.0,Line,Stars,10,80,",
    ]);

    let summary = loader.import_file(file.path()).await.unwrap();

    assert_eq!(summary.total_rows, 5);
    assert_eq!(summary.imported, 3);
    assert_eq!(summary.skipped, 2);
    let skipped: Vec<usize> = summary.skipped_rows.iter().map(|s| s.row).collect();
    assert_eq!(skipped, vec![2, 4]);
    assert_eq!(store.count().await.unwrap(), 3);

    let two = store
        .all()
        .unwrap()
        .into_iter()
        .find(|m| m.title == "Good Two")
        .unwrap();
    assert_eq!(two.year, None);
    assert_eq!(two.rating, 0.0);
    assert_eq!(two.votes, 0);
    assert_eq!(two.gross, Some(Decimal::new(50_000, 2)));
}

#[tokio::test]
async fn reimporting_the_same_file_is_idempotent() {
    let (store, loader, _queries) = setup();
    let file = write_csv(&[
        "A,2020,Drama,8.5,x,y,1000,100,$1M",
        "B,2021,Drama,9.0,x,y,2000,110,",
        "C,,Drama,NA,x,y,NA,NA,NA",
    ]);

    let snapshot = || {
        store
            .all()
            .unwrap()
            .into_iter()
            .map(|m| (m.title, m.year, m.gross))
            .collect::<Vec<_>>()
    };

    loader.import_file(file.path()).await.unwrap();
    let once = snapshot();

    let second = loader.import_file(file.path()).await.unwrap();
    let twice = snapshot();

    assert_eq!(second.deleted, 3);
    assert_eq!(once, twice);
}

#[tokio::test]
async fn missing_file_leaves_catalog_untouched() {
    let (store, loader, _queries) = setup();
    let file = write_csv(&["A,2020,Drama,8.5,x,y,1000,100,$1M"]);
    loader.import_file(file.path()).await.unwrap();

    let result = loader
        .import_file(std::path::Path::new("/definitely/not/here.csv"))
        .await;

    assert_matches!(result, Err(ImportError::Open { .. }));
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn missing_columns_leave_catalog_untouched() {
    let (store, loader, _queries) = setup();
    let file = write_csv(&["A,2020,Drama,8.5,x,y,1000,100,$1M"]);
    loader.import_file(file.path()).await.unwrap();

    let result = loader
        .import_reader("MOVIES,YEAR\nA,2020\n".as_bytes())
        .await;

    assert_matches!(result, Err(ImportError::MissingColumns(cols)) if cols.len() == 7);
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn read_failure_mid_file_leaves_catalog_untouched() {
    let (store, loader, _queries) = setup();
    let file = write_csv(&[
        "A,2020,Drama,8.5,x,y,1000,100,$1M",
        "B,2021,Drama,9.0,x,y,2000,110,$2M",
        "C,2022,Drama,7.0,x,y,3000,120,$3M",
    ]);
    loader.import_file(file.path()).await.unwrap();

    let truncated = format!("{HEADER}\nD,2023,Drama,6.0,x,y,10,90,NA\n");
    let result = loader
        .import_reader(FailingReader(Cursor::new(truncated.into_bytes())))
        .await;

    assert_matches!(result, Err(ImportError::Read(_)));
    assert_eq!(store.count().await.unwrap(), 3);
}
