//! Movie rows and the per-year aggregate row.

use marquee_core::movie::{Movie, YearStats};
use marquee_core::types::DbId;
use rust_decimal::Decimal;
use sqlx::FromRow;

/// A row from the `movies` table.
#[derive(Debug, Clone, FromRow)]
pub struct MovieRow {
    pub id: DbId,
    pub title: String,
    pub year: Option<i32>,
    pub genre: String,
    pub rating: f64,
    pub one_line: String,
    pub stars: String,
    pub votes: i64,
    pub runtime: i32,
    /// `NUMERIC(15, 2)`, NULL when the source had no gross.
    pub gross: Option<Decimal>,
}

impl From<MovieRow> for Movie {
    fn from(row: MovieRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            year: row.year,
            genre: row.genre,
            rating: row.rating,
            one_line: row.one_line,
            stars: row.stars,
            votes: row.votes,
            runtime: row.runtime,
            gross: row.gross,
        }
    }
}

/// One `GROUP BY year` result row. Averages are unrounded.
#[derive(Debug, Clone, FromRow)]
pub struct YearStatsRow {
    pub year: i32,
    pub total_movies: i64,
    pub average_rating: f64,
    pub average_gross: Option<Decimal>,
}

impl From<YearStatsRow> for YearStats {
    fn from(row: YearStatsRow) -> Self {
        Self {
            year: row.year,
            total_movies: row.total_movies,
            average_rating: row.average_rating,
            average_gross: row.average_gross,
        }
    }
}
