//! Movie catalog records.
//!
//! - [`RawValue`] / [`RawMovieRow`]: one uncleaned source row, as read from
//!   the import file.
//! - [`NewMovie`]: a normalized, validated record ready for insertion.
//! - [`Movie`]: a persisted catalog row.
//! - [`YearStats`]: one group of the per-year aggregate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::CoreError;
use crate::normalize;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Source columns
// ---------------------------------------------------------------------------

pub const COL_TITLE: &str = "MOVIES";
pub const COL_YEAR: &str = "YEAR";
pub const COL_GENRE: &str = "GENRE";
pub const COL_RATING: &str = "RATING";
pub const COL_ONE_LINE: &str = "ONE-LINE";
pub const COL_STARS: &str = "STARS";
pub const COL_VOTES: &str = "VOTES";
pub const COL_RUNTIME: &str = "RunTime";
pub const COL_GROSS: &str = "Gross";

/// Header names that every import file must contain (exact, case-sensitive).
pub const REQUIRED_COLUMNS: &[&str] = &[
    COL_TITLE,
    COL_YEAR,
    COL_GENRE,
    COL_RATING,
    COL_ONE_LINE,
    COL_STARS,
    COL_VOTES,
    COL_RUNTIME,
    COL_GROSS,
];

/// Title stored when the source has none.
pub const UNKNOWN_TITLE: &str = "Unknown";

// ---------------------------------------------------------------------------
// Raw input
// ---------------------------------------------------------------------------

/// One raw cell of unknown concrete representation.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// The cell is absent (null marker or column not present).
    Missing,
    /// A cell that was already numeric at the source.
    Number(f64),
    /// Any textual cell, including currency-formatted text.
    Text(String),
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Into::into)
    }
}

/// One uncleaned source row, keyed by the import file's columns.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMovieRow {
    /// `MOVIES`
    pub title: RawValue,
    /// `YEAR`
    pub year: RawValue,
    /// `GENRE`
    pub genre: RawValue,
    /// `RATING`
    pub rating: RawValue,
    /// `ONE-LINE`
    pub one_line: RawValue,
    /// `STARS`
    pub stars: RawValue,
    /// `VOTES`
    pub votes: RawValue,
    /// `RunTime`
    pub runtime: RawValue,
    /// `Gross`
    pub gross: RawValue,
}

impl Default for RawMovieRow {
    fn default() -> Self {
        Self {
            title: RawValue::Missing,
            year: RawValue::Missing,
            genre: RawValue::Missing,
            rating: RawValue::Missing,
            one_line: RawValue::Missing,
            stars: RawValue::Missing,
            votes: RawValue::Missing,
            runtime: RawValue::Missing,
            gross: RawValue::Missing,
        }
    }
}

// ---------------------------------------------------------------------------
// Normalized records
// ---------------------------------------------------------------------------

/// A cleaned movie record, ready for insertion into the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct NewMovie {
    #[validate(length(min = 1, max = 255), custom(function = "no_nul_bytes"))]
    pub title: String,
    #[validate(range(min = 1900, max = 2025))]
    pub year: Option<i32>,
    #[validate(length(max = 255), custom(function = "no_nul_bytes"))]
    pub genre: String,
    #[validate(range(min = 0.0, max = 10.0))]
    pub rating: f64,
    #[validate(custom(function = "no_nul_bytes"))]
    pub one_line: String,
    #[validate(custom(function = "no_nul_bytes"))]
    pub stars: String,
    #[validate(range(min = 0))]
    pub votes: i64,
    /// Minutes.
    #[validate(range(min = 0))]
    pub runtime: i32,
    pub gross: Option<Decimal>,
}

impl NewMovie {
    /// Normalize every field of `raw` and validate the result.
    ///
    /// Normalization itself never fails; an error here means the row cannot
    /// be stored (e.g. a title longer than the column allows).
    pub fn from_raw(raw: &RawMovieRow) -> Result<Self, CoreError> {
        let movie = Self {
            title: normalize::clean_title(&raw.title),
            year: normalize::clean_year(&raw.year),
            genre: normalize::clean_text(&raw.genre),
            rating: normalize::clean_rating(&raw.rating),
            one_line: normalize::clean_text(&raw.one_line),
            stars: normalize::clean_text(&raw.stars),
            votes: normalize::clean_votes(&raw.votes),
            runtime: normalize::clean_runtime(&raw.runtime),
            gross: normalize::clean_gross(&raw.gross),
        };
        movie
            .validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;
        Ok(movie)
    }
}

/// Text columns cannot hold NUL characters.
fn no_nul_bytes(value: &str) -> Result<(), ValidationError> {
    if value.contains('\0') {
        return Err(ValidationError::new("nul_byte"));
    }
    Ok(())
}

/// A movie row as persisted in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: DbId,
    pub title: String,
    pub year: Option<i32>,
    pub genre: String,
    pub rating: f64,
    pub one_line: String,
    pub stars: String,
    pub votes: i64,
    pub runtime: i32,
    pub gross: Option<Decimal>,
}

impl Movie {
    /// Attach a storage id to a new record.
    pub fn from_new(id: DbId, movie: NewMovie) -> Self {
        Self {
            id,
            title: movie.title,
            year: movie.year,
            genre: movie.genre,
            rating: movie.rating,
            one_line: movie.one_line,
            stars: movie.stars,
            votes: movie.votes,
            runtime: movie.runtime,
            gross: movie.gross,
        }
    }
}

/// Aggregate statistics for the movies of one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearStats {
    pub year: i32,
    pub total_movies: i64,
    pub average_rating: f64,
    /// `None` when no movie of that year has a gross value.
    pub average_gross: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn sample_row() -> RawMovieRow {
        RawMovieRow {
            title: "Blood Red Sky".into(),
            year: "2021".into(),
            genre: "\nAction, Horror, Thriller            ".into(),
            rating: "6.1".into(),
            one_line: "\nA woman with a mysterious illness is forced into action.".into(),
            stars: "Peri Baumeister, Carl Anton Koch".into(),
            votes: "21,062".into(),
            runtime: "121".into(),
            gross: "NA".into(),
        }
    }

    #[test]
    fn from_raw_normalizes_every_field() {
        let movie = NewMovie::from_raw(&sample_row()).unwrap();
        assert_eq!(movie.title, "Blood Red Sky");
        assert_eq!(movie.year, Some(2021));
        assert_eq!(movie.genre, "Action, Horror, Thriller");
        assert_eq!(movie.rating, 6.1);
        assert!(movie.one_line.starts_with("A woman"));
        assert_eq!(movie.votes, 21062);
        assert_eq!(movie.runtime, 121);
        assert_eq!(movie.gross, None);
    }

    #[test]
    fn from_raw_defaults_missing_row() {
        let movie = NewMovie::from_raw(&RawMovieRow::default()).unwrap();
        assert_eq!(movie.title, UNKNOWN_TITLE);
        assert_eq!(movie.year, None);
        assert_eq!(movie.genre, "");
        assert_eq!(movie.rating, 0.0);
        assert_eq!(movie.votes, 0);
        assert_eq!(movie.runtime, 0);
        assert_eq!(movie.gross, None);
    }

    #[test]
    fn overlong_title_fails_validation() {
        let row = RawMovieRow {
            title: "x".repeat(256).into(),
            ..sample_row()
        };
        assert_matches!(NewMovie::from_raw(&row), Err(CoreError::Validation(_)));
    }

    #[test]
    fn title_at_limit_is_accepted() {
        let row = RawMovieRow {
            title: "x".repeat(255).into(),
            ..sample_row()
        };
        assert!(NewMovie::from_raw(&row).is_ok());
    }

    #[test]
    fn overlong_genre_fails_validation() {
        let row = RawMovieRow {
            genre: "Drama, ".repeat(40).into(),
            ..sample_row()
        };
        assert_matches!(NewMovie::from_raw(&row), Err(CoreError::Validation(_)));
    }

    #[test]
    fn nul_character_in_text_fails_validation() {
        let title = RawMovieRow {
            title: "bad\u{0}title".into(),
            ..sample_row()
        };
        assert_matches!(NewMovie::from_raw(&title), Err(CoreError::Validation(_)));

        let stars = RawMovieRow {
            stars: "Star\u{0}".into(),
            ..sample_row()
        };
        assert_matches!(NewMovie::from_raw(&stars), Err(CoreError::Validation(_)));
    }

    #[test]
    fn raw_value_from_option() {
        assert_eq!(RawValue::from(None::<&str>), RawValue::Missing);
        assert_eq!(RawValue::from(Some("8.1")), RawValue::Text("8.1".into()));
        assert_eq!(RawValue::from(Some(2.5)), RawValue::Number(2.5));
    }

    #[test]
    fn movie_serializes_gross_as_decimal_string() {
        let movie = Movie::from_new(
            7,
            NewMovie {
                gross: Some(Decimal::new(150_000_000, 2)),
                ..NewMovie::from_raw(&sample_row()).unwrap()
            },
        );
        let json = serde_json::to_value(&movie).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["gross"], "1500000.00");
        assert_eq!(json["year"], 2021);
    }
}
