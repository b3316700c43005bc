//! Field normalization for imported movie rows.
//!
//! Every function here is total: it maps one raw cell to a typed value or to
//! the field's documented default. Nothing returns an error.
//!
//! Default semantics are fixed per field:
//!
//! | Field     | Invalid / missing                 |
//! |-----------|-----------------------------------|
//! | `title`   | `"Unknown"`                       |
//! | text      | `""`                              |
//! | `year`    | `None` (also outside 1900..=2025) |
//! | `rating`  | `0.0` (also outside 0..=10)       |
//! | `votes`   | `0`                               |
//! | `runtime` | `0`                               |
//! | `gross`   | `None`                            |
//!
//! Count-like fields fall back to zero while identity-like optional fields
//! (year, gross) fall back to absence.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::movie::{RawValue, UNKNOWN_TITLE};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Textual missing-value marker (exact, case-sensitive).
pub const MISSING_MARKER: &str = "NA";

/// Earliest accepted release year.
pub const MIN_YEAR: i32 = 1900;

/// Latest accepted release year.
pub const MAX_YEAR: i32 = 2025;

/// Highest accepted rating.
pub const MAX_RATING: f64 = 10.0;

/// Exclusive upper bound of a gross amount after rounding to cents, matching
/// the `NUMERIC(15, 2)` column (13 integer digits).
pub const GROSS_LIMIT: i64 = 10_000_000_000_000;

const MILLION: f64 = 1_000_000.0;
const THOUSAND: f64 = 1_000.0;

// ---------------------------------------------------------------------------
// Missing detection
// ---------------------------------------------------------------------------

/// A cell that carries a value.
enum Cell<'a> {
    Number(f64),
    Text(&'a str),
}

fn present(raw: &RawValue) -> Option<Cell<'_>> {
    match raw {
        RawValue::Missing => None,
        RawValue::Number(n) if n.is_nan() => None,
        RawValue::Number(n) => Some(Cell::Number(*n)),
        RawValue::Text(s) if s.is_empty() || s == MISSING_MARKER => None,
        RawValue::Text(s) => Some(Cell::Text(s)),
    }
}

/// Whether `raw` is one of the missing markers: absent, NaN, `""` or `"NA"`.
pub fn is_missing(raw: &RawValue) -> bool {
    present(raw).is_none()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_float(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

fn cell_to_float(cell: Cell<'_>) -> Option<f64> {
    match cell {
        Cell::Number(n) => Some(n),
        Cell::Text(s) => parse_float(s),
    }
}

/// Truncating float-to-int cast that rejects values `i32` cannot hold.
fn truncate_to_i32(value: f64) -> Option<i32> {
    let truncated = value.trunc();
    if truncated.is_finite()
        && truncated >= f64::from(i32::MIN)
        && truncated <= f64::from(i32::MAX)
    {
        Some(truncated as i32)
    } else {
        None
    }
}

fn cell_to_text(cell: Cell<'_>) -> String {
    match cell {
        Cell::Number(n) => n.to_string(),
        Cell::Text(s) => s.trim().to_string(),
    }
}

// ---------------------------------------------------------------------------
// Text fields
// ---------------------------------------------------------------------------

/// Normalize a title. Missing or blank titles become `"Unknown"`.
pub fn clean_title(raw: &RawValue) -> String {
    match present(raw).map(cell_to_text) {
        Some(title) if !title.is_empty() => title,
        _ => UNKNOWN_TITLE.to_string(),
    }
}

/// Normalize a free-text field (genre, one-line summary, stars).
/// Missing values become the empty string.
pub fn clean_text(raw: &RawValue) -> String {
    present(raw).map(cell_to_text).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Numeric fields
// ---------------------------------------------------------------------------

/// Normalize a gross amount into an exact 2-digit decimal.
///
/// Accepts plain numbers and currency text such as `"$1,234.5"`, `"$75.47M"`
/// or `"500K"`: a leading `$` and all `,` separators are dropped, then a
/// trailing `M` multiplies by one million and a trailing `K` by one thousand.
/// The product is rendered with two fraction digits before conversion so the
/// stored amount carries no binary-float noise.
///
/// Returns `None` for missing or unparseable input, and for amounts whose
/// rounded value reaches [`GROSS_LIMIT`].
pub fn clean_gross(raw: &RawValue) -> Option<Decimal> {
    let amount = match present(raw)? {
        Cell::Number(n) => n,
        Cell::Text(s) => parse_currency(s)?,
    };
    to_money(amount)
}

fn parse_currency(text: &str) -> Option<f64> {
    let text = text.trim();
    let text = text.strip_prefix('$').unwrap_or(text);
    let cleaned: String = text.chars().filter(|c| *c != ',').collect();

    let (number, multiplier) = if let Some(n) = cleaned.strip_suffix('M') {
        (n, MILLION)
    } else if let Some(n) = cleaned.strip_suffix('K') {
        (n, THOUSAND)
    } else {
        (cleaned.as_str(), 1.0)
    };

    parse_float(number).map(|value| value * multiplier)
}

fn to_money(amount: f64) -> Option<Decimal> {
    if !amount.is_finite() {
        return None;
    }
    let money = Decimal::from_str(&format!("{amount:.2}")).ok()?;
    (money.abs() < Decimal::from(GROSS_LIMIT)).then_some(money)
}

/// Normalize a release year via a float-then-int cast (`"2019.0"` -> 2019).
/// Years outside `MIN_YEAR..=MAX_YEAR` are treated as absent.
pub fn clean_year(raw: &RawValue) -> Option<i32> {
    present(raw)
        .and_then(cell_to_float)
        .and_then(truncate_to_i32)
        .filter(|year| (MIN_YEAR..=MAX_YEAR).contains(year))
}

/// Normalize a rating. Values outside `0.0..=10.0` (or unparseable) become `0.0`.
pub fn clean_rating(raw: &RawValue) -> f64 {
    present(raw)
        .and_then(cell_to_float)
        .filter(|rating| (0.0..=MAX_RATING).contains(rating))
        .unwrap_or(0.0)
}

/// Normalize a vote count.
///
/// Text has every non-digit character removed before parsing, so
/// `"1,000 votes"` yields 1000. Numeric cells are truncated. Anything that
/// leaves no digits, overflows, or is negative yields 0.
pub fn clean_votes(raw: &RawValue) -> i64 {
    match present(raw) {
        Some(Cell::Text(s)) => {
            let digits: String = s.chars().filter(char::is_ascii_digit).collect();
            digits.parse::<i64>().unwrap_or(0)
        }
        Some(Cell::Number(n)) if n.is_finite() && n >= 0.0 && n < i64::MAX as f64 => {
            n.trunc() as i64
        }
        _ => 0,
    }
}

/// Normalize a runtime in minutes via a float-then-int cast (`"90.5"` -> 90).
/// Negative or unparseable values yield 0.
pub fn clean_runtime(raw: &RawValue) -> i32 {
    present(raw)
        .and_then(cell_to_float)
        .and_then(truncate_to_i32)
        .filter(|minutes| *minutes >= 0)
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
