//! Constrained "dd mm yyyy" date input.
//!
//! # Responsibility
//! - Re-format free-form numeric keystrokes into the canonical display form.
//! - Parse a completed display string into a validated instant.
//!
//! # Invariants
//! - `format_keystrokes` is pure and idempotent on canonical input.
//! - Parsed dates are anchored at 12:00 UTC so a calendar day never flips
//!   across a timezone boundary.

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

// ASCII class, not `\D`: the regex crate's `\d` covers all Unicode decimal
// digits, which the byte-indexed slicing below cannot handle.
static NON_DIGIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^0-9]").expect("valid non-digit regex"));

/// Placeholder / error-message pattern shown to the user.
pub const DISPLAY_PATTERN: &str = "dd mm yyyy";

/// Day, month and year digits: 2 + 2 + 4.
const MAX_DIGITS: usize = 8;
/// Earliest year the form accepts.
const MIN_YEAR: i32 = 2024;

/// Canonicalizes the raw field content after a keystroke.
///
/// Strips every non-digit, keeps at most 8 digits, and re-inserts single
/// spaces after the day and month groups. The result (at most 10 characters)
/// becomes the new field content.
pub fn format_keystrokes(raw: &str) -> String {
    let stripped = NON_DIGIT_RE.replace_all(raw, "");
    let digits: String = stripped.chars().take(MAX_DIGITS).collect();

    match digits.len() {
        0..=2 => digits,
        3..=4 => format!("{} {}", &digits[..2], &digits[2..]),
        _ => format!("{} {} {}", &digits[..2], &digits[2..4], &digits[4..]),
    }
}

/// Parses a completed "dd mm yyyy" display string.
///
/// Returns `None` unless the input splits into exactly three integer tokens
/// with day in 1..=31, month in 1..=12 and year >= 2024 that name a real
/// calendar date (30 02 and 31 04 are rejected, 29 02 only in leap years).
/// The returned instant sits at noon UTC of that date.
pub fn parse_display(display: &str) -> Option<DateTime<Utc>> {
    let tokens: Vec<&str> = display.split_whitespace().collect();
    if tokens.len() != 3 {
        return None;
    }

    let day: u32 = tokens[0].parse().ok()?;
    let month: u32 = tokens[1].parse().ok()?;
    let year: i32 = tokens[2].parse().ok()?;

    if !(1..=31).contains(&day) || !(1..=12).contains(&month) || year < MIN_YEAR {
        return None;
    }

    // from_ymd_opt rejects range-valid combinations that do not exist on
    // the calendar.
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(date.and_hms_opt(12, 0, 0)?.and_utc())
}
