//! Lenient date parsing with a plausibility window.

use chrono::{DateTime, Datelike, NaiveDate};

/// Earliest accepted calendar year
pub const MIN_YEAR: i32 = 1900;
/// Latest accepted calendar year
pub const MAX_YEAR: i32 = 2100;

/// Two-digit years below this land in the 2000s, the rest in the 1900s
const CENTURY_PIVOT: i32 = 50;

const FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%B %d %Y"];

/// `MM/DD/YY`, with the two-digit year pivoted around `CENTURY_PIVOT`.
/// The outer `None` means `s` does not have that shape at all.
fn parse_short_us(s: &str) -> Option<Option<NaiveDate>> {
    let parts: Vec<&str> = s.split('/').collect();
    let [month, day, year] = parts.as_slice() else {
        return None;
    };
    let numeric = |p: &str, max_len: usize| {
        !p.is_empty() && p.len() <= max_len && p.chars().all(|c| c.is_ascii_digit())
    };
    if year.len() != 2 || !numeric(year, 2) || !numeric(month, 2) || !numeric(day, 2) {
        return None;
    }

    let (Ok(yy), Ok(month), Ok(day)) = (year.parse::<i32>(), month.parse(), day.parse()) else {
        return Some(None);
    };
    let year = if yy < CENTURY_PIVOT { 2000 + yy } else { 1900 + yy };
    Some(NaiveDate::from_ymd_opt(year, month, day))
}

/// Drop English ordinal suffixes and commas: "September 14th, 2008" -> "September 14 2008".
fn normalize_long_form(s: &str) -> String {
    s.replace(',', " ")
        .split_whitespace()
        .map(|word| {
            let lower = word.to_ascii_lowercase();
            for suffix in ["st", "nd", "rd", "th"] {
                if let Some(digits) = lower.strip_suffix(suffix) {
                    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
                        return digits.to_string();
                    }
                }
            }
            word.to_string()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a date as it appears in the book table. Returns `None` for anything
/// that is not a date; no year window is applied here.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    // bare year
    if s.len() == 4 && s.chars().all(|c| c.is_ascii_digit()) {
        return s.parse().ok().and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1));
    }

    if let Some(date) = parse_short_us(s) {
        return date;
    }

    let normalized = normalize_long_form(s);

    // "June 1997" -> first day of the month
    let words: Vec<&str> = normalized.split(' ').collect();
    let candidate = match words.as_slice() {
        [month, year] if year.chars().all(|c| c.is_ascii_digit()) => {
            format!("{} 1 {}", month, year)
        }
        _ => normalized,
    };

    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&candidate, fmt).ok())
}

/// Parse and keep the date only if its year lies in `MIN_YEAR..=MAX_YEAR`.
pub fn valid_date(raw: &str) -> Option<NaiveDate> {
    parse_date(raw).filter(|d| (MIN_YEAR..=MAX_YEAR).contains(&d.year()))
}

/// Whether `raw` denotes a plausible calendar date.
pub fn is_valid_date(raw: &str) -> bool {
    valid_date(raw).is_some()
}
