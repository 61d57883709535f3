//! Pure field validators
//!
//! Each function answers whether a raw string is acceptable for its field.

use chrono::{Datelike, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

/// Oldest accepted age, in whole years
pub const MAX_AGE_YEARS: i32 = 120;

const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 50;
const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 2100;
const MIN_AREA_CODE: u32 = 11;
const MAX_AREA_CODE: u32 = 99;

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}\p{M} '\-]+$").expect("valid name regex"));
static BIRTH_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{2})/(\d{2})/(\d{4})$").expect("valid birth date regex"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Letters of any script, spaces, hyphens and apostrophes; 2-50 chars once trimmed
pub fn validate_name(value: &str) -> bool {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    (NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&len) && NAME_RE.is_match(trimmed)
}

/// DD/MM/YYYY, a real calendar date, not in the future, age at most 120
pub fn validate_birth_date(value: &str) -> bool {
    validate_birth_date_on(value, Local::now().date_naive())
}

/// Same as [`validate_birth_date`] against an explicit "today"
pub fn validate_birth_date_on(value: &str, today: NaiveDate) -> bool {
    let Some(date) = parse_birth_date(value) else {
        return false;
    };

    if date > today {
        return false;
    }

    age_in_years(date, today) <= MAX_AGE_YEARS
}

/// Parse a strict DD/MM/YYYY date within the accepted year range
pub(crate) fn parse_birth_date(value: &str) -> Option<NaiveDate> {
    let caps = BIRTH_DATE_RE.captures(value)?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;

    if !(1..=31).contains(&day) || !(1..=12).contains(&month) {
        return None;
    }
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return None;
    }

    // from_ymd_opt rejects dates that do not exist, e.g. 31/02
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Whole years between `birth` and `today`
pub(crate) fn age_in_years(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

/// Keep only the digits of a phone number
pub fn normalize_phone(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// 10 or 11 digits once punctuation is stripped, area code 11-99
pub fn validate_phone(value: &str) -> bool {
    let digits = normalize_phone(value);
    if digits.len() != 10 && digits.len() != 11 {
        return false;
    }

    digits[..2]
        .parse::<u32>()
        .map_or(false, |area| (MIN_AREA_CODE..=MAX_AREA_CODE).contains(&area))
}

/// `local@domain.tld` shaped, no whitespace
pub fn validate_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}
