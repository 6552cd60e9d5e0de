use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;

use crate::error::{Result, TallyError};

// ---------------------------------------------------------------------------
// Cell policies
// ---------------------------------------------------------------------------

/// What to do with a cell that does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellPolicy {
    /// Treat the row as non-matching and carry on.
    Skip,
    /// Abort the whole operation.
    Reject,
}

/// A date cell that does not parse puts its row outside every range.
pub const DATE_CELLS: CellPolicy = CellPolicy::Skip;

/// One bad amount cell inside the range fails the whole sum.
pub const AMOUNT_CELLS: CellPolicy = CellPolicy::Reject;

const DATE_SEPARATORS: [char; 3] = ['/', '-', '.'];

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

/// Parse a day-first date: `31/12/2024`, `31-12-2024`, `31.12.24`, or ISO
/// `2024-12-31`. A trailing time of day is accepted and dropped.
pub fn parse_date_dmy(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let (date_part, time_part) = match raw.split_once([' ', 'T']) {
        Some((d, t)) => (d, Some(t.trim())),
        None => (raw, None),
    };
    if let Some(t) = time_part {
        if !is_time_of_day(t) {
            return None;
        }
    }

    let sep = date_part.chars().find(|c| DATE_SEPARATORS.contains(c))?;
    let parts: Vec<&str> = date_part.split(sep).collect();
    if parts.len() != 3
        || parts
            .iter()
            .any(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_digit()))
    {
        return None;
    }

    let (d, m, y) = if parts[0].len() == 4 {
        (parts[2], parts[1], parts[0])
    } else {
        (parts[0], parts[1], parts[2])
    };
    if d.len() > 2 || m.len() > 2 {
        return None;
    }
    let year: i32 = match y.len() {
        4 => y.parse().ok()?,
        2 => {
            let yy: i32 = y.parse().ok()?;
            if yy < 69 {
                2000 + yy
            } else {
                1900 + yy
            }
        }
        _ => return None,
    };
    NaiveDate::from_ymd_opt(year, m.parse().ok()?, d.parse().ok()?)
}

fn is_time_of_day(raw: &str) -> bool {
    NaiveTime::parse_from_str(raw, "%H:%M:%S").is_ok()
        || NaiveTime::parse_from_str(raw, "%H:%M").is_ok()
}

// ---------------------------------------------------------------------------
// Amounts
// ---------------------------------------------------------------------------

/// Rewrite comma decimal separators as dots: `"12,50"` becomes `"12.50"`.
pub fn normalize_decimal(raw: &str) -> String {
    raw.trim().replace(',', ".")
}

/// Strict amount parse. Blank and non-numeric cells yield `None`.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    Decimal::from_str(&normalize_decimal(raw)).ok()
}

// ---------------------------------------------------------------------------
// Counts
// ---------------------------------------------------------------------------

/// Parse a manually entered unit count. Blank means zero.
pub fn parse_count(field: &'static str, raw: &str) -> Result<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed.parse().map_err(|_| TallyError::Validation {
        field,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_dmy() {
        assert_eq!(parse_date_dmy("31/12/2024"), Some(date(2024, 12, 31)));
        assert_eq!(parse_date_dmy("01/02/2025"), Some(date(2025, 2, 1)));
        assert_eq!(parse_date_dmy("1/2/2025"), Some(date(2025, 2, 1)));
        assert_eq!(parse_date_dmy(" 03-01-2025 "), Some(date(2025, 1, 3)));
        assert_eq!(parse_date_dmy("03.01.2025"), Some(date(2025, 1, 3)));
    }

    #[test]
    fn test_parse_date_dmy_two_digit_year() {
        assert_eq!(parse_date_dmy("03/01/25"), Some(date(2025, 1, 3)));
        assert_eq!(parse_date_dmy("03/01/99"), Some(date(1999, 1, 3)));
    }

    #[test]
    fn test_parse_date_iso_and_time() {
        assert_eq!(parse_date_dmy("2025-01-03"), Some(date(2025, 1, 3)));
        assert_eq!(parse_date_dmy("03/01/2025 14:30"), Some(date(2025, 1, 3)));
        assert_eq!(parse_date_dmy("03/01/2025 14:30:59"), Some(date(2025, 1, 3)));
        assert_eq!(parse_date_dmy("2025-01-03T08:00:00"), Some(date(2025, 1, 3)));
        assert_eq!(parse_date_dmy("03/01/2025 late"), None);
    }

    #[test]
    fn test_parse_date_dmy_rejects_garbage() {
        assert_eq!(parse_date_dmy("not-a-date"), None);
        assert_eq!(parse_date_dmy(""), None);
        assert_eq!(parse_date_dmy("31/02/2025"), None); // Feb 31
        assert_eq!(parse_date_dmy("01/13/2025"), None); // month 13
        assert_eq!(parse_date_dmy("01/01-2025"), None);
        assert_eq!(parse_date_dmy("01/01/20255"), None);
    }

    #[test]
    fn test_normalize_decimal() {
        assert_eq!(normalize_decimal("12,50"), "12.50");
        assert_eq!(normalize_decimal(" -5,00 "), "-5.00");
        assert_eq!(normalize_decimal("100.5"), "100.5");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("100,50"), Some(Decimal::new(10050, 2)));
        assert_eq!(parse_amount("-5,00"), Some(Decimal::new(-500, 2)));
        assert_eq!(parse_amount("50"), Some(Decimal::from(50)));
        assert_eq!(parse_amount("  7.25 "), Some(Decimal::new(725, 2)));
        assert_eq!(parse_amount("+5"), Some(Decimal::from(5)));
        assert_eq!(parse_amount("1e3"), Some(Decimal::from(1000)));
    }

    #[test]
    fn test_parse_amount_is_strict() {
        assert_eq!(parse_amount("N/A"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("   "), None);
        assert_eq!(parse_amount("1.234,50"), None);
        assert_eq!(parse_amount("12 kr"), None);
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("soda", "").unwrap(), 0);
        assert_eq!(parse_count("soda", "  ").unwrap(), 0);
        assert_eq!(parse_count("soda", "12").unwrap(), 12);
        assert_eq!(parse_count("soda", " 3\n").unwrap(), 3);
    }

    #[test]
    fn test_parse_count_rejects_invalid() {
        for bad in ["-1", "2.5", "abc", "1 2"] {
            let err = parse_count("beer", bad).unwrap_err();
            assert!(
                matches!(err, TallyError::Validation { field: "beer", .. }),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_cell_policies_stay_asymmetric() {
        assert_eq!(DATE_CELLS, CellPolicy::Skip);
        assert_eq!(AMOUNT_CELLS, CellPolicy::Reject);
    }
}
