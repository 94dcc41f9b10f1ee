//! Date and amount parsing for statement text.
//!
//! Statements mix six date shapes across seven languages; amounts mix comma
//! and dot thousand separators. Parsing never panics: failure is `None` and
//! the caller substitutes [`sentinel_date`] plus a warning.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::lexicon::months;

/// Substituted for unparseable dates; always paired with a warning.
pub fn sentinel_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()
}

static ISO_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").unwrap());

// Day, month name, year. Optional trailing period after day and month
// ("10. Dez. 2025"), optional "de" connectors ("5 de enero de 2025").
static DMY_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})\.?\s+(?:de\s+)?(\p{L}+)\.?\s+(?:de\s+)?(\d{4})$").unwrap()
});

// Month name, day, comma, year. Only English orders dates this way.
static MDY_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\p{L}+)\.?\s+(\d{1,2}),\s*(\d{4})$").unwrap());

static SLASH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").unwrap());
static DOT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,2})\.(\d{1,2})\.(\d{4})$").unwrap());
static DASH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,2})-(\d{1,2})-(\d{4})$").unwrap());

/// Any of the six date shapes at the start of a line. The candidate still has
/// to survive [`parse_statement_date`]; this regex only bounds the token.
static LEADING_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:\d{4}-\d{2}-\d{2}|\d{1,2}\.?\s+(?:de\s+)?\p{L}+\.?\s+(?:de\s+)?\d{4}|\p{L}+\.?\s+\d{1,2},\s*\d{4}|\d{1,2}[./-]\d{1,2}[./-]\d{4})",
    )
    .unwrap()
});

/// Parse one of the six supported date shapes, tried in order. The first
/// successful shape wins.
pub fn parse_statement_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    if let Some(caps) = ISO_RE.captures(s) {
        return ymd(&caps[1], &caps[2], &caps[3]);
    }
    if let Some(caps) = DMY_NAME_RE.captures(s) {
        let month = months::month_number_any(&caps[2])?;
        return NaiveDate::from_ymd_opt(caps[3].parse().ok()?, month, caps[1].parse().ok()?);
    }
    if let Some(caps) = MDY_NAME_RE.captures(s) {
        let month = months::month_number_any(&caps[1])?;
        return NaiveDate::from_ymd_opt(caps[3].parse().ok()?, month, caps[2].parse().ok()?);
    }
    for re in [&SLASH_RE, &DOT_RE, &DASH_RE] {
        if let Some(caps) = re.captures(s) {
            return ymd(&caps[3], &caps[2], &caps[1]);
        }
    }
    None
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// Match a date token at the start of a line. Returns the date and the number
/// of bytes consumed, so the caller can treat the remainder as description.
pub fn match_leading_date(line: &str) -> Option<(NaiveDate, usize)> {
    let m = LEADING_DATE_RE.find(line)?;
    let date = parse_statement_date(m.as_str())?;
    Some((date, m.end()))
}

/// True when the whole line is a single date token.
pub fn is_standalone_date(line: &str) -> bool {
    parse_statement_date(line.trim()).is_some()
}

/// Parse a mileage/point amount. Accepts both `1,234` and `1.234` thousand
/// separators and an optional leading sign; amounts are always integral.
pub fn parse_amount(s: &str) -> Option<i64> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| !matches!(c, '.' | ',' | ' ' | '\u{00a0}'))
        .collect();
    if cleaned.is_empty() || cleaned == "+" || cleaned == "-" {
        return None;
    }
    cleaned.parse::<i64>().ok()
}

/// `YYYY-MM` key used by the monthly aggregations.
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Language;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_iso_shape() {
        assert_eq!(parse_statement_date("2025-03-12"), Some(d(2025, 3, 12)));
    }

    #[test]
    fn test_day_month_name_year() {
        assert_eq!(parse_statement_date("12 Mar 2025"), Some(d(2025, 3, 12)));
        assert_eq!(parse_statement_date("10. Dez. 2025"), Some(d(2025, 12, 10)));
        assert_eq!(parse_statement_date("5 de enero de 2025"), Some(d(2025, 1, 5)));
        assert_eq!(parse_statement_date("1 août 2024"), Some(d(2024, 8, 1)));
    }

    #[test]
    fn test_month_name_day_year() {
        assert_eq!(parse_statement_date("March 12, 2025"), Some(d(2025, 3, 12)));
        assert_eq!(parse_statement_date("Sept. 3, 2024"), Some(d(2024, 9, 3)));
    }

    #[test]
    fn test_numeric_shapes() {
        assert_eq!(parse_statement_date("12/03/2025"), Some(d(2025, 3, 12)));
        assert_eq!(parse_statement_date("12.03.2025"), Some(d(2025, 3, 12)));
        assert_eq!(parse_statement_date("12-03-2025"), Some(d(2025, 3, 12)));
    }

    #[test]
    fn test_round_trip_all_shapes() {
        let date = d(2025, 12, 10);
        let name_en = months::month_name(Language::En, 12).unwrap();
        let shapes = [
            "2025-12-10".to_string(),
            format!("10 {} 2025", name_en),
            format!("{} 10, 2025", name_en),
            "10/12/2025".to_string(),
            "10.12.2025".to_string(),
            "10-12-2025".to_string(),
        ];
        for shape in shapes {
            assert_eq!(parse_statement_date(&shape), Some(date), "shape: {shape}");
        }
    }

    #[test]
    fn test_invalid_dates() {
        assert_eq!(parse_statement_date("32 Mar 2025"), None);
        assert_eq!(parse_statement_date("12 Notamonth 2025"), None);
        assert_eq!(parse_statement_date("hello"), None);
        assert_eq!(parse_statement_date("99.99.2025"), None);
    }

    #[test]
    fn test_leading_date() {
        let (date, len) = match_leading_date("12 Mar 2025 Hotel stay +500 Miles").unwrap();
        assert_eq!(date, d(2025, 3, 12));
        assert_eq!(&"12 Mar 2025 Hotel stay +500 Miles"[len..], " Hotel stay +500 Miles");
        assert!(match_leading_date("Hotel stay 12 Mar 2025").is_none());
    }

    #[test]
    fn test_amounts() {
        assert_eq!(parse_amount("2,500"), Some(2500));
        assert_eq!(parse_amount("2.500"), Some(2500));
        assert_eq!(parse_amount("-30,000"), Some(-30000));
        assert_eq!(parse_amount("+15"), Some(15));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("abc"), None);
    }
}
