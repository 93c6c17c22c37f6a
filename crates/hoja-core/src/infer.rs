use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{CellValue, Table};

/// Share of parseable values a text column needs before it is promoted to
/// a typed (date or number) column.
const PROMOTE_THRESHOLD: f64 = 0.6;

/// Shape gate for date candidates: 1-2 digit day/month, 2-4 digit year,
/// separated by `/` or `-`. Strings that fail this never reach the
/// template list.
static DATE_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,2}[/-]\d{1,2}[/-]\d{2,4}$").unwrap());

/// Date templates in priority order. Ambiguous strings like "03/04/2024"
/// are resolved by this order, not by content: day-first is tried before
/// month-first at each year width, ISO forms last.
const DATE_FORMATS: [&str; 10] = [
    "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%m-%d-%Y",
    "%d/%m/%y", "%m/%d/%y", "%d-%m-%y", "%m-%d-%y",
    "%Y-%m-%d", "%Y/%m/%d",
];

// Numeric shapes, tried in order: US grouping with decimal point,
// European grouping with decimal comma, comma-grouped integer, plain.
// The EU decimal part is capped at two digits so that a comma before a
// three-digit group ("140,000") reads as a thousands separator, not a
// decimal comma.
static NUM_US: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?[\d,]+\.\d+$").unwrap());
static NUM_EU: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?[\d.]+,\d{1,2}$").unwrap());
static NUM_GROUPED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?[\d,]+$").unwrap());
static NUM_PLAIN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?\d+\.?\d*$").unwrap());

/// Try to read a string as a date. Returns the first template that parses.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if !DATE_SHAPE.is_match(s) {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Try to read a string as a number, disambiguating thousands-separator
/// locales. Internal spaces are ignored ("1 200,50" is common in
/// extracted PDFs).
pub fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim().replace(' ', "");
    if s.is_empty() {
        return None;
    }
    if NUM_US.is_match(&s) {
        return s.replace(',', "").parse().ok();
    }
    if NUM_EU.is_match(&s) {
        return s.replace('.', "").replace(',', ".").parse().ok();
    }
    if NUM_GROUPED.is_match(&s) && s.contains(',') {
        return s.replace(',', "").parse().ok();
    }
    if NUM_PLAIN.is_match(&s) {
        return s.parse().ok();
    }
    None
}

/// Cell-level policy: date first, then number, otherwise the text stays.
///
/// Pure, so the inference result can be tested without touching a
/// workbook. The sheet writer applies it to any cell still textual.
pub fn coerce(s: &str) -> CellValue {
    if let Some(d) = parse_date(s) {
        return CellValue::Date(d);
    }
    if let Some(n) = parse_number(s) {
        return CellValue::Number(n);
    }
    CellValue::Text(s.to_string())
}

/// Column-level policy: promote a text column wholesale when at least 60%
/// of its non-blank values parse as dates (tried first) or numbers.
/// Values that fail to parse inside a promoted column become empty cells
/// rather than errors. Mixed-locale columns can misclassify; this is a
/// best-effort heuristic.
pub fn promote_columns(table: &mut Table) {
    for col in &mut table.columns {
        let sample: Vec<&str> = col
            .cells
            .iter()
            .filter_map(|c| match c {
                CellValue::Text(s) if !s.trim().is_empty() => Some(s.as_str()),
                _ => None,
            })
            .collect();
        if sample.is_empty() {
            continue;
        }

        let date_hits = sample.iter().filter(|s| parse_date(s).is_some()).count();
        if date_hits >= 1 && date_hits as f64 / sample.len() as f64 >= PROMOTE_THRESHOLD {
            for cell in &mut col.cells {
                if let CellValue::Text(s) = cell {
                    *cell = match parse_date(s) {
                        Some(d) => CellValue::Date(d),
                        None => CellValue::Empty,
                    };
                }
            }
            continue;
        }

        let num_hits = sample.iter().filter(|s| parse_number(s).is_some()).count();
        if num_hits >= 1 && num_hits as f64 / sample.len() as f64 >= PROMOTE_THRESHOLD {
            for cell in &mut col.cells {
                if let CellValue::Text(s) = cell {
                    *cell = match parse_number(s) {
                        Some(n) => CellValue::Number(n),
                        None => CellValue::Empty,
                    };
                }
            }
        }
    }
}
