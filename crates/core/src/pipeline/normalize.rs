use std::collections::HashSet;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

use crate::domain::reference::ReferenceRow;
use crate::errors::{PipelineError, REFERENCE_COLUMNS};
use crate::table::{Frame, TableKind};

const DATETIME_FORMATS: [&str; 4] =
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%m/%d/%Y %H:%M:%S", "%m/%d/%Y %H:%M"];
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y"];

/// Projects the reference export into typed rows. The only fatal outcome is
/// a missing required column; every field-level parse failure coerces to a
/// documented default (dates and market values to missing, base price to
/// zero). Extra columns are ignored.
pub fn parse_reference(frame: &Frame) -> Result<Vec<ReferenceRow>, PipelineError> {
    let missing: Vec<String> = REFERENCE_COLUMNS
        .iter()
        .filter(|column| frame.column_index(column).is_none())
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(PipelineError::MissingColumns { kind: TableKind::Reference, missing });
    }

    // every required column is present past this point
    let index = |name: &str| frame.column_index(name).unwrap_or_default();
    let stock_id = index("Stock ID");
    let metal = index("Metal");
    let price_per_unit = index("Price Per Unit");
    let gold_market = index("Gold Market");
    let created = index("Date Created");
    let price_change = index("Date Last Price Change");
    let stocked = index("Last Stocked");

    let rows = (0..frame.len())
        .map(|row| {
            let dates = [created, price_change, stocked]
                .map(|column| parse_datetime(frame.cell(row, column)));
            ReferenceRow::new(
                frame.cell(row, stock_id),
                frame.cell(row, metal),
                parse_base_price(frame.cell(row, price_per_unit)),
                parse_market(frame.cell(row, gold_market)),
                dates.into_iter().flatten().max(),
            )
        })
        .collect();

    Ok(rows)
}

/// Cleans identifier and metal text, orders rows most-recent-first, drops
/// rows whose `max_date` is missing or after today's midnight (not yet
/// effective), and dedups by stock id keeping the most recent entry.
/// Idempotent on its own output.
pub fn normalize_reference(mut rows: Vec<ReferenceRow>, today: NaiveDate) -> Vec<ReferenceRow> {
    for row in &mut rows {
        row.stock_id = strip_whitespace(&row.stock_id);
        row.metal = strip_whitespace(&row.metal).replace("SS", "S/S");
    }

    // missing dates order before every Some, so they land last when reversed
    rows.sort_by(|a, b| b.max_date.cmp(&a.max_date));

    let cutoff = today.and_time(NaiveTime::MIN);
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|row| row.max_date.is_some_and(|date| date <= cutoff))
        .filter(|row| seen.insert(row.stock_id.clone()))
        .collect()
}

fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(value, format) {
            return Some(parsed.and_time(NaiveTime::MIN));
        }
    }
    None
}

fn parse_base_price(raw: &str) -> Decimal {
    Decimal::from_str(raw.trim()).unwrap_or(Decimal::ZERO)
}

/// Market values arrive with thousands separators, stray dashes, and
/// embedded whitespace; those are stripped before the numeric parse.
fn parse_market(raw: &str) -> Option<Decimal> {
    let cleaned: String =
        raw.chars().filter(|c| !matches!(c, ',' | '-') && !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

fn strip_whitespace(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}
