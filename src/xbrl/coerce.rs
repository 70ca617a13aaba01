use chrono::NaiveDate;

use super::table::{Table, Value};

pub const NUMERIC_COLUMNS: &[&str] = &["amount", "decimals", "factCount"];
pub const DATE_COLUMNS: &[&str] = &["periodStart", "periodEnd", "periodInstant"];

/// Converts the listed columns in place. Cells that are null or do not parse
/// become `Value::Null`; columns the table lacks are skipped.
pub fn coerce(table: &mut Table, numeric: &[&str], dates: &[&str]) {
    for column in numeric {
        if let Some(cells) = table.column_cells_mut(column) {
            for cell in cells {
                *cell = to_number(cell);
            }
        }
    }
    for column in dates {
        if let Some(cells) = table.column_cells_mut(column) {
            for cell in cells {
                *cell = to_date(cell);
            }
        }
    }
}

/// Coercion applied to facts query results.
pub fn coerce_facts(table: &mut Table) {
    coerce(table, NUMERIC_COLUMNS, DATE_COLUMNS);
}

fn to_number(cell: &Value) -> Value {
    match cell {
        Value::Number(n) => Value::Number(*n),
        Value::Text(s) => parse_number(s).map_or(Value::Null, Value::Number),
        _ => Value::Null,
    }
}

fn to_date(cell: &Value) -> Value {
    match cell {
        Value::Date(d) => Value::Date(*d),
        Value::Text(s) => parse_date(s).map_or(Value::Null, Value::Date),
        _ => Value::Null,
    }
}

pub fn parse_number(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    // "INF" marks exact values in the decimals attribute
    if raw.eq_ignore_ascii_case("inf") {
        return Some(f64::INFINITY);
    }
    raw.parse::<f64>().ok().filter(|n| !n.is_nan())
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let day = match raw.find(['T', ' ']) {
        Some(pos) => &raw[..pos],
        None => raw,
    };
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}
