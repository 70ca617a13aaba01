use chrono::NaiveDate;
use indexmap::IndexSet;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;
use std::io::Write;

use super::parsing::Record;

/// A single cell of a [`Table`].
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// String form of the cell, `None` for nulls.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

impl From<Option<String>> for Value {
    fn from(value: Option<String>) -> Self {
        value.map_or(Value::Null, Value::Text)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Text(s) => write!(f, "{}", s),
            Value::Number(n) => match non_finite_label(*n) {
                Some(label) => f.write_str(label),
                None => write!(f, "{}", n),
            },
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// JSON has no literal for these, and the remote service writes infinite
/// precision as `INF`.
fn non_finite_label(n: f64) -> Option<&'static str> {
    if n.is_nan() {
        Some("NaN")
    } else if n == f64::INFINITY {
        Some("INF")
    } else if n == f64::NEG_INFINITY {
        Some("-INF")
    } else {
        None
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Number(n) => match non_finite_label(*n) {
                Some(label) => serializer.serialize_str(label),
                None => serializer.serialize_f64(*n),
            },
            Value::Date(d) => serializer.collect_str(&d.format("%Y-%m-%d")),
        }
    }
}

/// Column-uniform result of an operation. Every row holds exactly one cell per column.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(index))
    }

    /// All cells of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(|r| &r[index]).collect())
    }

    pub(crate) fn column_cells_mut(&mut self, name: &str) -> Option<impl Iterator<Item = &mut Value> + '_> {
        let index = self.column_index(name)?;
        Some(self.rows.iter_mut().map(move |r| &mut r[index]))
    }

    /// Rows as records with every column present; non-text cells are rendered as strings.
    pub fn to_records(&self) -> Vec<Record> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().map(Value::to_text))
                    .collect()
            })
            .collect()
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> csv::Result<()> {
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
        if !self.columns.is_empty() {
            writer.write_record(&self.columns)?;
        }
        for row in &self.rows {
            writer.write_record(row.iter().map(|v| v.to_string()))?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(&RowView {
                columns: &self.columns,
                row,
            })?;
        }
        seq.end()
    }
}

struct RowView<'a> {
    columns: &'a [String],
    row: &'a [Value],
}

impl Serialize for RowView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, value) in self.columns.iter().zip(self.row) {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// Merges record groups (one per call) into one table.
///
/// The column set is the union of all keys, in first-seen order, computed before
/// any row is built. Cells a record does not carry are `Value::Null`, so records
/// with different attribute sets never lose a column. Rows keep group order, then
/// record order. No records gives an empty table without columns.
pub fn harmonize<I>(groups: I) -> Table
where
    I: IntoIterator<Item = Vec<Record>>,
{
    let records: Vec<Record> = groups.into_iter().flatten().collect();

    let columns: IndexSet<String> = records
        .iter()
        .flat_map(|record| record.keys().cloned())
        .collect();

    let rows = records
        .into_iter()
        .map(|mut record| {
            columns
                .iter()
                .map(|column| Value::from(record.swap_remove(column).flatten()))
                .collect::<Vec<Value>>()
        })
        .collect();

    Table {
        columns: columns.into_iter().collect(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, Option<&str>)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(String::from)))
            .collect()
    }

    #[test]
    fn test_union_of_columns_fills_nulls() {
        let table = harmonize(vec![vec![record(&[("a", Some("1"))]), record(&[("b", Some("2"))])]]);

        assert_eq!(table.columns(), &["a".to_string(), "b".to_string()]);
        assert_eq!(
            table.rows(),
            &[
                vec![Value::Text("1".into()), Value::Null],
                vec![Value::Null, Value::Text("2".into())],
            ]
        );
    }

    #[test]
    fn test_groups_keep_call_order() {
        let table = harmonize(vec![
            vec![record(&[("id", Some("1"))]), record(&[("id", Some("2"))])],
            vec![],
            vec![record(&[("id", Some("3")), ("extra", None)])],
        ]);

        assert_eq!(table.len(), 3);
        let ids: Vec<_> = table
            .column("id")
            .unwrap()
            .into_iter()
            .filter_map(Value::as_text)
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(table.get(0, "extra"), Some(&Value::Null));
        assert_eq!(table.get(2, "extra"), Some(&Value::Null));
    }

    #[test]
    fn test_column_order_is_first_seen() {
        let table = harmonize(vec![
            vec![record(&[("b", Some("x")), ("a", Some("y"))])],
            vec![record(&[("c", Some("z")), ("a", Some("w"))])],
        ]);
        assert_eq!(table.columns(), &["b", "a", "c"].map(String::from));
    }

    #[test]
    fn test_no_records_gives_empty_table() {
        let table = harmonize(Vec::<Vec<Record>>::new());
        assert!(table.is_empty());
        assert!(table.columns().is_empty());

        let table = harmonize(vec![vec![], vec![]]);
        assert!(table.columns().is_empty());
    }

    #[test]
    fn test_harmonize_is_idempotent() {
        let table = harmonize(vec![
            vec![record(&[("a", Some("1"))])],
            vec![record(&[("b", Some("2")), ("c", None)])],
        ]);
        let again = harmonize(vec![table.to_records()]);
        assert_eq!(again, table);
    }

    #[test]
    fn test_write_csv() {
        let table = harmonize(vec![vec![
            record(&[("name", Some("Assets")), ("amount", Some("10"))]),
            record(&[("name", Some("Revenues, net"))]),
        ]]);

        let mut out = Vec::new();
        table.write_csv(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "name,amount\nAssets,10\n\"Revenues, net\",\n"
        );
    }

    #[test]
    fn test_json_rows_are_objects() {
        let mut table = harmonize(vec![vec![record(&[("amount", Some("10")), ("note", None)])]]);
        for cell in table.column_cells_mut("amount").unwrap() {
            *cell = Value::Number(10.0);
        }
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json, serde_json::json!([{ "amount": 10.0, "note": null }]));
    }

    #[test]
    fn test_infinite_numbers_keep_service_spelling() {
        let mut table = harmonize(vec![vec![
            record(&[("decimals", Some("INF"))]),
            record(&[("decimals", Some("-2"))]),
        ]]);
        let numbers = [f64::INFINITY, -2.0];
        for (cell, n) in table.column_cells_mut("decimals").unwrap().zip(numbers) {
            *cell = Value::Number(n);
        }

        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json, serde_json::json!([{ "decimals": "INF" }, { "decimals": -2.0 }]));

        let mut out = Vec::new();
        table.write_csv(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "decimals\nINF\n-2\n");
    }
}
