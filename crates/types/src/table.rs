//! Tabular collections of geo-tagged records.
//!
//! A [`GeoTable`] is the seam between the filtering engine and whatever
//! dataframe or file layer the caller uses: named columns, rows of JSON cells.
//! Only the coordinate columns are ever interpreted; every other cell is
//! carried through untouched.

use crate::config::ColumnNames;
use crate::geo::Point;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Error type for table construction and coordinate extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum TableError {
    /// A named column does not exist
    MissingColumn(String),
    /// A row does not have one cell per column
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A coordinate cell is missing, non-numeric or non-finite
    InvalidCoordinate {
        row: usize,
        column: String,
        value: String,
    },
}

impl std::fmt::Display for TableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingColumn(name) => write!(f, "Column '{}' not found", name),
            Self::RowLength {
                row,
                expected,
                found,
            } => write!(
                f,
                "Row {} has {} cells, expected {}",
                row, found, expected
            ),
            Self::InvalidCoordinate { row, column, value } => write!(
                f,
                "Row {} column '{}' is not a finite coordinate: {}",
                row, column, value
            ),
        }
    }
}

impl std::error::Error for TableError {}

/// Rows of geo-tagged records with named columns.
///
/// # Examples
///
/// ```
/// use geocover_types::config::ColumnNames;
/// use geocover_types::table::GeoTable;
/// use serde_json::json;
///
/// let table = GeoTable::with_rows(
///     vec!["title".into(), "latitude".into(), "longitude".into()],
///     vec![
///         vec![json!("ATM Hoan Kiem"), json!(21.0288), json!(105.8527)],
///         vec![json!("ATM Ba Dinh"), json!("21.0368"), json!("105.8342")],
///     ],
/// )
/// .unwrap();
///
/// let points = table.coordinates(&ColumnNames::default()).unwrap();
/// assert_eq!(points[1].lat(), 21.0368);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawGeoTable")]
pub struct GeoTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

/// Wire form of [`GeoTable`], checked for ragged rows before use.
#[derive(Deserialize)]
struct RawGeoTable {
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<Value>>,
}

impl TryFrom<RawGeoTable> for GeoTable {
    type Error = TableError;

    fn try_from(raw: RawGeoTable) -> Result<Self, Self::Error> {
        Self::with_rows(raw.columns, raw.rows)
    }
}

impl GeoTable {
    /// Empty table with the given columns.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Table from columns and rows; every row must have one cell per column.
    pub fn with_rows(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self, TableError> {
        let mut table = Self::new(columns);
        table.rows.reserve(rows.len());
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Table from JSON objects. Columns are the union of keys in first-seen
    /// order (each record contributes its keys in map iteration order); keys
    /// absent from a record become `null`.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Map<String, Value>>,
    {
        let records: Vec<Map<String, Value>> = records.into_iter().collect();
        let mut columns: Vec<String> = Vec::new();
        for record in &records {
            for key in record.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = records
            .into_iter()
            .map(|mut record| {
                columns
                    .iter()
                    .map(|c| record.remove(c).unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> Result<(), TableError> {
        if row.len() != self.columns.len() {
            return Err(TableError::RowLength {
                row: self.rows.len(),
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    #[inline]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[inline]
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn row(&self, index: usize) -> Option<&[Value]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Cell at `row` in the named column.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Rows as JSON objects, in row order.
    pub fn records(&self) -> impl Iterator<Item = Map<String, Value>> + '_ {
        self.rows.iter().map(|row| {
            self.columns
                .iter()
                .cloned()
                .zip(row.iter().cloned())
                .collect()
        })
    }

    /// Same columns, no rows.
    pub fn empty_like(&self) -> Self {
        Self::new(self.columns.clone())
    }

    /// New table holding copies of the rows at `indices`, in the given order.
    /// Out-of-range indices are skipped.
    pub fn take(&self, indices: &[usize]) -> Self {
        let rows = indices
            .iter()
            .filter_map(|&i| self.rows.get(i).cloned())
            .collect();
        Self {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Add a column, or replace the values of an existing one.
    pub fn set_column(&mut self, name: &str, values: Vec<Value>) -> Result<(), TableError> {
        if values.len() != self.rows.len() {
            return Err(TableError::RowLength {
                row: values.len().min(self.rows.len()),
                expected: self.rows.len(),
                found: values.len(),
            });
        }

        match self.column_index(name) {
            Some(col) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[col] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(())
    }

    /// Parse one coordinate cell per row. Numbers and numeric strings are
    /// accepted.
    pub fn column_f64(&self, name: &str) -> Result<Vec<f64>, TableError> {
        let col = self
            .column_index(name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))?;

        self.rows
            .iter()
            .enumerate()
            .map(|(row, cells)| {
                let cell = &cells[col];
                coordinate_value(cell).ok_or_else(|| TableError::InvalidCoordinate {
                    row,
                    column: name.to_string(),
                    value: cell.to_string(),
                })
            })
            .collect()
    }

    /// Every row's coordinate as a [`Point`].
    pub fn coordinates(&self, names: &ColumnNames) -> Result<Vec<Point>, TableError> {
        let lats = self.column_f64(&names.latitude)?;
        let lons = self.column_f64(&names.longitude)?;
        Ok(lats
            .into_iter()
            .zip(lons)
            .map(|(lat, lon)| Point::from_lat_lon(lat, lon))
            .collect())
    }
}

/// A finite coordinate from a number or numeric-string cell.
pub fn coordinate_value(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_table() -> GeoTable {
        GeoTable::with_rows(
            vec!["link".into(), "latitude".into(), "longitude".into()],
            vec![
                vec![json!("a"), json!(21.0), json!(105.8)],
                vec![json!("b"), json!("21.05"), json!(" 105.85 ")],
                vec![json!("c"), json!(21.1), json!(105.9)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_row_length_is_checked() {
        let err = GeoTable::with_rows(
            vec!["latitude".into(), "longitude".into()],
            vec![vec![json!(21.0)]],
        )
        .unwrap_err();
        assert_eq!(
            err,
            TableError::RowLength {
                row: 0,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_coordinates_accept_numeric_strings() {
        let points = sample_table().coordinates(&ColumnNames::default()).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[1], Point::from_lat_lon(21.05, 105.85));
    }

    #[test]
    fn test_coordinates_reject_garbage() {
        let table = GeoTable::with_rows(
            vec!["latitude".into(), "longitude".into()],
            vec![vec![json!(21.0), json!(105.8)], vec![json!(null), json!(105.8)]],
        )
        .unwrap();
        let err = table.coordinates(&ColumnNames::default()).unwrap_err();
        assert!(matches!(err, TableError::InvalidCoordinate { row: 1, .. }));
    }

    #[test]
    fn test_missing_column() {
        let err = sample_table()
            .coordinates(&ColumnNames::new("lat", "lon"))
            .unwrap_err();
        assert_eq!(err, TableError::MissingColumn("lat".to_string()));
    }

    #[test]
    fn test_take_copies_rows_in_order() {
        let table = sample_table();
        let subset = table.take(&[2, 0, 9]);
        assert_eq!(subset.columns(), table.columns());
        assert_eq!(subset.len(), 2);
        assert_eq!(subset.get(0, "link"), Some(&json!("c")));
        assert_eq!(subset.get(1, "link"), Some(&json!("a")));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_from_records_unions_columns() {
        let mut first = Map::new();
        first.insert("title".into(), json!("bank"));
        first.insert("latitude".into(), json!(21.0));
        let mut second = Map::new();
        second.insert("latitude".into(), json!(21.1));
        second.insert("rating".into(), json!(4.5));

        let table = GeoTable::from_records(vec![first, second]);
        // serde_json maps iterate in key order
        assert_eq!(table.columns(), &["latitude", "title", "rating"]);
        assert_eq!(table.get(1, "title"), Some(&Value::Null));
        assert_eq!(table.records().nth(1).unwrap()["rating"], json!(4.5));
    }

    #[test]
    fn test_set_column_adds_and_replaces() {
        let mut table = sample_table();
        table
            .set_column("visited", vec![json!(true), json!(false), json!(true)])
            .unwrap();
        assert_eq!(table.columns().len(), 4);

        table
            .set_column("link", vec![json!("x"), json!("y"), json!("z")])
            .unwrap();
        assert_eq!(table.get(2, "link"), Some(&json!("z")));
        assert!(table.set_column("link", vec![json!("short")]).is_err());
    }

    #[test]
    fn test_deserialize_rejects_ragged_rows() {
        let err = serde_json::from_str::<GeoTable>(
            r#"{"columns":["title","latitude","longitude"],"rows":[["a",21.0,105.8],["b",21.0]]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Row 1 has 2 cells, expected 3"), "{}", err);

        let table: GeoTable = serde_json::from_str(
            r#"{"columns":["latitude","longitude"],"rows":[[21.0,105.8]]}"#,
        )
        .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(serde_json::from_str::<GeoTable>(&serde_json::to_string(&table).unwrap()).unwrap(), table);
    }
}
