//! Error types for sampling and filtering operations.

use geocover_types::table::TableError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeocoverError>;

#[derive(Debug, Error)]
pub enum GeocoverError {
    /// Degenerate numeric input: bad coordinates, spacing, radius or vertex count
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Geometry that cannot describe an area, e.g. fewer than 3 distinct vertices
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Malformed or unsupported GeoJSON payload
    #[error("Invalid GeoJSON: {0}")]
    InvalidGeoJson(String),

    #[error("Column '{0}' not found")]
    MissingColumn(String),

    #[error("Row {row} column '{column}' is not a finite coordinate: {value}")]
    InvalidCoordinate {
        row: usize,
        column: String,
        value: String,
    },

    /// A geodesic solution came back non-finite or crossed a pole/antimeridian
    #[error("Geodesic computation failed: {0}")]
    Geodesic(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<TableError> for GeocoverError {
    fn from(err: TableError) -> Self {
        match err {
            TableError::MissingColumn(name) => Self::MissingColumn(name),
            TableError::InvalidCoordinate { row, column, value } => {
                Self::InvalidCoordinate { row, column, value }
            }
            other @ TableError::RowLength { .. } => Self::InvalidInput(other.to_string()),
        }
    }
}
