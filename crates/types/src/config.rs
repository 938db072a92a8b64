use serde::{Deserialize, Serialize};

/// Names of the coordinate columns in a [`GeoTable`](crate::table::GeoTable).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnNames {
    #[serde(default = "ColumnNames::default_latitude")]
    pub latitude: String,
    #[serde(default = "ColumnNames::default_longitude")]
    pub longitude: String,
}

impl ColumnNames {
    fn default_latitude() -> String {
        "latitude".to_string()
    }

    fn default_longitude() -> String {
        "longitude".to_string()
    }

    pub fn new(latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
        }
    }
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            latitude: Self::default_latitude(),
            longitude: Self::default_longitude(),
        }
    }
}
