//! Geographic coverage sampling and record filtering.
//!
//! ## Features
//! - **Sampling**: evenly spaced points covering a polygon, a MultiPolygon or a
//!   circle around a point of interest, using ellipsoidal geodesics
//! - **GeoJSON**: Polygon / MultiPolygon / single-feature FeatureCollection input,
//!   outer rings only
//! - **Filtering**: radius and polygon membership over tabular records with
//!   three strategies (exact geodesic, batched haversine, R*-tree index)
//!
//! ```rust
//! use geocover::prelude::*;
//! use serde_json::json;
//!
//! let aoi = geojson::parse_geojson(
//!     r#"{"type":"Polygon","coordinates":[[[105.8,21.0],[105.9,21.0],[105.9,21.1],[105.8,21.1],[105.8,21.0]]]}"#,
//! )?;
//! let points = sample(&aoi, 5000.0, false)?;
//! assert!(!points.is_empty());
//!
//! let places = GeoTable::with_rows(
//!     vec!["title".into(), "latitude".into(), "longitude".into()],
//!     vec![
//!         vec![json!("Hoan Kiem Lake"), json!(21.0285), json!(105.8520)],
//!         vec![json!("Noi Bai Airport"), json!(21.2187), json!(105.8042)],
//!     ],
//! )?;
//! let filter = HaversineFilter::default();
//! let nearby = filter.within_radius(&places, &Point::from_lat_lon(21.03, 105.85), 2000.0)?;
//! assert_eq!(nearby.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod compute;
pub mod config;
pub mod error;

pub use error::{GeocoverError, Result};

pub use geocover_types::bbox::BoundingBox2D;
pub use geocover_types::geo::{MultiPolygon, Point, Polygon};
pub use geocover_types::table::{GeoTable, TableError};

pub use config::{ColumnNames, Config, FilterConfig, FilterStrategy, SamplerConfig};

pub use compute::filter::{
    GeodesicFilter, HaversineFilter, IndexedFilter, RecordIndex, SpatialFilter,
};
pub use compute::spatial::{
    DistanceMetric, GridSampler, circle, destination, distance, sample, sample_around,
};

// Re-export validation and GeoJSON utilities
pub use compute::geojson;
pub use compute::validation;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {
    pub use crate::{GeocoverError, Result};

    pub use crate::{BoundingBox2D, MultiPolygon, Point, Polygon};

    pub use crate::{GeoTable, SpatialFilter};
    pub use crate::{GeodesicFilter, HaversineFilter, IndexedFilter, RecordIndex};

    pub use crate::{ColumnNames, Config, FilterConfig, FilterStrategy, SamplerConfig};

    pub use crate::{GridSampler, circle, distance, sample, sample_around};

    pub use crate::{geojson, validation};
}
