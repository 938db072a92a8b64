//! Radius and polygon membership filters over [`GeoTable`]s.
//!
//! Three interchangeable strategies trade precision for speed:
//!
//! | strategy            | radius test                  | polygon test              |
//! |---------------------|------------------------------|---------------------------|
//! | [`GeodesicFilter`]  | ellipsoidal geodesic, `<=`   | strict `Contains`         |
//! | [`HaversineFilter`] | batched spherical, `<=`      | bbox mask, then `Contains`|
//! | [`IndexedFilter`]   | R*-tree prune, spherical `<=`| R*-tree prune, `Intersects` |
//!
//! All strategies agree away from the query boundary. Rows lying within a few
//! meters of a radius boundary, or exactly on a polygon ring, may be selected
//! by one strategy and not another.
//!
//! Every filter returns a new table with the input's columns and the selected
//! rows in their original order.

mod geodesic;
mod haversine;
mod indexed;

pub use geodesic::GeodesicFilter;
pub use haversine::{HaversineFilter, haversine_distances};
pub use indexed::{IndexedFilter, RecordIndex};

use crate::compute::validation::{validate_geographic_point, validate_polygon, validate_radius};
use crate::error::{GeocoverError, Result};
use geocover_types::config::ColumnNames;
use geocover_types::geo::{Point, Polygon};
use geocover_types::table::GeoTable;

/// Membership filtering of tabular records against a region.
pub trait SpatialFilter: Send + Sync {
    /// Short strategy name, used in logs and configuration.
    fn name(&self) -> &'static str;

    /// Coordinate columns this filter reads.
    fn columns(&self) -> &ColumnNames;

    /// Rows within `radius_meters` of `center`.
    fn within_radius(&self, table: &GeoTable, center: &Point, radius_meters: f64)
    -> Result<GeoTable>;

    /// Rows inside `polygon`, given in (longitude, latitude) order.
    fn within_polygon(&self, table: &GeoTable, polygon: &Polygon) -> Result<GeoTable>;
}

pub(crate) fn validate_radius_query(center: &Point, radius_meters: f64) -> Result<()> {
    validate_geographic_point(center)?;
    validate_radius(radius_meters)
}

/// Row coordinates, rejecting cells that do not describe a valid position.
pub(crate) fn row_points(table: &GeoTable, columns: &ColumnNames) -> Result<Vec<Point>> {
    let points = table.coordinates(columns)?;
    for (row, point) in points.iter().enumerate() {
        if validate_geographic_point(point).is_err() {
            let column = if (-90.0..=90.0).contains(&point.lat()) {
                &columns.longitude
            } else {
                &columns.latitude
            };
            return Err(GeocoverError::InvalidCoordinate {
                row,
                column: column.clone(),
                value: point.to_string(),
            });
        }
    }
    Ok(points)
}

/// Rows of `table` whose mask entry is set.
pub(crate) fn select(table: &GeoTable, mask: &[bool]) -> GeoTable {
    let indices: Vec<usize> = mask
        .iter()
        .enumerate()
        .filter_map(|(i, &keep)| keep.then_some(i))
        .collect();
    table.take(&indices)
}

pub(crate) fn check_polygon_query(polygon: &Polygon) -> Result<()> {
    validate_polygon(polygon)
}
