//! R*-tree backed filtering.
//!
//! Rows are bulk-loaded into an R*-tree once; each query prunes candidates
//! with an AABB envelope and runs the exact test only on the survivors.
//! Building the tree costs more than a single scan, so the index pays off
//! when it is reused through [`RecordIndex`] or queried with polygons that
//! cover a small share of the rows.

use super::{SpatialFilter, check_polygon_query, row_points, validate_radius_query};
use crate::compute::spatial::haversine_distance;
use crate::config::EARTH_MEAN_RADIUS_METERS;
use crate::error::Result;
use geocover_types::bbox::BoundingBox2D;
use geocover_types::config::ColumnNames;
use geocover_types::geo::{Point, Polygon};
use geocover_types::table::GeoTable;
use rstar::{AABB, RTree, RTreeObject};
use std::f64::consts::FRAC_PI_2;
use std::time::Instant;

/// A table row position in the R*-tree.
#[derive(Debug, Clone, Copy, PartialEq)]
struct IndexedRow {
    lon: f64,
    lat: f64,
    row: usize,
}

impl RTreeObject for IndexedRow {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.lon, self.lat])
    }
}

/// Spatial index over a table's rows.
///
/// Queries return row indices in ascending order, ready for
/// [`GeoTable::take`].
///
/// # Examples
///
/// ```
/// use geocover::compute::filter::RecordIndex;
/// use geocover::{ColumnNames, GeoTable, Point};
/// use serde_json::json;
///
/// let table = GeoTable::with_rows(
///     vec!["latitude".into(), "longitude".into()],
///     vec![vec![json!(21.0285), json!(105.8520)], vec![json!(21.2187), json!(105.8042)]],
/// )?;
/// let index = RecordIndex::build(&table, &ColumnNames::default())?;
/// let rows = index.within_radius(&Point::from_lat_lon(21.03, 105.85), 2000.0)?;
/// assert_eq!(rows, vec![0]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct RecordIndex {
    tree: RTree<IndexedRow>,
    earth_radius: f64,
}

impl RecordIndex {
    /// Bulk-load the rows of `table`. Fails on missing or invalid coordinates.
    pub fn build(table: &GeoTable, columns: &ColumnNames) -> Result<Self> {
        let rows: Vec<IndexedRow> = row_points(table, columns)?
            .into_iter()
            .enumerate()
            .map(|(row, p)| IndexedRow {
                lon: p.lon(),
                lat: p.lat(),
                row,
            })
            .collect();

        Ok(Self {
            tree: RTree::bulk_load(rows),
            earth_radius: EARTH_MEAN_RADIUS_METERS,
        })
    }

    /// Sphere radius used for distance checks.
    pub fn with_earth_radius(mut self, meters: f64) -> Self {
        assert!(
            meters.is_finite() && meters > 0.0,
            "Earth radius must be positive"
        );
        self.earth_radius = meters;
        self
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Rows within `radius_meters` of `center` on the sphere, boundary included.
    pub fn within_radius(&self, center: &Point, radius_meters: f64) -> Result<Vec<usize>> {
        validate_radius_query(center, radius_meters)?;

        let envelope = radius_envelope(center, radius_meters, self.earth_radius);
        let mut rows: Vec<usize> = self
            .tree
            .locate_in_envelope(&envelope)
            .filter(|r| {
                let p = Point::new(r.lon, r.lat);
                haversine_distance(center, &p, self.earth_radius) <= radius_meters
            })
            .map(|r| r.row)
            .collect();
        rows.sort_unstable();
        Ok(rows)
    }

    /// Rows inside or on the ring of `polygon`.
    pub fn within_polygon(&self, polygon: &Polygon) -> Result<Vec<usize>> {
        check_polygon_query(polygon)?;

        let Some(bbox) = BoundingBox2D::of_polygon(polygon) else {
            return Ok(Vec::new());
        };
        let envelope = AABB::from_corners([bbox.min_x(), bbox.min_y()], [bbox.max_x(), bbox.max_y()]);
        let mut rows: Vec<usize> = self
            .tree
            .locate_in_envelope(&envelope)
            .filter(|r| polygon.covers(&Point::new(r.lon, r.lat)))
            .map(|r| r.row)
            .collect();
        rows.sort_unstable();
        Ok(rows)
    }
}

/// Degree envelope enclosing every point within `radius` of `center` on a
/// sphere of `earth_radius`.
///
/// The longitude half-width is the exact spherical bound; envelopes that
/// reach a pole or cross the antimeridian widen to all longitudes.
fn radius_envelope(center: &Point, radius: f64, earth_radius: f64) -> AABB<[f64; 2]> {
    let angular = radius / earth_radius;
    let lat = center.lat().to_radians();

    let min_lat = (lat - angular).to_degrees().max(-90.0);
    let max_lat = (lat + angular).to_degrees().min(90.0);

    let full = AABB::from_corners([-180.0, min_lat], [180.0, max_lat]);
    if angular >= FRAC_PI_2 || min_lat <= -90.0 || max_lat >= 90.0 {
        return full;
    }

    let ratio = angular.sin() / lat.cos();
    if ratio >= 1.0 {
        return full;
    }
    let lon_degrees = ratio.asin().to_degrees();
    let (min_lon, max_lon) = (center.lon() - lon_degrees, center.lon() + lon_degrees);
    if min_lon < -180.0 || max_lon > 180.0 {
        return full;
    }

    AABB::from_corners([min_lon, min_lat], [max_lon, max_lat])
}

/// Builds a [`RecordIndex`] per call, then prunes with envelope queries.
/// Fastest for polygon membership on large tables.
///
/// Boundary: rows at exactly `radius_meters` (on the sphere) are selected;
/// rows exactly on a polygon ring are selected too.
#[derive(Debug, Clone)]
pub struct IndexedFilter {
    columns: ColumnNames,
    earth_radius: f64,
}

impl IndexedFilter {
    pub fn new(columns: ColumnNames) -> Self {
        Self {
            columns,
            earth_radius: EARTH_MEAN_RADIUS_METERS,
        }
    }

    pub fn with_earth_radius(mut self, meters: f64) -> Self {
        assert!(
            meters.is_finite() && meters > 0.0,
            "Earth radius must be positive"
        );
        self.earth_radius = meters;
        self
    }

    /// Index `table` with this filter's columns and earth radius.
    pub fn index(&self, table: &GeoTable) -> Result<RecordIndex> {
        let start = Instant::now();
        let index = RecordIndex::build(table, &self.columns)?.with_earth_radius(self.earth_radius);
        log::debug!("indexed {} rows in {:?}", index.len(), start.elapsed());
        Ok(index)
    }
}

impl Default for IndexedFilter {
    fn default() -> Self {
        Self::new(ColumnNames::default())
    }
}

impl SpatialFilter for IndexedFilter {
    fn name(&self) -> &'static str {
        "indexed"
    }

    fn columns(&self) -> &ColumnNames {
        &self.columns
    }

    fn within_radius(
        &self,
        table: &GeoTable,
        center: &Point,
        radius_meters: f64,
    ) -> Result<GeoTable> {
        validate_radius_query(center, radius_meters)?;
        if table.is_empty() {
            return Ok(table.empty_like());
        }

        let rows = self.index(table)?.within_radius(center, radius_meters)?;
        log::debug!("indexed radius filter kept {}/{} rows", rows.len(), table.len());
        Ok(table.take(&rows))
    }

    fn within_polygon(&self, table: &GeoTable, polygon: &Polygon) -> Result<GeoTable> {
        check_polygon_query(polygon)?;
        if table.is_empty() {
            return Ok(table.empty_like());
        }

        let rows = self.index(table)?.within_polygon(polygon)?;
        log::debug!("indexed polygon filter kept {}/{} rows", rows.len(), table.len());
        Ok(table.take(&rows))
    }
}
