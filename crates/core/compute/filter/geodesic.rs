//! Row-wise exact filtering.

use super::{SpatialFilter, check_polygon_query, row_points, select, validate_radius_query};
use crate::error::Result;
use geo::{Distance, Geodesic};
use geocover_types::config::ColumnNames;
use geocover_types::geo::{Point, Polygon};
use geocover_types::table::GeoTable;
use rayon::prelude::*;
use std::time::Instant;

/// Evaluates every row with the ellipsoidal geodesic distance or an exact
/// point-in-polygon test. The most accurate strategy and the slowest.
///
/// Boundary: rows at exactly `radius_meters` are selected; rows exactly on a
/// polygon ring are not.
///
/// # Examples
///
/// ```
/// use geocover::compute::filter::{GeodesicFilter, SpatialFilter};
/// use geocover::{GeoTable, Point};
/// use serde_json::json;
///
/// let table = GeoTable::with_rows(
///     vec!["latitude".into(), "longitude".into()],
///     vec![vec![json!(21.0285), json!(105.8520)], vec![json!(21.2187), json!(105.8042)]],
/// )?;
/// let near = GeodesicFilter::default().within_radius(&table, &Point::from_lat_lon(21.03, 105.85), 2000.0)?;
/// assert_eq!(near.len(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct GeodesicFilter {
    columns: ColumnNames,
    parallel: bool,
}

impl GeodesicFilter {
    pub fn new(columns: ColumnNames) -> Self {
        Self {
            columns,
            parallel: true,
        }
    }

    /// Evaluate rows on the rayon thread pool (the default).
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    fn mask<F>(&self, points: &[Point], keep: F) -> Vec<bool>
    where
        F: Fn(&Point) -> bool + Sync + Send,
    {
        if self.parallel {
            points.par_iter().map(keep).collect()
        } else {
            points.iter().map(keep).collect()
        }
    }
}

impl Default for GeodesicFilter {
    fn default() -> Self {
        Self::new(ColumnNames::default())
    }
}

impl SpatialFilter for GeodesicFilter {
    fn name(&self) -> &'static str {
        "geodesic"
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

        let start = Instant::now();
        let points = row_points(table, &self.columns)?;
        let origin = *center.inner();
        let mask = self.mask(&points, |p| {
            Geodesic.distance(origin, *p.inner()) <= radius_meters
        });
        let selected = select(table, &mask);

        log::debug!(
            "geodesic radius filter kept {}/{} rows in {:?}",
            selected.len(),
            table.len(),
            start.elapsed()
        );
        Ok(selected)
    }

    fn within_polygon(&self, table: &GeoTable, polygon: &Polygon) -> Result<GeoTable> {
        check_polygon_query(polygon)?;
        if table.is_empty() {
            return Ok(table.empty_like());
        }

        let start = Instant::now();
        let points = row_points(table, &self.columns)?;
        let mask = self.mask(&points, |p| polygon.contains(p));
        let selected = select(table, &mask);

        log::debug!(
            "geodesic polygon filter kept {}/{} rows in {:?}",
            selected.len(),
            table.len(),
            start.elapsed()
        );
        Ok(selected)
    }
}
