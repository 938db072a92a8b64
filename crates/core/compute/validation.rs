//! Validation for geographic coordinates and sampling parameters.
//!
//! Every public operation validates its inputs here before producing any
//! output, so a call either fully succeeds or fails without partial results.

use crate::error::{GeocoverError, Result};
use geocover_types::geo::{Point, Polygon};
use rustc_hash::FxHashSet;

const EARTH_CIRCUMFERENCE: f64 = 40_075_000.0; // meters

/// Smallest polygon the sampler and circle builder accept.
pub const MIN_POLYGON_VERTICES: usize = 3;

/// Validates a 2D point has valid longitude and latitude.
///
/// Longitude: [-180.0, 180.0], Latitude: [-90.0, 90.0]
///
/// # Examples
///
/// ```
/// use geocover::compute::validation::validate_geographic_point;
/// use geocover::Point;
///
/// assert!(validate_geographic_point(&Point::from_lat_lon(21.02, 105.85)).is_ok());
/// assert!(validate_geographic_point(&Point::new(200.0, 21.0)).is_err());
/// assert!(validate_geographic_point(&Point::new(105.85, 95.0)).is_err());
/// ```
pub fn validate_geographic_point(point: &Point) -> Result<()> {
    let (x, y) = (point.x(), point.y());

    if !x.is_finite() {
        return Err(GeocoverError::InvalidInput(format!(
            "Longitude must be finite, got: {}",
            x
        )));
    }

    if !y.is_finite() {
        return Err(GeocoverError::InvalidInput(format!(
            "Latitude must be finite, got: {}",
            y
        )));
    }

    if !(-180.0..=180.0).contains(&x) {
        return Err(GeocoverError::InvalidInput(format!(
            "Longitude out of range [-180.0, 180.0]: {}",
            x
        )));
    }

    if !(-90.0..=90.0).contains(&y) {
        return Err(GeocoverError::InvalidInput(format!(
            "Latitude out of range [-90.0, 90.0]: {}",
            y
        )));
    }

    Ok(())
}

/// Validates multiple points, reporting the first bad index.
pub fn validate_points(points: &[Point]) -> Result<()> {
    for (idx, point) in points.iter().enumerate() {
        validate_geographic_point(point)
            .map_err(|e| GeocoverError::InvalidInput(format!("Point at index {}: {}", idx, e)))?;
    }
    Ok(())
}

/// Number of distinct positions among `points`.
pub fn distinct_vertex_count<'a>(points: impl IntoIterator<Item = &'a Point>) -> usize {
    points
        .into_iter()
        // +0.0 folds -0.0 into 0.0 so both hash alike
        .map(|p| ((p.x() + 0.0).to_bits(), (p.y() + 0.0).to_bits()))
        .collect::<FxHashSet<_>>()
        .len()
}

/// Validates a ring given as vertices: coordinates in range and at least
/// three distinct positions.
pub fn validate_ring(points: &[Point]) -> Result<()> {
    validate_points(points)
        .map_err(|e| GeocoverError::InvalidGeometry(format!("Ring vertex invalid: {}", e)))?;

    let distinct = distinct_vertex_count(points);
    if distinct < MIN_POLYGON_VERTICES {
        return Err(GeocoverError::InvalidGeometry(format!(
            "Polygon needs at least {} distinct vertices, got {}",
            MIN_POLYGON_VERTICES, distinct
        )));
    }
    Ok(())
}

/// Validates a polygon's outer ring. Interior rings are ignored.
///
/// # Examples
///
/// ```
/// use geocover::compute::validation::validate_polygon;
/// use geocover::Polygon;
///
/// let square = Polygon::from_coords(&[(105.8, 21.0), (105.9, 21.0), (105.9, 21.1), (105.8, 21.1)]);
/// assert!(validate_polygon(&square).is_ok());
///
/// let sliver = Polygon::from_coords(&[(105.8, 21.0), (105.9, 21.0), (105.8, 21.0)]);
/// assert!(validate_polygon(&sliver).is_err());
/// ```
pub fn validate_polygon(polygon: &Polygon) -> Result<()> {
    let vertices: Vec<Point> = polygon.vertices().collect();
    validate_ring(&vertices)
}

/// Validates a radius for circle construction and radius queries.
///
/// Ensures radius is positive, finite, and not exceeding Earth's circumference.
///
/// # Examples
///
/// ```
/// use geocover::compute::validation::validate_radius;
///
/// assert!(validate_radius(2000.0).is_ok());
/// assert!(validate_radius(0.0).is_err());
/// assert!(validate_radius(-100.0).is_err());
/// assert!(validate_radius(f64::NAN).is_err());
/// ```
pub fn validate_radius(radius: f64) -> Result<()> {
    validate_length("Radius", radius)
}

/// Validates the distance between neighbouring sample points.
pub fn validate_spacing(spacing: f64) -> Result<()> {
    validate_length("Spacing", spacing)
}

fn validate_length(what: &str, meters: f64) -> Result<()> {
    if !meters.is_finite() {
        return Err(GeocoverError::InvalidInput(format!(
            "{} must be finite, got: {}",
            what, meters
        )));
    }
    if meters <= 0.0 {
        return Err(GeocoverError::InvalidInput(format!(
            "{} must be positive, got: {}",
            what, meters
        )));
    }
    if meters > EARTH_CIRCUMFERENCE {
        return Err(GeocoverError::InvalidInput(format!(
            "{} {} exceeds Earth's circumference ({} meters)",
            what, meters, EARTH_CIRCUMFERENCE
        )));
    }
    Ok(())
}

/// Validates a bearing in degrees. Any finite value is accepted; bearings
/// wrap modulo 360.
pub fn validate_bearing(bearing: f64) -> Result<()> {
    if !bearing.is_finite() {
        return Err(GeocoverError::InvalidInput(format!(
            "Bearing must be finite, got: {}",
            bearing
        )));
    }
    Ok(())
}

/// Validates the vertex count of a circle approximation.
pub fn validate_vertex_count(n_vertices: usize) -> Result<()> {
    if n_vertices < MIN_POLYGON_VERTICES {
        return Err(GeocoverError::InvalidInput(format!(
            "A circle needs at least {} vertices, got {}",
            MIN_POLYGON_VERTICES, n_vertices
        )));
    }
    Ok(())
}
