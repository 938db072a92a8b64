//! Regular n-gon approximations of geodesic circles.

use crate::compute::geojson::points_to_polygon;
use crate::compute::spatial::algorithms::destination;
use crate::compute::validation::{validate_geographic_point, validate_radius, validate_vertex_count};
use crate::error::Result;
use geocover_types::geo::{Point, Polygon};

/// Vertices of an n-gon around `center`, each at geodesic distance
/// `radius_meters`, starting due north and stepping `360/n` degrees clockwise.
pub fn circle_points(center: &Point, radius_meters: f64, n_vertices: usize) -> Result<Vec<Point>> {
    validate_geographic_point(center)?;
    validate_radius(radius_meters)?;
    validate_vertex_count(n_vertices)?;

    (0..n_vertices)
        .map(|i| {
            let bearing = 360.0 * i as f64 / n_vertices as f64;
            destination(center, bearing, radius_meters)
        })
        .collect()
}

/// Polygon approximating the circle of `radius_meters` around `center`.
///
/// More vertices hug the true circle more tightly; the inscribed polygon
/// always lies inside it.
///
/// # Examples
///
/// ```
/// use geocover::compute::spatial::circle;
/// use geocover::compute::geojson::polygon_to_points;
/// use geocover::Point;
///
/// let center = Point::from_lat_lon(21.025206, 105.848712);
/// let ring = circle(&center, 2000.0, 15)?;
/// assert_eq!(polygon_to_points(&ring).len(), 15);
/// assert!(ring.contains(&center));
/// # Ok::<(), geocover::GeocoverError>(())
/// ```
pub fn circle(center: &Point, radius_meters: f64, n_vertices: usize) -> Result<Polygon> {
    let vertices = circle_points(center, radius_meters, n_vertices)?;
    points_to_polygon(&vertices)
}
