//! Geodesic primitives on the WGS84 ellipsoid, via the `geo` crate.
//!
//! `geo::Geodesic` implements Karney's algorithms, so distances and
//! destinations are accurate to nanometres at the scales sampled here
//! (hundreds of meters to tens of kilometers).

use crate::compute::validation::{
    validate_bearing, validate_geographic_point, validate_spacing,
};
use crate::error::{GeocoverError, Result};
use geo::{Destination, Distance, Euclidean, Geodesic, Haversine, Rhumb};
use geocover_types::geo::Point;

/// Distance metric for spatial calculations.
pub use geocover_types::geo::DistanceMetric;

/// Ellipsoidal geodesic distance between two points, in meters.
///
/// # Examples
///
/// ```
/// use geocover::compute::spatial::distance;
/// use geocover::Point;
///
/// let hoan_kiem = Point::from_lat_lon(21.025206, 105.848712);
/// assert_eq!(distance(&hoan_kiem, &hoan_kiem)?, 0.0);
///
/// let nearby = Point::from_lat_lon(21.0253751, 105.8512529);
/// let meters = distance(&hoan_kiem, &nearby)?;
/// assert!(meters > 250.0 && meters < 270.0);
/// # Ok::<(), geocover::GeocoverError>(())
/// ```
pub fn distance(p1: &Point, p2: &Point) -> Result<f64> {
    validate_geographic_point(p1)?;
    validate_geographic_point(p2)?;

    if p1 == p2 {
        return Ok(0.0);
    }

    let meters = Geodesic.distance(*p1.inner(), *p2.inner());
    if !meters.is_finite() {
        return Err(GeocoverError::Geodesic(format!(
            "Distance between {} and {} is not finite",
            p1, p2
        )));
    }
    Ok(meters)
}

/// [`distance`] in kilometers.
pub fn distance_km(p1: &Point, p2: &Point) -> Result<f64> {
    distance(p1, p2).map(|m| m / 1000.0)
}

/// Distance between two points in meters under the chosen metric.
///
/// No validation; callers that need it use [`distance`].
pub fn distance_between(point1: &Point, point2: &Point, metric: DistanceMetric) -> f64 {
    match metric {
        DistanceMetric::Haversine => Haversine.distance(*point1.inner(), *point2.inner()),
        DistanceMetric::Geodesic => Geodesic.distance(*point1.inner(), *point2.inner()),
        DistanceMetric::Rhumb => Rhumb.distance(*point1.inner(), *point2.inner()),
        DistanceMetric::Euclidean => Euclidean.distance(*point1.inner(), *point2.inner()),
    }
}

/// Great-circle distance on a sphere of `earth_radius` meters.
#[inline]
pub fn haversine_distance(p1: &Point, p2: &Point, earth_radius: f64) -> f64 {
    let (lat1, lat2) = (p1.lat().to_radians(), p2.lat().to_radians());
    let dlat = lat2 - lat1;
    let dlon = (p2.lon() - p1.lon()).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * earth_radius * a.clamp(0.0, 1.0).sqrt().asin()
}

/// Point reached by travelling `distance_meters` from `origin` along the
/// initial bearing (degrees clockwise from north) on the ellipsoid.
///
/// # Examples
///
/// ```
/// use geocover::compute::spatial::{destination, distance};
/// use geocover::Point;
///
/// let origin = Point::from_lat_lon(21.0, 105.8);
/// let north = destination(&origin, 0.0, 1000.0)?;
/// assert!(north.lat() > origin.lat());
/// assert!((distance(&origin, &north)? - 1000.0).abs() < 1e-6);
/// # Ok::<(), geocover::GeocoverError>(())
/// ```
pub fn destination(origin: &Point, bearing_degrees: f64, distance_meters: f64) -> Result<Point> {
    validate_geographic_point(origin)?;
    validate_bearing(bearing_degrees)?;
    if !distance_meters.is_finite() || distance_meters < 0.0 {
        return Err(GeocoverError::InvalidInput(format!(
            "Distance must be finite and non-negative, got: {}",
            distance_meters
        )));
    }

    let reached = Geodesic.destination(*origin.inner(), bearing_degrees, distance_meters);
    if !(reached.x().is_finite() && reached.y().is_finite()) {
        return Err(GeocoverError::Geodesic(format!(
            "Destination from {} at bearing {} for {} m is not finite",
            origin, bearing_degrees, distance_meters
        )));
    }
    Ok(Point::from(reached))
}

/// Latitude and longitude deltas, in degrees, covered by `spacing_meters`
/// heading north and east from `origin`.
///
/// This is a local linearization: the deltas are exact at `origin` and drift
/// slowly with latitude, which is acceptable for areas that are small relative
/// to the Earth.
///
/// Fails when either step is not positive, which happens when the spacing
/// carries the probe over a pole or across the antimeridian.
pub fn degree_steps(origin: &Point, spacing_meters: f64) -> Result<(f64, f64)> {
    validate_spacing(spacing_meters)?;

    let north = destination(origin, 0.0, spacing_meters)?;
    let east = destination(origin, 90.0, spacing_meters)?;

    let lat_step = north.lat() - origin.lat();
    let lon_step = east.lon() - origin.lon();

    if !(lat_step > 0.0 && lon_step > 0.0) {
        return Err(GeocoverError::Geodesic(format!(
            "Spacing of {} m from {} does not give positive degree steps (lat {}, lon {})",
            spacing_meters, origin, lat_step, lon_step
        )));
    }
    Ok((lat_step, lon_step))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EARTH_MEAN_RADIUS_METERS;

    #[test]
    fn test_distance_between_metrics() {
        let hanoi = Point::from_lat_lon(21.0288, 105.8527);
        let saigon = Point::from_lat_lon(10.7769, 106.7009);

        let dist_haversine = distance_between(&hanoi, &saigon, DistanceMetric::Haversine);
        let dist_geodesic = distance_between(&hanoi, &saigon, DistanceMetric::Geodesic);

        assert!(dist_haversine > 1_100_000.0 && dist_haversine < 1_200_000.0);
        assert!(dist_geodesic > 1_100_000.0 && dist_geodesic < 1_200_000.0);
        assert!((dist_haversine - dist_geodesic).abs() < 10_000.0);
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        for point in [
            Point::from_lat_lon(21.02, 105.85),
            Point::new(0.0, 0.0),
            Point::new(180.0, 90.0),
        ] {
            assert_eq!(distance(&point, &point).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Point::from_lat_lon(21.0, 105.8);
        let b = Point::from_lat_lon(21.1, 105.9);
        let ab = distance(&a, &b).unwrap();
        let ba = distance(&b, &a).unwrap();
        assert!((ab - ba).abs() < 1e-6);
        assert!((distance_km(&a, &b).unwrap() - ab / 1000.0).abs() < 1e-12);
    }

    #[test]
    fn test_distance_rejects_bad_points() {
        let good = Point::from_lat_lon(21.0, 105.8);
        assert!(distance(&good, &Point::new(f64::NAN, 0.0)).is_err());
        assert!(distance(&Point::new(0.0, 91.0), &good).is_err());
    }

    #[test]
    fn test_destination_roundtrips_distance() {
        let origin = Point::from_lat_lon(21.02, 105.85);
        for bearing in [0.0, 45.0, 90.0, 180.0, 270.0, 359.0] {
            let reached = destination(&origin, bearing, 2000.0).unwrap();
            let back = distance(&origin, &reached).unwrap();
            assert!((back - 2000.0).abs() < 1e-6, "bearing {}: {}", bearing, back);
        }
    }

    #[test]
    fn test_destination_directions() {
        let origin = Point::from_lat_lon(21.0, 105.8);
        let east = destination(&origin, 90.0, 5000.0).unwrap();
        let south = destination(&origin, 180.0, 5000.0).unwrap();

        assert!(east.lon() > origin.lon());
        assert!((east.lat() - origin.lat()).abs() < 1e-3);
        assert!(south.lat() < origin.lat());
        assert!((south.lon() - origin.lon()).abs() < 1e-9);
    }

    #[test]
    fn test_destination_rejects_bad_input() {
        let origin = Point::from_lat_lon(21.0, 105.8);
        assert!(destination(&origin, f64::NAN, 100.0).is_err());
        assert!(destination(&origin, 0.0, -1.0).is_err());
        assert!(destination(&origin, 0.0, f64::INFINITY).is_err());
        assert!(destination(&Point::new(181.0, 0.0), 0.0, 1.0).is_err());
    }

    #[test]
    fn test_degree_steps_reflect_latitude() {
        let equator = degree_steps(&Point::new(105.8, 0.0), 5000.0).unwrap();
        let hanoi = degree_steps(&Point::new(105.8, 21.0), 5000.0).unwrap();

        // ~0.045 degrees of latitude for 5 km
        assert!(hanoi.0 > 0.044 && hanoi.0 < 0.046);
        // longitude degrees widen away from the equator
        assert!(hanoi.1 > equator.1);
        assert!((equator.0 - equator.1).abs() < 1e-3);
    }

    #[test]
    fn test_degree_steps_fail_over_the_pole() {
        assert!(degree_steps(&Point::new(105.8, 89.99), 5000.0).is_err());
        assert!(degree_steps(&Point::new(105.8, 21.0), 0.0).is_err());
    }

    #[test]
    fn test_haversine_matches_geo() {
        let a = Point::from_lat_lon(21.0288, 105.8527);
        let b = Point::from_lat_lon(21.0368, 105.8342);
        let ours = haversine_distance(&a, &b, EARTH_MEAN_RADIUS_METERS);
        let theirs = distance_between(&a, &b, DistanceMetric::Haversine);
        assert!((ours - theirs).abs() < 1e-2);
    }
}
