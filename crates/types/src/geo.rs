//! Wrapped geometric types from the `geo` crate.
//!
//! Coordinates follow the `geo` convention: `x` is longitude, `y` is latitude,
//! both in decimal degrees on the WGS84 datum.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Distance metric for spatial calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    Haversine,
    #[default]
    Geodesic,
    Rhumb,
    Euclidean,
}

/// A geographic point with longitude/latitude coordinates.
///
/// # Examples
///
/// ```
/// use geocover_types::geo::Point;
///
/// let hoan_kiem = Point::new(105.8527, 21.0288);
/// assert_eq!(hoan_kiem.lon(), 105.8527);
/// assert_eq!(hoan_kiem.lat(), 21.0288);
///
/// let same = Point::from_lat_lon(21.0288, 105.8527);
/// assert_eq!(hoan_kiem, same);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    inner: geo::Point<f64>,
}

impl Point {
    /// Create a new point from x (longitude) and y (latitude) coordinates.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            inner: geo::Point::new(x, y),
        }
    }

    /// Create a point from latitude first, the order map links and crawler
    /// queries use.
    #[inline]
    pub fn from_lat_lon(lat: f64, lon: f64) -> Self {
        Self::new(lon, lat)
    }

    /// Get the x coordinate (longitude).
    #[inline]
    pub fn x(&self) -> f64 {
        self.inner.x()
    }

    /// Get the y coordinate (latitude).
    #[inline]
    pub fn y(&self) -> f64 {
        self.inner.y()
    }

    #[inline]
    pub fn lon(&self) -> f64 {
        self.x()
    }

    #[inline]
    pub fn lat(&self) -> f64 {
        self.y()
    }

    /// Access the inner `geo::Point`.
    #[inline]
    pub fn inner(&self) -> &geo::Point<f64> {
        &self.inner
    }

    #[inline]
    pub fn into_inner(self) -> geo::Point<f64> {
        self.inner
    }

    /// `(lat, lon)` tuple.
    #[inline]
    pub fn to_lat_lon(&self) -> (f64, f64) {
        (self.lat(), self.lon())
    }
}

/// Renders as `"lat,lon"`, the form search engines accept as a query center.
impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat(), self.lon())
    }
}

impl From<geo::Point<f64>> for Point {
    fn from(point: geo::Point<f64>) -> Self {
        Self { inner: point }
    }
}

impl From<Point> for geo::Point<f64> {
    fn from(point: Point) -> Self {
        point.inner
    }
}

impl From<geo::Coord<f64>> for Point {
    fn from(coord: geo::Coord<f64>) -> Self {
        Self::new(coord.x, coord.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<Point> for (f64, f64) {
    fn from(point: Point) -> Self {
        (point.x(), point.y())
    }
}

/// A polygon described by its outer ring.
///
/// Interior rings are never produced by this crate; a `geo::Polygon` converted
/// in with holes keeps them in `inner()` but every operation here reads the
/// exterior only.
///
/// # Examples
///
/// ```
/// use geocover_types::geo::{Point, Polygon};
///
/// let square = Polygon::from_coords(&[
///     (105.8, 21.0),
///     (105.9, 21.0),
///     (105.9, 21.1),
///     (105.8, 21.1),
/// ]);
/// assert_eq!(square.vertex_count(), 4);
/// assert!(square.contains(&Point::new(105.85, 21.05)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    inner: geo::Polygon<f64>,
}

impl Polygon {
    /// Create a polygon from an exterior ring. `geo` closes the ring if the
    /// last coordinate does not repeat the first.
    pub fn new(exterior: geo::LineString<f64>) -> Self {
        Self {
            inner: geo::Polygon::new(exterior, Vec::new()),
        }
    }

    /// Create a polygon from `(lon, lat)` pairs. The ring may be open or closed.
    pub fn from_coords(exterior: &[(f64, f64)]) -> Self {
        let coords: Vec<geo::Coord> = exterior.iter().map(|&(x, y)| geo::Coord { x, y }).collect();
        Self::new(geo::LineString::from(coords))
    }

    /// Get a reference to the exterior ring (closed).
    #[inline]
    pub fn exterior(&self) -> &geo::LineString<f64> {
        self.inner.exterior()
    }

    /// Ring vertices without the closing duplicate.
    pub fn vertices(&self) -> impl Iterator<Item = Point> + '_ {
        let coords = &self.exterior().0;
        let open_len = if coords.len() > 1 && coords.first() == coords.last() {
            coords.len() - 1
        } else {
            coords.len()
        };
        coords[..open_len].iter().map(|c| Point::from(*c))
    }

    /// Number of distinct ring positions (closing vertex not counted).
    pub fn vertex_count(&self) -> usize {
        self.vertices().count()
    }

    #[inline]
    pub fn inner(&self) -> &geo::Polygon<f64> {
        &self.inner
    }

    #[inline]
    pub fn into_inner(self) -> geo::Polygon<f64> {
        self.inner
    }

    /// Strict containment: points on the ring are not contained.
    #[inline]
    pub fn contains(&self, point: &Point) -> bool {
        use geo::Contains;
        self.inner.contains(&point.inner)
    }

    /// Containment including the ring itself.
    #[inline]
    pub fn covers(&self, point: &Point) -> bool {
        use geo::Intersects;
        self.inner.intersects(&point.inner)
    }
}

impl From<geo::Polygon<f64>> for Polygon {
    fn from(polygon: geo::Polygon<f64>) -> Self {
        Self { inner: polygon }
    }
}

impl From<Polygon> for geo::Polygon<f64> {
    fn from(polygon: Polygon) -> Self {
        polygon.inner
    }
}

/// An ordered list of polygons, e.g. the districts of one province.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MultiPolygon {
    polygons: Vec<Polygon>,
}

impl MultiPolygon {
    pub fn new(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    #[inline]
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    #[inline]
    pub fn into_polygons(self) -> Vec<Polygon> {
        self.polygons
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Polygon> {
        self.polygons.iter()
    }
}

impl From<Polygon> for MultiPolygon {
    fn from(polygon: Polygon) -> Self {
        Self::new(vec![polygon])
    }
}

impl From<Vec<Polygon>> for MultiPolygon {
    fn from(polygons: Vec<Polygon>) -> Self {
        Self::new(polygons)
    }
}

impl IntoIterator for MultiPolygon {
    type Item = Polygon;
    type IntoIter = std::vec::IntoIter<Polygon>;

    fn into_iter(self) -> Self::IntoIter {
        self.polygons.into_iter()
    }
}

impl<'a> IntoIterator for &'a MultiPolygon {
    type Item = &'a Polygon;
    type IntoIter = std::slice::Iter<'a, Polygon>;

    fn into_iter(self) -> Self::IntoIter {
        self.polygons.iter()
    }
}
