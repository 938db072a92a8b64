use crate::geo::{Point, Polygon};
use geo::Rect;
use serde::{Deserialize, Serialize};

/// A 2D axis-aligned bounding box in longitude/latitude degrees.
///
/// Never stored alongside a polygon; computed on demand from its vertices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox2D {
    /// The underlying geometric rectangle
    pub rect: Rect,
}

impl BoundingBox2D {
    /// Create a new bounding box from minimum and maximum coordinates.
    ///
    /// # Examples
    ///
    /// ```
    /// use geocover_types::bbox::BoundingBox2D;
    ///
    /// let bbox = BoundingBox2D::new(105.8, 21.0, 105.9, 21.1);
    /// assert!((bbox.width() - 0.1).abs() < 1e-12);
    /// ```
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            rect: Rect::new(
                geo::coord! { x: min_x, y: min_y },
                geo::coord! { x: max_x, y: max_y },
            ),
        }
    }

    pub fn from_rect(rect: Rect) -> Self {
        Self { rect }
    }

    /// Bounding box of a polygon's outer ring. `None` for an empty ring.
    pub fn of_polygon(polygon: &Polygon) -> Option<Self> {
        use geo::BoundingRect;
        polygon.exterior().bounding_rect().map(Self::from_rect)
    }

    /// Longitude of the western edge.
    pub fn min_x(&self) -> f64 {
        self.rect.min().x
    }

    /// Latitude of the southern edge.
    pub fn min_y(&self) -> f64 {
        self.rect.min().y
    }

    /// Longitude of the eastern edge.
    pub fn max_x(&self) -> f64 {
        self.rect.max().x
    }

    /// Latitude of the northern edge.
    pub fn max_y(&self) -> f64 {
        self.rect.max().y
    }

    /// South-west corner, the origin of sampling lattices.
    pub fn south_west(&self) -> Point {
        Point::new(self.min_x(), self.min_y())
    }

    /// Longitude extent in degrees.
    pub fn width(&self) -> f64 {
        self.max_x() - self.min_x()
    }

    /// Latitude extent in degrees.
    pub fn height(&self) -> f64 {
        self.max_y() - self.min_y()
    }

    /// True when the box has no area (a point or a line).
    pub fn is_degenerate(&self) -> bool {
        !(self.width() > 0.0 && self.height() > 0.0)
    }

    /// Inclusive containment test.
    pub fn contains_point(&self, point: &Point) -> bool {
        point.x() >= self.min_x()
            && point.x() <= self.max_x()
            && point.y() >= self.min_y()
            && point.y() <= self.max_y()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox2d_dimensions() {
        let bbox = BoundingBox2D::new(105.8, 21.0, 105.9, 21.2);
        assert!((bbox.width() - 0.1).abs() < 1e-12);
        assert!((bbox.height() - 0.2).abs() < 1e-12);
        assert_eq!(bbox.south_west(), Point::new(105.8, 21.0));
    }

    #[test]
    fn test_bbox_of_polygon() {
        let polygon = Polygon::from_coords(&[
            (105.86402, 21.019655),
            (105.84170, 21.020777),
            (105.84630, 21.039603),
            (105.85754, 21.042487),
        ]);
        let bbox = BoundingBox2D::of_polygon(&polygon).unwrap();
        assert_eq!(
            (bbox.min_x(), bbox.min_y(), bbox.max_x(), bbox.max_y()),
            (105.84170, 21.019655, 105.86402, 21.042487)
        );
    }

    #[test]
    fn test_bbox_degenerate() {
        assert!(BoundingBox2D::new(105.8, 21.0, 105.8, 21.1).is_degenerate());
        assert!(BoundingBox2D::new(105.8, 21.0, 105.9, 21.0).is_degenerate());
        assert!(!BoundingBox2D::new(105.8, 21.0, 105.9, 21.1).is_degenerate());
    }

    #[test]
    fn test_bbox2d_contains() {
        let bbox = BoundingBox2D::new(105.8, 21.0, 105.9, 21.1);
        assert!(bbox.contains_point(&Point::new(105.85, 21.05)));
        assert!(bbox.contains_point(&Point::new(105.8, 21.0)));
        assert!(!bbox.contains_point(&Point::new(106.0, 21.05)));
    }
}
