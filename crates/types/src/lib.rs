//! # geocover-types
//!
//! Data types shared by the geocover sampling and filtering engine.
//!
//! - **Geometry**: [`Point`](geo::Point), [`Polygon`](geo::Polygon),
//!   [`MultiPolygon`](geo::MultiPolygon), all thin wrappers over the `geo` crate
//! - **Bounding boxes**: [`BoundingBox2D`](bbox::BoundingBox2D), derived on demand
//! - **Records**: [`GeoTable`](table::GeoTable), rows of JSON cells with a
//!   latitude and longitude column
//!
//! ## Examples
//!
//! ```rust
//! use geocover_types::bbox::BoundingBox2D;
//! use geocover_types::geo::{Point, Polygon};
//!
//! let old_quarter = Polygon::from_coords(&[
//!     (105.8417, 21.0207),
//!     (105.8640, 21.0196),
//!     (105.8575, 21.0424),
//!     (105.8463, 21.0396),
//! ]);
//! let bbox = BoundingBox2D::of_polygon(&old_quarter).unwrap();
//! assert!(bbox.contains_point(&Point::from_lat_lon(21.03, 105.85)));
//! ```

pub mod bbox;
pub mod config;
pub mod geo;
pub mod table;
