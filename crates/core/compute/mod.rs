//! Geodesic primitives, GeoJSON conversion, grid sampling, spatial filtering
//! and validation.

pub mod filter;
pub mod geojson;
pub mod links;
pub mod spatial;
pub mod validation;
