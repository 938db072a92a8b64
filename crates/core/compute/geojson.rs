//! GeoJSON conversion for areas of interest and sample sets.
//!
//! Only outer rings are honored. Interior rings (holes) are dropped on input.

use crate::compute::validation::validate_ring;
use crate::error::{GeocoverError, Result};
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};
use geocover_types::geo::{MultiPolygon, Point, Polygon};
use serde_json::Map;

/// Closes `points` into a polygon ring.
///
/// The ring may be given open or closed. Requires at least three distinct,
/// in-range vertices; self-intersection is not checked.
pub fn points_to_polygon(points: &[Point]) -> Result<Polygon> {
    validate_ring(points)?;
    let coords: Vec<geo::Coord> = points.iter().map(|p| p.inner().0).collect();
    Ok(Polygon::new(geo::LineString::from(coords)))
}

/// Exterior vertices in ring order, without the closing duplicate.
pub fn polygon_to_points(polygon: &Polygon) -> Vec<Point> {
    polygon.vertices().collect()
}

/// Parses a GeoJSON document into one or more polygons.
///
/// Accepted inputs are a `Polygon` or `MultiPolygon` geometry, or a
/// `FeatureCollection` holding exactly one `Polygon` feature.
///
/// # Examples
///
/// ```
/// use geocover::compute::geojson::parse_geojson;
///
/// let aoi = parse_geojson(
///     r#"{"type":"Polygon","coordinates":[[[105.8,21.0],[105.9,21.0],[105.9,21.1],[105.8,21.0]]]}"#,
/// )?;
/// assert_eq!(aoi.len(), 1);
/// assert_eq!(aoi.polygons()[0].vertex_count(), 3);
/// # Ok::<(), geocover::GeocoverError>(())
/// ```
pub fn parse_geojson(payload: &str) -> Result<MultiPolygon> {
    let geojson: GeoJson = payload
        .parse()
        .map_err(|e| GeocoverError::InvalidGeoJson(format!("Failed to parse GeoJSON: {}", e)))?;
    multipolygon_from(geojson)
}

/// [`parse_geojson`] for an already-decoded JSON value.
pub fn parse_geojson_value(value: serde_json::Value) -> Result<MultiPolygon> {
    let geojson = GeoJson::from_json_value(value)
        .map_err(|e| GeocoverError::InvalidGeoJson(format!("Failed to parse GeoJSON: {}", e)))?;
    multipolygon_from(geojson)
}

fn multipolygon_from(geojson: GeoJson) -> Result<MultiPolygon> {
    match geojson {
        GeoJson::Geometry(geometry) => match geometry.value {
            Value::Polygon(rings) => Ok(MultiPolygon::from(polygon_from_rings(&rings)?)),
            Value::MultiPolygon(polygons) => polygons
                .iter()
                .map(|rings| polygon_from_rings(rings))
                .collect::<Result<Vec<_>>>()
                .map(MultiPolygon::new),
            other => Err(unsupported(geometry_type(&other))),
        },
        GeoJson::FeatureCollection(collection) => {
            let count = collection.features.len();
            if count != 1 {
                return Err(GeocoverError::InvalidGeoJson(format!(
                    "FeatureCollection must contain exactly one feature, got {}",
                    count
                )));
            }
            let geometry = collection
                .features
                .into_iter()
                .next()
                .and_then(|feature| feature.geometry)
                .ok_or_else(|| {
                    GeocoverError::InvalidGeoJson("Feature has no geometry".to_string())
                })?;
            match geometry.value {
                Value::Polygon(rings) => Ok(MultiPolygon::from(polygon_from_rings(&rings)?)),
                other => Err(unsupported(&format!(
                    "FeatureCollection of {}",
                    geometry_type(&other)
                ))),
            }
        }
        GeoJson::Feature(_) => Err(unsupported("Feature")),
    }
}

fn polygon_from_rings(rings: &[Vec<Vec<f64>>]) -> Result<Polygon> {
    let exterior = rings.first().ok_or_else(|| {
        GeocoverError::InvalidGeoJson("Polygon must have at least one ring".to_string())
    })?;

    if rings.len() > 1 {
        log::debug!("Discarding {} interior ring(s)", rings.len() - 1);
    }

    let points = exterior
        .iter()
        .map(|position| {
            if position.len() < 2 {
                return Err(GeocoverError::InvalidGeoJson(
                    "Coordinate must have at least 2 values".to_string(),
                ));
            }
            Ok(Point::new(position[0], position[1]))
        })
        .collect::<Result<Vec<_>>>()?;

    points_to_polygon(&points)
}

fn unsupported(kind: &str) -> GeocoverError {
    GeocoverError::InvalidGeoJson(format!(
        "Unsupported GeoJSON type {}; expected Polygon, MultiPolygon or a single-Polygon FeatureCollection",
        kind
    ))
}

fn geometry_type(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}

/// Converts a Polygon's outer ring to a GeoJSON geometry string.
pub fn polygon_to_geojson(polygon: &Polygon) -> Result<String> {
    let ring: Vec<Vec<f64>> = polygon
        .exterior()
        .coords()
        .map(|coord| vec![coord.x, coord.y])
        .collect();
    let geom = Geometry::new(Value::Polygon(vec![ring]));

    Ok(serde_json::to_string(&geom)?)
}

/// Converts sample points to a GeoJSON FeatureCollection, one Point feature
/// per sample with its position in the input as the `index` property.
pub fn points_to_feature_collection(points: &[Point]) -> Result<String> {
    let features: Vec<Feature> = points
        .iter()
        .enumerate()
        .map(|(index, point)| {
            let mut props = Map::new();
            props.insert("index".to_string(), serde_json::Value::from(index));

            Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::Point(vec![point.x(), point.y()]))),
                id: None,
                properties: Some(props),
                foreign_members: None,
            }
        })
        .collect();

    let collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };

    Ok(serde_json::to_string(&collection)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RING: &str = "[[105.8,21.0],[105.9,21.0],[105.9,21.1],[105.8,21.1],[105.8,21.0]]";

    fn feature(ring: &str) -> String {
        format!(
            r#"{{"type":"Feature","properties":{{}},"geometry":{{"type":"Polygon","coordinates":[{}]}}}}"#,
            ring
        )
    }

    #[test]
    fn test_points_to_polygon_closes_ring() {
        let points = vec![
            Point::new(105.8, 21.0),
            Point::new(105.9, 21.0),
            Point::new(105.9, 21.1),
        ];
        let polygon = points_to_polygon(&points).unwrap();

        let ring = &polygon.exterior().0;
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.first(), ring.last());
        assert_eq!(polygon_to_points(&polygon), points);
    }

    #[test]
    fn test_points_to_polygon_rejects_degenerate_rings() {
        let a = Point::new(105.8, 21.0);
        let b = Point::new(105.9, 21.0);
        assert!(points_to_polygon(&[a, b]).is_err());
        assert!(points_to_polygon(&[a, b, a]).is_err());
        assert!(points_to_polygon(&[a, b, Point::new(105.9, 95.0)]).is_err());
    }

    #[test]
    fn test_parse_polygon_drops_holes() {
        let json = format!(
            r#"{{"type":"Polygon","coordinates":[{},[[105.84,21.04],[105.86,21.04],[105.86,21.06],[105.84,21.04]]]}}"#,
            RING
        );
        let aoi = parse_geojson(&json).unwrap();
        assert_eq!(aoi.len(), 1);
        assert!(aoi.polygons()[0].inner().interiors().is_empty());
        assert_eq!(aoi.polygons()[0].vertex_count(), 4);
    }

    #[test]
    fn test_parse_multipolygon_keeps_order() {
        let json = r#"{"type":"MultiPolygon","coordinates":[
            [[[105.8,21.0],[105.9,21.0],[105.9,21.1],[105.8,21.0]]],
            [[[106.0,20.0],[106.1,20.0],[106.1,20.1],[106.0,20.1]]]
        ]}"#;
        let aoi = parse_geojson(json).unwrap();
        assert_eq!(aoi.len(), 2);
        assert_eq!(aoi.polygons()[0].vertex_count(), 3);
        assert_eq!(aoi.polygons()[1].vertices().next(), Some(Point::new(106.0, 20.0)));
    }

    #[test]
    fn test_feature_collection_with_one_polygon_roundtrips_ring() {
        let json = format!(
            r#"{{"type":"FeatureCollection","features":[{}]}}"#,
            feature(RING)
        );
        let aoi = parse_geojson(&json).unwrap();
        assert_eq!(aoi.len(), 1);

        let expected = vec![
            Point::new(105.8, 21.0),
            Point::new(105.9, 21.0),
            Point::new(105.9, 21.1),
            Point::new(105.8, 21.1),
        ];
        assert_eq!(polygon_to_points(&aoi.polygons()[0]), expected);
    }

    #[test]
    fn test_feature_collection_must_have_exactly_one_feature() {
        let two = format!(
            r#"{{"type":"FeatureCollection","features":[{},{}]}}"#,
            feature(RING),
            feature(RING)
        );
        assert!(matches!(
            parse_geojson(&two),
            Err(GeocoverError::InvalidGeoJson(_))
        ));

        let none = r#"{"type":"FeatureCollection","features":[]}"#;
        assert!(parse_geojson(none).is_err());
    }

    #[test]
    fn test_unsupported_inputs() {
        assert!(parse_geojson("not valid json").is_err());
        assert!(parse_geojson(r#"{"type":"Point","coordinates":[105.8,21.0]}"#).is_err());
        assert!(parse_geojson(r#"{"coordinates":[]}"#).is_err());
        assert!(parse_geojson(&feature(RING)).is_err());

        let err = parse_geojson(r#"{"type":"LineString","coordinates":[[0.0,0.0],[1.0,1.0]]}"#)
            .unwrap_err()
            .to_string();
        assert!(err.contains("LineString"), "{}", err);
    }

    #[test]
    fn test_parse_value() {
        let value = serde_json::json!({
            "type": "Polygon",
            "coordinates": [[[105.8, 21.0], [105.9, 21.0], [105.9, 21.1]]]
        });
        let aoi = parse_geojson_value(value).unwrap();
        assert_eq!(aoi.polygons()[0].vertex_count(), 3);
    }

    #[test]
    fn test_polygon_to_geojson_roundtrip() {
        let polygon = Polygon::from_coords(&[(105.8, 21.0), (105.9, 21.0), (105.9, 21.1)]);
        let json = polygon_to_geojson(&polygon).unwrap();
        assert!(json.contains("Polygon"));

        let parsed = parse_geojson(&json).unwrap();
        assert_eq!(parsed.polygons()[0], polygon);
    }

    #[test]
    fn test_points_to_feature_collection() {
        let points = vec![Point::new(105.8, 21.0), Point::new(105.9, 21.1)];
        let json = points_to_feature_collection(&points).unwrap();

        let parsed: GeoJson = json.parse().unwrap();
        match parsed {
            GeoJson::FeatureCollection(fc) => {
                assert_eq!(fc.features.len(), 2);
                assert_eq!(
                    fc.features[1].property("index"),
                    Some(&serde_json::json!(1))
                );
            }
            _ => panic!("expected a FeatureCollection"),
        }
    }
}
