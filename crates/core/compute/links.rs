//! Coordinates embedded in map links.
//!
//! Scraped place records carry a map URL such as
//! `https://www.google.com/maps/place/.../@21.0304733,105.8431508,17z/...`;
//! the `@lat,lon` fragment is the only location the record has.

use crate::error::{GeocoverError, Result};
use geocover_types::config::ColumnNames;
use geocover_types::geo::Point;
use geocover_types::table::{GeoTable, coordinate_value};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static LINK_COORDINATES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@(-?\d+\.\d+),(-?\d+\.\d+)").expect("valid regex"));

/// The first `@lat,lon` pair in `link`, if any.
///
/// # Examples
///
/// ```
/// use geocover::compute::links::link_coordinates;
///
/// let link = "https://www.google.com/maps/place/ATM/@21.0304733,105.8431508,17z";
/// let point = link_coordinates(link).unwrap();
/// assert_eq!(point.to_string(), "21.0304733,105.8431508");
/// ```
pub fn link_coordinates(link: &str) -> Option<Point> {
    let caps = LINK_COORDINATES.captures(link)?;
    let lat = caps.get(1)?.as_str().parse::<f64>().ok()?;
    let lon = caps.get(2)?.as_str().parse::<f64>().ok()?;
    Some(Point::from_lat_lon(lat, lon))
}

/// Copy of `table` with the coordinate columns filled from `link_column`.
///
/// Existing coordinate columns are overwritten. Rows whose link is not a
/// string or has no `@lat,lon` fragment get `null` coordinates; use
/// [`drop_unlocated`] before filtering.
pub fn with_coordinates_from_link(
    table: &GeoTable,
    link_column: &str,
    columns: &ColumnNames,
) -> Result<GeoTable> {
    let link_idx = table
        .column_index(link_column)
        .ok_or_else(|| GeocoverError::MissingColumn(link_column.to_string()))?;

    let (lats, lons): (Vec<Value>, Vec<Value>) = table
        .rows()
        .iter()
        .map(|row| {
            match row[link_idx].as_str().and_then(link_coordinates) {
                Some(point) => (Value::from(point.lat()), Value::from(point.lon())),
                None => (Value::Null, Value::Null),
            }
        })
        .unzip();

    let unlocated = lats.iter().filter(|v| v.is_null()).count();
    if unlocated > 0 {
        log::debug!(
            "{} of {} link(s) in '{}' carry no coordinates",
            unlocated,
            table.len(),
            link_column
        );
    }

    let mut located = table.clone();
    located.set_column(&columns.latitude, lats)?;
    located.set_column(&columns.longitude, lons)?;
    Ok(located)
}

/// Rows whose coordinate cells both parse as finite numbers.
pub fn drop_unlocated(table: &GeoTable, columns: &ColumnNames) -> Result<GeoTable> {
    let lat_idx = table
        .column_index(&columns.latitude)
        .ok_or_else(|| GeocoverError::MissingColumn(columns.latitude.clone()))?;
    let lon_idx = table
        .column_index(&columns.longitude)
        .ok_or_else(|| GeocoverError::MissingColumn(columns.longitude.clone()))?;

    let keep: Vec<usize> = table
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            coordinate_value(&row[lat_idx]).is_some() && coordinate_value(&row[lon_idx]).is_some()
        })
        .map(|(i, _)| i)
        .collect();
    Ok(table.take(&keep))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scraped() -> GeoTable {
        GeoTable::with_rows(
            vec!["title".into(), "link".into()],
            vec![
                vec![
                    json!("ATM Hoan Kiem"),
                    json!("https://www.google.com/maps/place/ATM/@21.0304733,105.8431508,17z/data"),
                ],
                vec![json!("No location"), json!("https://www.google.com/maps/search/atm")],
                vec![json!("Missing link"), Value::Null],
                vec![
                    json!("Lima"),
                    json!("https://www.google.com/maps/@-12.0464,-77.0428,12z"),
                ],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_link_coordinates() {
        let point = link_coordinates("/@21.0304733,105.8431508").unwrap();
        assert_eq!(point, Point::from_lat_lon(21.0304733, 105.8431508));
        assert_eq!(link_coordinates("no coordinates here"), None);
        assert_eq!(link_coordinates("@21,105"), None);

        let first = link_coordinates("/@1.5,2.5/@3.5,4.5").unwrap();
        assert_eq!(first, Point::from_lat_lon(1.5, 2.5));
    }

    #[test]
    fn test_fills_coordinate_columns() {
        let columns = ColumnNames::default();
        let table = with_coordinates_from_link(&scraped(), "link", &columns).unwrap();

        assert_eq!(table.columns(), &["title", "link", "latitude", "longitude"]);
        assert_eq!(table.get(0, "latitude"), Some(&json!(21.0304733)));
        assert_eq!(table.get(0, "longitude"), Some(&json!(105.8431508)));
        assert_eq!(table.get(1, "latitude"), Some(&Value::Null));
        assert_eq!(table.get(2, "longitude"), Some(&Value::Null));
        assert_eq!(table.get(3, "latitude"), Some(&json!(-12.0464)));
    }

    #[test]
    fn test_drop_unlocated() {
        let columns = ColumnNames::new("lat", "lon");
        let table = with_coordinates_from_link(&scraped(), "link", &columns).unwrap();
        let located = drop_unlocated(&table, &columns).unwrap();

        assert_eq!(located.len(), 2);
        assert_eq!(located.get(1, "title"), Some(&json!("Lima")));
        assert_eq!(located.coordinates(&columns).unwrap().len(), 2);
    }

    #[test]
    fn test_missing_link_column() {
        let err = with_coordinates_from_link(&scraped(), "url", &ColumnNames::default());
        assert!(matches!(err, Err(GeocoverError::MissingColumn(c)) if c == "url"));
    }
}
