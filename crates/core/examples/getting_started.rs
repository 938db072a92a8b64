use geocover::compute::geojson::{parse_geojson, points_to_feature_collection};
use geocover::compute::links::{drop_unlocated, with_coordinates_from_link};
use geocover::compute::spatial::unique_points;
use geocover::prelude::*;
use serde_json::json;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (set RUST_LOG=debug to see detailed logs)
    env_logger::init();

    println!("=== geocover - Getting Started ===\n");

    // === SAMPLING AN AREA ===
    println!("1. Sampling an area of interest");
    println!("-------------------------------");

    // GeoJSON coordinates are (lon, lat)
    let aoi = parse_geojson(
        r#"{"type":"MultiPolygon","coordinates":[
            [[[105.80,21.00],[105.90,21.00],[105.90,21.10],[105.80,21.10],[105.80,21.00]]],
            [[[105.85,21.05],[105.95,21.05],[105.95,21.15],[105.85,21.15],[105.85,21.05]]]
        ]}"#,
    )?;
    let points = sample(&aoi, 2500.0, true)?;
    let unique = unique_points(&points);
    println!(
        "   {} polygons -> {} sample points ({} unique)",
        aoi.len(),
        points.len(),
        unique.len()
    );
    println!("   First search location: {}\n", unique[0]);

    // === AROUND A POINT OF INTEREST ===
    println!("2. Sampling around a point");
    println!("--------------------------");

    let hoan_kiem = Point::from_lat_lon(21.028511, 105.852020);
    let ring = circle(&hoan_kiem, 2000.0, 15)?;
    println!("   15-gon with {} vertices", ring.vertex_count());

    let around = sample_around(&hoan_kiem, 2000.0, 15, 500.0)?;
    println!("   {} points within 2 km at 500 m spacing", around.len());
    println!(
        "   GeoJSON export: {} bytes\n",
        points_to_feature_collection(&around)?.len()
    );

    // === FILTERING RECORDS ===
    println!("3. Filtering scraped records");
    println!("----------------------------");

    let scraped = GeoTable::with_rows(
        vec!["title".into(), "link".into()],
        vec![
            vec![
                json!("ATM Trang Tien"),
                json!("https://www.google.com/maps/place/ATM/@21.0250,105.8540,17z"),
            ],
            vec![
                json!("ATM Hang Bai"),
                json!("https://www.google.com/maps/place/ATM/@21.0210,105.8520,17z"),
            ],
            vec![
                json!("ATM Noi Bai"),
                json!("https://www.google.com/maps/place/ATM/@21.2187,105.8042,17z"),
            ],
            vec![json!("ATM unknown"), json!("https://www.google.com/maps/search/atm")],
        ],
    )?;
    let columns = ColumnNames::default();
    let located = drop_unlocated(&with_coordinates_from_link(&scraped, "link", &columns)?, &columns)?;
    println!("   {} of {} records have coordinates", located.len(), scraped.len());

    for strategy in [
        FilterStrategy::Geodesic,
        FilterStrategy::Haversine,
        FilterStrategy::Indexed,
    ] {
        let filter = FilterConfig::default().with_strategy(strategy).build()?;
        let nearby = filter.within_radius(&located, &hoan_kiem, 1500.0)?;
        let inside = filter.within_polygon(&located, &ring)?;
        println!(
            "   {:<9} within 1.5 km: {}, inside the 15-gon: {}",
            filter.name(),
            nearby.len(),
            inside.len()
        );
    }

    println!("\n=== Done ===");
    Ok(())
}
