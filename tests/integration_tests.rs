use anyhow::Result;
use httpmock::prelude::*;
use quake_map::{LocalStorage, MapEngine, QuakeMapPipeline, TomlConfig};
use serde_json::{json, Value};
use tempfile::TempDir;

fn usgs_week() -> Value {
    json!({
        "type": "FeatureCollection",
        "metadata": {"generated": 1_700_000_000_000i64, "count": 4},
        "features": [
            {
                "type": "Feature",
                "id": "ak0001",
                "properties": {"mag": 1.2, "place": "50 km S of Anchorage, Alaska", "time": 1_700_000_000_000i64},
                "geometry": {"type": "Point", "coordinates": [-149.9, 60.7, 35.2]}
            },
            {
                "type": "Feature",
                "id": "us0002",
                "properties": {"mag": 6.1, "place": "Tonga", "time": 1_700_000_100_000i64},
                "geometry": {"type": "Point", "coordinates": [-175.2, -20.1, 210.0]}
            },
            {
                "type": "Feature",
                "id": "nc0003",
                "properties": {"mag": 0.0, "place": "The Geysers, CA", "time": 1_700_000_200_000i64},
                "geometry": {"type": "Point", "coordinates": [-122.8, 38.8, -0.9]}
            },
            {
                "type": "Feature",
                "id": "bad0004",
                "properties": {"mag": null, "place": "Unknown"},
                "geometry": {"type": "Point", "coordinates": [0.0, 0.0, 10.0]}
            }
        ]
    })
}

fn plate_boundaries() -> Value {
    json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"LAYER": "plate boundary", "Name": "PA-NA"},
                "geometry": {"type": "LineString", "coordinates": [[-124.5, 40.3], [-125.0, 40.4]]}
            }
        ]
    })
}

fn toml_for(earthquake_url: &str, plates_url: &str, output_path: &str, bundle: bool) -> String {
    format!(
        r#"
[source]
earthquake_url = "{}"
plates_url = "{}"
timeout_seconds = 5

[load]
output_path = "{}"
bundle = {}
"#,
        earthquake_url,
        plates_url,
        output_path.replace('\\', "/"),
        bundle
    )
}

fn read_json(dir: &std::path::Path, name: &str) -> Result<Value> {
    let data = std::fs::read(dir.join(name))?;
    Ok(serde_json::from_slice(&data)?)
}

#[tokio::test]
async fn test_end_to_end_map_build() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let quake_mock = server.mock(|when, then| {
        when.method(GET).path("/summary/all_week.geojson");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(usgs_week());
    });
    let plates_mock = server.mock(|when, then| {
        when.method(GET).path("/PB2002_boundaries.json");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(plate_boundaries());
    });

    let config = TomlConfig::from_toml_str(&toml_for(
        &server.url("/summary/all_week.geojson"),
        &server.url("/PB2002_boundaries.json"),
        &output_path,
        false,
    ))?;

    let storage = LocalStorage::new(output_path.clone());
    let pipeline = QuakeMapPipeline::new(storage, config)?;
    let result = MapEngine::new(pipeline).run().await?;

    quake_mock.assert();
    plates_mock.assert();
    assert_eq!(result.replace('\\', "/"), output_path.replace('\\', "/"));

    let dir = temp_dir.path();
    let earthquakes = read_json(dir, "earthquakes.geojson")?;
    let features = earthquakes["features"].as_array().unwrap();
    assert_eq!(features.len(), 3);

    let colors: Vec<&str> = features
        .iter()
        .map(|f| f["properties"]["style"]["fillColor"].as_str().unwrap())
        .collect();
    assert_eq!(colors, vec!["yellow", "red", "green"]);

    let radii: Vec<f64> = features
        .iter()
        .map(|f| f["properties"]["style"]["radius"].as_f64().unwrap())
        .collect();
    assert_eq!(radii, vec![3.0, 15.25, 1.0]);
    assert_eq!(
        features[1]["properties"]["popup"],
        "Magnitude: 6.1<br>Location: Tonga"
    );

    let plates = read_json(dir, "tectonic_plates.geojson")?;
    assert_eq!(plates["features"][0]["properties"]["style"]["color"], "orange");

    let legend = read_json(dir, "legend.json")?;
    let labels: Vec<&str> = legend
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["-10–10", "10–30", "30–50", "50–70", "70–90", "90+"]);

    let map = read_json(dir, "map.json")?;
    assert_eq!(map["view"]["zoom"], 2);
    assert_eq!(map["view"]["default_basemap"], "Satellite");
    assert_eq!(map["view"]["legend_position"], "bottomright");
    assert_eq!(map["view"]["basemaps"].as_array().unwrap().len(), 3);
    assert_eq!(map["view"]["overlays"][1]["file"], "tectonic_plates.geojson");
    assert_eq!(map["summary"]["total_features"], 4);
    assert_eq!(map["summary"]["skipped_features"], 1);
    assert_eq!(map["summary"]["by_color"]["red"], 1);

    let csv = std::fs::read_to_string(dir.join("earthquakes.csv"))?;
    assert_eq!(csv.lines().count(), 4);
    assert!(csv.contains("\"50 km S of Anchorage, Alaska\""));

    assert!(!dir.join("quake_map.zip").exists());
    Ok(())
}

#[tokio::test]
async fn test_map_build_survives_missing_plates() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/quakes");
        then.status(200).json_body(usgs_week());
    });
    let plates_mock = server.mock(|when, then| {
        when.method(GET).path("/plates");
        then.status(503);
    });

    let config = TomlConfig::from_toml_str(&toml_for(
        &server.url("/quakes"),
        &server.url("/plates"),
        &output_path,
        true,
    ))?;

    let pipeline = QuakeMapPipeline::new(LocalStorage::new(output_path.clone()), config)?;
    let result = MapEngine::new(pipeline).run().await?;

    plates_mock.assert();
    assert!(result.ends_with("quake_map.zip"));

    let dir = temp_dir.path();
    assert!(!dir.join("tectonic_plates.geojson").exists());

    let map = read_json(dir, "map.json")?;
    assert_eq!(map["view"]["overlays"].as_array().unwrap().len(), 1);

    let zip_data = std::fs::read(dir.join("quake_map.zip"))?;
    let archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data))?;
    assert_eq!(archive.len(), 4);
    Ok(())
}

#[tokio::test]
async fn test_map_build_fails_when_feed_is_down() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let quake_mock = server.mock(|when, then| {
        when.method(GET).path("/quakes");
        then.status(500);
    });

    let mut config = TomlConfig::from_toml_str(&toml_for(
        &server.url("/quakes"),
        "",
        &output_path,
        false,
    ))?;
    config.source.plates_url = None;

    let pipeline = QuakeMapPipeline::new(LocalStorage::new(output_path), config)?;
    let result = MapEngine::new(pipeline).run().await;

    quake_mock.assert();
    let err = result.unwrap_err();
    assert!(matches!(
        err,
        quake_map::MapError::FeedError { status: 500, .. }
    ));
    assert!(!temp_dir.path().join("earthquakes.geojson").exists());
    Ok(())
}
