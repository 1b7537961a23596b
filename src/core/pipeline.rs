use crate::core::geojson::{collection_features, parse_earthquakes};
use crate::core::{ConfigProvider, MapDocument, Pipeline, RawFeeds, Storage};
use crate::domain::model::{CsvRow, FillColor, MapView, Overlay, RunSummary};
use crate::domain::styling::{build_style, legend_entries, plate_style};
use crate::utils::error::{MapError, Result};
use reqwest::Client;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};

pub const EARTHQUAKES_FILE: &str = "earthquakes.geojson";
pub const PLATES_FILE: &str = "tectonic_plates.geojson";
pub const LEGEND_FILE: &str = "legend.json";
pub const MAP_FILE: &str = "map.json";
pub const CSV_FILE: &str = "earthquakes.csv";
pub const BUNDLE_FILE: &str = "quake_map.zip";

pub struct QuakeMapPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: Client,
}

impl<S: Storage, C: ConfigProvider> QuakeMapPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("quake-map/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            storage,
            config,
            client,
        })
    }

    async fn fetch_json(&self, url: &str) -> Result<Value> {
        tracing::debug!("Making API request to: {}", url);
        let response = self.client.get(url).send().await?;
        tracing::debug!("API response status: {}", response.status());

        if !response.status().is_success() {
            return Err(MapError::FeedError {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(response.json().await?)
    }
}

/// Sets `properties.<key>` on a GeoJSON feature, creating `properties` if needed.
fn set_property(feature: &mut Value, key: &str, value: Value) {
    let Some(obj) = feature.as_object_mut() else {
        return;
    };
    let properties = obj
        .entry("properties")
        .or_insert_with(|| Value::Object(Map::new()));
    if !properties.is_object() {
        *properties = Value::Object(Map::new());
    }
    if let Value::Object(props) = properties {
        props.insert(key.to_string(), value);
    }
}

fn style_plates(mut plates: Value) -> Result<Value> {
    collection_features(&plates)?;
    let style = serde_json::to_value(plate_style())?;

    if let Some(Value::Array(features)) = plates.get_mut("features") {
        for feature in features.iter_mut() {
            set_property(feature, "style", style.clone());
        }
    }
    Ok(plates)
}

fn overlays_for(has_plates: bool) -> Vec<Overlay> {
    let mut overlays = vec![Overlay {
        name: "Earthquakes".to_string(),
        file: EARTHQUAKES_FILE.to_string(),
    }];
    if has_plates {
        overlays.push(Overlay {
            name: "Tectonic Plates".to_string(),
            file: PLATES_FILE.to_string(),
        });
    }
    overlays
}

#[derive(Serialize)]
struct MapManifest<'a> {
    view: &'a MapView,
    legend_file: &'static str,
    summary: &'a RunSummary,
}

fn csv_bytes(rows: &[CsvRow]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer.into_inner().map_err(|e| MapError::ProcessingError {
        message: format!("failed to flush CSV output: {}", e),
    })
}

fn zip_bytes(files: &[(&str, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, data) in files {
        zip.start_file(*name, SimpleFileOptions::default())?;
        zip.write_all(data)?;
    }
    // 完成並取回底層 Vec<u8>
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for QuakeMapPipeline<S, C> {
    async fn extract(&self) -> Result<RawFeeds> {
        let earthquake_url = self.config.earthquake_url();

        let (earthquakes, plates) = match self.config.plates_url() {
            Some(plates_url) => {
                let (earthquakes, plates) =
                    tokio::join!(self.fetch_json(earthquake_url), self.fetch_json(plates_url));
                // 板塊圖層失敗不影響地震圖層
                let plates = match plates {
                    Ok(value) => Some(value),
                    Err(e) => {
                        tracing::warn!("Tectonic plates unavailable, skipping layer: {}", e);
                        None
                    }
                };
                (earthquakes?, plates)
            }
            None => (self.fetch_json(earthquake_url).await?, None),
        };

        Ok(RawFeeds {
            earthquakes,
            plates,
        })
    }

    async fn transform(&self, feeds: RawFeeds) -> Result<MapDocument> {
        let parsed = parse_earthquakes(&feeds.earthquakes)?;

        let mut earthquakes = feeds.earthquakes;
        let mut source_features = match earthquakes.get_mut("features") {
            Some(Value::Array(features)) => std::mem::take(features),
            _ => Vec::new(),
        };

        let mut styled_features = Vec::with_capacity(parsed.features.len());
        let mut csv_rows = Vec::with_capacity(parsed.features.len());
        let mut by_color: BTreeMap<FillColor, usize> =
            FillColor::ALL.iter().map(|c| (*c, 0)).collect();

        for (index, feature) in &parsed.features {
            let style = build_style(feature);
            *by_color.entry(style.fill_color).or_insert(0) += 1;

            csv_rows.push(CsvRow {
                id: feature.id.clone().unwrap_or_default(),
                time: feature.time.map(|t| t.to_rfc3339()).unwrap_or_default(),
                place: feature.place.clone(),
                magnitude: feature.magnitude,
                depth_km: feature.depth_km,
                longitude: feature.longitude(),
                latitude: feature.latitude(),
                fill_color: style.fill_color,
                radius: style.radius,
            });

            let mut value = std::mem::take(&mut source_features[*index]);
            set_property(&mut value, "style", serde_json::to_value(&style)?);
            set_property(&mut value, "popup", Value::String(feature.popup_html()));
            styled_features.push(value);
        }

        if let Some(features) = earthquakes.get_mut("features") {
            *features = Value::Array(styled_features);
        }

        let plates = match feeds.plates {
            Some(raw) => match style_plates(raw) {
                Ok(plates) => Some(plates),
                Err(e) => {
                    tracing::warn!("Ignoring malformed tectonic plates feed: {}", e);
                    None
                }
            },
            None => None,
        };

        let mut view = self.config.map_view();
        view.overlays = overlays_for(plates.is_some());

        let summary = RunSummary {
            total_features: parsed.total(),
            styled_features: parsed.features.len(),
            skipped_features: parsed.skipped.len(),
            by_color,
            generated_at: chrono::Utc::now(),
        };
        tracing::debug!("Depth color distribution: {:?}", summary.by_color);

        Ok(MapDocument {
            earthquakes,
            plates,
            legend: legend_entries(),
            view,
            csv_rows,
            summary,
        })
    }

    async fn load(&self, document: MapDocument) -> Result<String> {
        let manifest = MapManifest {
            view: &document.view,
            legend_file: LEGEND_FILE,
            summary: &document.summary,
        };

        let mut files: Vec<(&str, Vec<u8>)> = vec![
            (EARTHQUAKES_FILE, serde_json::to_vec(&document.earthquakes)?),
            (LEGEND_FILE, serde_json::to_vec_pretty(&document.legend)?),
            (MAP_FILE, serde_json::to_vec_pretty(&manifest)?),
            (CSV_FILE, csv_bytes(&document.csv_rows)?),
        ];
        if let Some(plates) = &document.plates {
            files.push((PLATES_FILE, serde_json::to_vec(plates)?));
        }

        for (name, data) in &files {
            tracing::debug!("Writing {} ({} bytes) to storage", name, data.len());
            self.storage.write_file(name, data).await?;
        }

        if self.config.bundle_output() {
            let zip_data = zip_bytes(&files)?;
            tracing::debug!("Writing ZIP bundle ({} bytes) to storage", zip_data.len());
            self.storage.write_file(BUNDLE_FILE, &zip_data).await?;
            return Ok(format!("{}/{}", self.config.output_path(), BUNDLE_FILE));
        }

        Ok(self.config.output_path().to_string())
    }
}
