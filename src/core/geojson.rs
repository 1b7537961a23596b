use crate::domain::model::EarthquakeFeature;
use crate::utils::error::{MapError, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct RawQuake {
    /// GeoJSON allows string or numeric ids
    id: Option<Value>,
    properties: RawProperties,
    geometry: Option<RawGeometry>,
}

#[derive(Debug, Deserialize)]
struct RawProperties {
    mag: Option<f64>,
    // 以下欄位型別不符時視為缺值，不影響整筆 feature
    place: Option<Value>,
    /// epoch milliseconds
    time: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    coordinates: Vec<f64>,
}

fn id_from_value(value: Value) -> Option<String> {
    match value {
        Value::String(id) => Some(id),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

fn time_from_value(value: &Value) -> Option<DateTime<Utc>> {
    let millis = match value.as_i64() {
        Some(millis) => millis,
        None => {
            let millis = value.as_f64()?;
            if !millis.is_finite() || millis.abs() > i64::MAX as f64 {
                return None;
            }
            millis.round() as i64
        }
    };
    DateTime::<Utc>::from_timestamp_millis(millis)
}

/// Earthquakes parsed out of one feed, together with the features that were
/// rejected as `(index, reason)`.
#[derive(Debug, Clone, Default)]
pub struct ParsedFeed {
    pub features: Vec<(usize, EarthquakeFeature)>,
    pub skipped: Vec<(usize, String)>,
}

impl ParsedFeed {
    pub fn total(&self) -> usize {
        self.features.len() + self.skipped.len()
    }
}

impl EarthquakeFeature {
    /// Reads one GeoJSON feature following the USGS summary feed layout.
    pub fn from_geojson(index: usize, value: &Value) -> Result<Self> {
        let invalid = |reason: String| MapError::InvalidFeature { index, reason };

        let raw: RawQuake =
            serde_json::from_value(value.clone()).map_err(|e| invalid(e.to_string()))?;

        let magnitude = raw
            .properties
            .mag
            .ok_or_else(|| invalid("missing magnitude".to_string()))?;

        let coordinates = raw
            .geometry
            .map(|g| g.coordinates)
            .ok_or_else(|| invalid("missing geometry".to_string()))?;
        let (lon, lat, depth) = match coordinates.as_slice() {
            [lon, lat, depth, ..] => (*lon, *lat, *depth),
            other => {
                return Err(invalid(format!(
                    "expected [lon, lat, depth], got {} coordinates",
                    other.len()
                )))
            }
        };

        if !magnitude.is_finite() || !depth.is_finite() {
            return Err(invalid("magnitude and depth must be finite".to_string()));
        }

        let time = raw.properties.time.as_ref().and_then(time_from_value);

        Ok(Self {
            id: raw.id.and_then(id_from_value),
            magnitude,
            depth_km: depth,
            place: raw
                .properties
                .place
                .and_then(|place| match place {
                    Value::String(place) => Some(place),
                    _ => None,
                })
                .unwrap_or_else(|| "Unknown location".to_string()),
            coordinates: (lon, lat, depth),
            time,
        })
    }
}

/// Returns the `features` array of a FeatureCollection.
pub fn collection_features(collection: &Value) -> Result<&Vec<Value>> {
    if collection.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
        return Err(MapError::ProcessingError {
            message: "expected a GeoJSON FeatureCollection".to_string(),
        });
    }
    collection
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| MapError::ProcessingError {
            message: "FeatureCollection has no 'features' array".to_string(),
        })
}

pub fn parse_earthquakes(collection: &Value) -> Result<ParsedFeed> {
    let mut parsed = ParsedFeed::default();

    for (index, value) in collection_features(collection)?.iter().enumerate() {
        match EarthquakeFeature::from_geojson(index, value) {
            Ok(feature) => parsed.features.push((index, feature)),
            Err(MapError::InvalidFeature { index, reason }) => {
                tracing::warn!("Skipping feature #{}: {}", index, reason);
                parsed.skipped.push((index, reason));
            }
            Err(e) => return Err(e),
        }
    }

    tracing::debug!(
        "Parsed {} earthquakes ({} skipped)",
        parsed.features.len(),
        parsed.skipped.len()
    );
    Ok(parsed)
}
