use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single seismic event as read from the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarthquakeFeature {
    pub id: Option<String>,
    pub magnitude: f64,
    pub depth_km: f64,
    pub place: String,
    /// (lon, lat, depth)
    pub coordinates: (f64, f64, f64),
    pub time: Option<DateTime<Utc>>,
}

impl EarthquakeFeature {
    pub fn new(magnitude: f64, depth_km: f64, place: impl Into<String>) -> Self {
        Self {
            id: None,
            magnitude,
            depth_km,
            place: place.into(),
            coordinates: (0.0, 0.0, depth_km),
            time: None,
        }
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates.0
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates.1
    }

    /// Popup text shown when a marker is clicked.
    pub fn popup_html(&self) -> String {
        format!("Magnitude: {}<br>Location: {}", self.magnitude, self.place)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillColor {
    Green,
    YellowGreen,
    Yellow,
    Gold,
    DarkOrange,
    Red,
}

impl FillColor {
    pub const ALL: [FillColor; 6] = [
        FillColor::Green,
        FillColor::YellowGreen,
        FillColor::Yellow,
        FillColor::Gold,
        FillColor::DarkOrange,
        FillColor::Red,
    ];

    /// CSS color name.
    pub fn as_str(&self) -> &'static str {
        match self {
            FillColor::Green => "green",
            FillColor::YellowGreen => "yellowgreen",
            FillColor::Yellow => "yellow",
            FillColor::Gold => "gold",
            FillColor::DarkOrange => "darkorange",
            FillColor::Red => "red",
        }
    }
}

impl fmt::Display for FillColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Circle marker style handed to the rendering library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleDescriptor {
    pub fill_color: FillColor,
    pub radius: f64,
    pub stroke: bool,
    pub stroke_color: String,
    pub stroke_weight: f64,
    pub opacity: f64,
    pub fill_opacity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegendBucket {
    pub lower_bound_km: f64,
    pub color: FillColor,
}

/// A legend bucket with its rendered label, e.g. `"10–30"` or `"90+"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub lower_bound_km: f64,
    pub color: FillColor,
    pub label: String,
}

/// Line style for tectonic plate boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateStyle {
    pub color: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Basemap {
    pub name: String,
    pub url_template: String,
    pub attribution: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    pub name: String,
    pub file: String,
}

/// Everything the map widget needs besides the feature data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    /// (lat, lon)
    pub center: (f64, f64),
    pub zoom: u8,
    pub basemaps: Vec<Basemap>,
    pub default_basemap: String,
    pub overlays: Vec<Overlay>,
    pub legend_position: String,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: (20.0, 0.0),
            zoom: 2,
            basemaps: vec![
                Basemap {
                    name: "Satellite".to_string(),
                    url_template: "https://{s}.tile.openstreetmap.fr/hot/{z}/{x}/{y}.png"
                        .to_string(),
                    attribution:
                        "© OpenStreetMap contributors, Humanitarian OpenStreetMap Team"
                            .to_string(),
                },
                Basemap {
                    name: "Street".to_string(),
                    url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png"
                        .to_string(),
                    attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors".to_string(),
                },
                Basemap {
                    name: "Outdoor".to_string(),
                    url_template: "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png".to_string(),
                    attribution: "© OpenStreetMap contributors, © OpenTopoMap".to_string(),
                },
            ],
            default_basemap: "Satellite".to_string(),
            overlays: Vec::new(),
            legend_position: "bottomright".to_string(),
        }
    }
}

impl MapView {
    pub fn has_basemap(&self, name: &str) -> bool {
        self.basemaps.iter().any(|b| b.name == name)
    }
}

/// Raw feed payloads as fetched.
#[derive(Debug, Clone)]
pub struct RawFeeds {
    pub earthquakes: serde_json::Value,
    pub plates: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_features: usize,
    pub styled_features: usize,
    pub skipped_features: usize,
    pub by_color: BTreeMap<FillColor, usize>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvRow {
    pub id: String,
    pub time: String,
    pub place: String,
    pub magnitude: f64,
    pub depth_km: f64,
    pub longitude: f64,
    pub latitude: f64,
    pub fill_color: FillColor,
    pub radius: f64,
}

/// Output of the transform phase, ready to be written out.
#[derive(Debug, Clone)]
pub struct MapDocument {
    pub earthquakes: serde_json::Value,
    pub plates: Option<serde_json::Value>,
    pub legend: Vec<LegendEntry>,
    pub view: MapView,
    pub csv_rows: Vec<CsvRow>,
    pub summary: RunSummary,
}
