//! Marker styling: depth picks the fill color, magnitude picks the radius.
//!
//! Everything here is pure; the thresholds are the usual shallow / intermediate
//! depth bands in kilometres.

use crate::domain::model::{
    EarthquakeFeature, FillColor, LegendBucket, LegendEntry, PlateStyle, StyleDescriptor,
};

pub const DEPTH_RED_KM: f64 = 90.0;
pub const DEPTH_DARKORANGE_KM: f64 = 70.0;
pub const DEPTH_GOLD_KM: f64 = 50.0;
pub const DEPTH_YELLOW_KM: f64 = 30.0;
pub const DEPTH_YELLOWGREEN_KM: f64 = 10.0;
/// Lowest bound shown in the legend; the green bucket is unbounded below.
pub const LEGEND_MIN_DEPTH_KM: f64 = -10.0;

pub const RADIUS_SCALE: f64 = 2.5;
pub const ZERO_MAGNITUDE_RADIUS: f64 = 1.0;
pub const MIN_RADIUS: f64 = 1.0;

pub const STROKE_COLOR: &str = "#000000";
pub const STROKE_WEIGHT: f64 = 0.5;
pub const MARKER_OPACITY: f64 = 1.0;
pub const MARKER_FILL_OPACITY: f64 = 1.0;

pub const PLATE_COLOR: &str = "orange";
pub const PLATE_WEIGHT: f64 = 2.0;

const LEGEND_BUCKETS: [LegendBucket; 6] = [
    LegendBucket {
        lower_bound_km: LEGEND_MIN_DEPTH_KM,
        color: FillColor::Green,
    },
    LegendBucket {
        lower_bound_km: DEPTH_YELLOWGREEN_KM,
        color: FillColor::YellowGreen,
    },
    LegendBucket {
        lower_bound_km: DEPTH_YELLOW_KM,
        color: FillColor::Yellow,
    },
    LegendBucket {
        lower_bound_km: DEPTH_GOLD_KM,
        color: FillColor::Gold,
    },
    LegendBucket {
        lower_bound_km: DEPTH_DARKORANGE_KM,
        color: FillColor::DarkOrange,
    },
    LegendBucket {
        lower_bound_km: DEPTH_RED_KM,
        color: FillColor::Red,
    },
];

/// First strict threshold that the depth exceeds wins. NaN falls through to green.
pub fn color_for_depth(depth_km: f64) -> FillColor {
    if depth_km > DEPTH_RED_KM {
        FillColor::Red
    } else if depth_km > DEPTH_DARKORANGE_KM {
        FillColor::DarkOrange
    } else if depth_km > DEPTH_GOLD_KM {
        FillColor::Gold
    } else if depth_km > DEPTH_YELLOW_KM {
        FillColor::Yellow
    } else if depth_km > DEPTH_YELLOWGREEN_KM {
        FillColor::YellowGreen
    } else {
        FillColor::Green
    }
}

/// Zero magnitude gets a fixed visible radius; anything that would come out
/// below `MIN_RADIUS` (negative, tiny or non-finite magnitudes) is clamped to it.
pub fn radius_for_magnitude(magnitude: f64) -> f64 {
    if magnitude == 0.0 {
        return ZERO_MAGNITUDE_RADIUS;
    }
    let radius = magnitude * RADIUS_SCALE;
    if radius.is_finite() && radius >= MIN_RADIUS {
        radius
    } else {
        MIN_RADIUS
    }
}

pub fn build_style(feature: &EarthquakeFeature) -> StyleDescriptor {
    StyleDescriptor {
        fill_color: color_for_depth(feature.depth_km),
        radius: radius_for_magnitude(feature.magnitude),
        stroke: true,
        stroke_color: STROKE_COLOR.to_string(),
        stroke_weight: STROKE_WEIGHT,
        opacity: MARKER_OPACITY,
        fill_opacity: MARKER_FILL_OPACITY,
    }
}

pub fn plate_style() -> PlateStyle {
    PlateStyle {
        color: PLATE_COLOR.to_string(),
        weight: PLATE_WEIGHT,
    }
}

/// Ascending depth buckets for the legend.
pub fn build_legend_buckets() -> Vec<LegendBucket> {
    LEGEND_BUCKETS.to_vec()
}

/// Legend buckets with labels: `"{lower}–{next}"`, the last one `"{lower}+"`.
pub fn legend_entries() -> Vec<LegendEntry> {
    let buckets = build_legend_buckets();
    buckets
        .iter()
        .enumerate()
        .map(|(i, bucket)| {
            let label = match buckets.get(i + 1) {
                Some(next) => format!("{}\u{2013}{}", bucket.lower_bound_km, next.lower_bound_km),
                None => format!("{}+", bucket.lower_bound_km),
            };
            LegendEntry {
                lower_bound_km: bucket.lower_bound_km,
                color: bucket.color,
                label,
            }
        })
        .collect()
}
