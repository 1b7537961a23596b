pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use crate::core::{engine::MapEngine, pipeline::QuakeMapPipeline};
pub use domain::model::{EarthquakeFeature, FillColor, LegendBucket, StyleDescriptor};
pub use domain::styling::{build_legend_buckets, build_style, color_for_depth, radius_for_magnitude};
pub use utils::error::{MapError, Result};
