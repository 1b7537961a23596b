pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::model::MapView;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
#[cfg(feature = "cli")]
use std::time::Duration;

pub const DEFAULT_EARTHQUAKE_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson";
pub const DEFAULT_PLATES_URL: &str =
    "https://raw.githubusercontent.com/fraxen/tectonicplates/master/GeoJSON/PB2002_boundaries.json";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_OUTPUT_PATH: &str = "./output";

/// USGS summary feed window (all magnitudes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum FeedPeriod {
    Hour,
    Day,
    Week,
    Month,
}

impl FeedPeriod {
    pub fn url(&self) -> String {
        let period = match self {
            FeedPeriod::Hour => "hour",
            FeedPeriod::Day => "day",
            FeedPeriod::Week => "week",
            FeedPeriod::Month => "month",
        };
        format!(
            "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_{}.geojson",
            period
        )
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, clap::Parser)]
#[command(name = "quake-map")]
#[command(about = "Builds styled earthquake and tectonic plate layers for a web map")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_EARTHQUAKE_URL)]
    pub earthquake_url: String,

    /// Shortcut for a USGS summary feed; overrides --earthquake-url
    #[arg(long, value_enum)]
    pub feed: Option<FeedPeriod>,

    #[arg(long, default_value = DEFAULT_PLATES_URL)]
    pub plates_url: String,

    #[arg(long, help = "Skip the tectonic plates layer")]
    pub no_plates: bool,

    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output_path: String,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,

    #[arg(long, help = "Also pack every artifact into a ZIP bundle")]
    pub bundle: bool,

    /// Load settings from a TOML file instead of flags
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(long, help = "Show what would be fetched without running")]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn resolved_earthquake_url(&self) -> String {
        self.feed
            .map(|feed| feed.url())
            .unwrap_or_else(|| self.earthquake_url.clone())
    }

    /// Source/output flags that a `--config` file takes precedence over.
    pub fn flags_ignored_with_config(&self) -> Vec<&'static str> {
        let mut ignored = Vec::new();
        if self.earthquake_url != DEFAULT_EARTHQUAKE_URL {
            ignored.push("--earthquake-url");
        }
        if self.feed.is_some() {
            ignored.push("--feed");
        }
        if self.plates_url != DEFAULT_PLATES_URL {
            ignored.push("--plates-url");
        }
        if self.no_plates {
            ignored.push("--no-plates");
        }
        if self.output_path != DEFAULT_OUTPUT_PATH {
            ignored.push("--output-path");
        }
        if self.timeout_seconds != DEFAULT_TIMEOUT_SECONDS {
            ignored.push("--timeout-seconds");
        }
        if self.bundle {
            ignored.push("--bundle");
        }
        ignored
    }

    /// 套用 --feed 捷徑
    pub fn apply_feed(&mut self) {
        if let Some(feed) = self.feed {
            self.earthquake_url = feed.url();
        }
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn earthquake_url(&self) -> &str {
        &self.earthquake_url
    }

    fn plates_url(&self) -> Option<&str> {
        if self.no_plates {
            None
        } else {
            Some(&self.plates_url)
        }
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn bundle_output(&self) -> bool {
        self.bundle
    }

    fn map_view(&self) -> MapView {
        MapView::default()
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("earthquake_url", &self.resolved_earthquake_url())?;
        if !self.no_plates {
            validation::validate_url("plates_url", &self.plates_url)?;
        }
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_positive_number("timeout_seconds", self.timeout_seconds, 1)?;
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_defaults() {
        let config = CliConfig::parse_from(["quake-map"]);
        assert_eq!(config.earthquake_url(), DEFAULT_EARTHQUAKE_URL);
        assert_eq!(config.plates_url(), Some(DEFAULT_PLATES_URL));
        assert_eq!(config.output_path(), "./output");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(!config.bundle_output());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_feed_shortcut_and_no_plates() {
        let mut config = CliConfig::parse_from(["quake-map", "--feed", "day", "--no-plates"]);
        config.apply_feed();
        assert_eq!(
            config.earthquake_url(),
            "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_day.geojson"
        );
        assert_eq!(config.plates_url(), None);
    }

    #[test]
    fn test_flags_ignored_with_config() {
        let config = CliConfig::parse_from(["quake-map", "--config", "map.toml"]);
        assert!(config.flags_ignored_with_config().is_empty());

        let config = CliConfig::parse_from([
            "quake-map",
            "--config",
            "map.toml",
            "--feed",
            "hour",
            "--bundle",
            "--no-plates",
        ]);
        assert_eq!(
            config.flags_ignored_with_config(),
            vec!["--feed", "--no-plates", "--bundle"]
        );
    }

    #[test]
    fn test_cli_validation_rejects_bad_values() {
        let config = CliConfig::parse_from(["quake-map", "--timeout-seconds", "0"]);
        assert!(config.validate().is_err());

        let config = CliConfig::parse_from(["quake-map", "--plates-url", "not a url"]);
        assert!(config.validate().is_err());

        let config =
            CliConfig::parse_from(["quake-map", "--plates-url", "not a url", "--no-plates"]);
        assert!(config.validate().is_ok());
    }
}
