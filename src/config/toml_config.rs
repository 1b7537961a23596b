use crate::config::{
    DEFAULT_EARTHQUAKE_URL, DEFAULT_OUTPUT_PATH, DEFAULT_PLATES_URL, DEFAULT_TIMEOUT_SECONDS,
};
use crate::core::ConfigProvider;
use crate::domain::model::MapView;
use crate::utils::error::{MapError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_earthquake_url")]
    pub earthquake_url: String,
    /// 設為空字串即停用板塊圖層
    #[serde(default = "default_plates_url")]
    pub plates_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapConfig {
    /// [lat, lon]
    pub center: Option<[f64; 2]>,
    pub zoom: Option<u8>,
    pub default_basemap: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default)]
    pub bundle: bool,
}

fn default_earthquake_url() -> String {
    DEFAULT_EARTHQUAKE_URL.to_string()
}

fn default_plates_url() -> Option<String> {
    Some(DEFAULT_PLATES_URL.to_string())
}

fn default_output_path() -> String {
    DEFAULT_OUTPUT_PATH.to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            earthquake_url: default_earthquake_url(),
            plates_url: default_plates_url(),
            timeout_seconds: None,
        }
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            bundle: false,
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| MapError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${USGS_FEED})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| MapError::ConfigError {
            message: format!("invalid env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.source.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }
}

impl ConfigProvider for TomlConfig {
    fn earthquake_url(&self) -> &str {
        &self.source.earthquake_url
    }

    fn plates_url(&self) -> Option<&str> {
        self.source
            .plates_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds())
    }

    fn bundle_output(&self) -> bool {
        self.load.bundle
    }

    fn map_view(&self) -> MapView {
        let mut view = MapView::default();
        if let Some([lat, lon]) = self.map.center {
            view.center = (lat, lon);
        }
        if let Some(zoom) = self.map.zoom {
            view.zoom = zoom;
        }
        if let Some(basemap) = &self.map.default_basemap {
            view.default_basemap = basemap.clone();
        }
        view
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("source.earthquake_url", &self.source.earthquake_url)?;
        if let Some(plates_url) = self.plates_url() {
            validation::validate_url("source.plates_url", plates_url)?;
        }
        validation::validate_positive_number("source.timeout_seconds", self.timeout_seconds(), 1)?;
        validation::validate_path("load.output_path", &self.load.output_path)?;

        let view = self.map_view();
        validation::validate_range("map.center.lat", view.center.0, -90.0, 90.0)?;
        validation::validate_range("map.center.lon", view.center.1, -180.0, 180.0)?;
        validation::validate_range("map.zoom", view.zoom, 0, 19)?;
        validation::validate_non_empty_string("map.default_basemap", &view.default_basemap)?;
        if !view.has_basemap(&view.default_basemap) {
            let names: Vec<&str> = view.basemaps.iter().map(|b| b.name.as_str()).collect();
            return Err(MapError::InvalidConfigValueError {
                field: "map.default_basemap".to_string(),
                value: view.default_basemap.clone(),
                reason: format!("Unknown basemap. Valid basemaps: {}", names.join(", ")),
            });
        }

        Ok(())
    }
}
