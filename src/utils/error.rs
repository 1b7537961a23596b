use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Feed request to {url} returned HTTP {status}")]
    FeedError { url: String, status: u16 },

    #[error("Invalid feature at index {index}: {reason}")]
    InvalidFeature { index: usize, reason: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MapError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MapError::ApiError(_) | MapError::FeedError { .. } => ErrorCategory::Network,
            MapError::CsvError(_)
            | MapError::SerializationError(_)
            | MapError::InvalidFeature { .. }
            | MapError::ProcessingError { .. } => ErrorCategory::Data,
            MapError::ZipError(_) | MapError::IoError(_) => ErrorCategory::Storage,
            MapError::ConfigError { .. }
            | MapError::ConfigValidationError { .. }
            | MapError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 單筆 feature 無效只會被略過
            MapError::InvalidFeature { .. } => ErrorSeverity::Low,
            MapError::ApiError(_) | MapError::FeedError { .. } => ErrorSeverity::Medium,
            MapError::CsvError(_)
            | MapError::SerializationError(_)
            | MapError::ProcessingError { .. } => ErrorSeverity::High,
            MapError::ZipError(_)
            | MapError::IoError(_)
            | MapError::ConfigError { .. }
            | MapError::ConfigValidationError { .. }
            | MapError::InvalidConfigValueError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            MapError::ApiError(_) => "Could not reach the earthquake feed".to_string(),
            MapError::FeedError { url, status } => {
                format!("The feed at {} answered with HTTP {}", url, status)
            }
            MapError::InvalidFeature { index, .. } => {
                format!("Feature #{} could not be styled and was skipped", index)
            }
            MapError::SerializationError(_) | MapError::ProcessingError { .. } => {
                "The downloaded feed is not valid GeoJSON".to_string()
            }
            MapError::IoError(_) | MapError::ZipError(_) => {
                "Writing the map artifacts failed".to_string()
            }
            MapError::CsvError(_) => "Writing the earthquake summary failed".to_string(),
            _ => format!("Invalid configuration: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check the network connection and the feed URL, then retry",
            ErrorCategory::Data => "Verify that the feed URL points to a GeoJSON FeatureCollection",
            ErrorCategory::Storage => "Check that the output path exists and is writable",
            ErrorCategory::Configuration => "Review the command line flags or the TOML config file",
        }
    }
}

pub type Result<T> = std::result::Result<T, MapError>;
