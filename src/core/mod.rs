pub mod engine;
pub mod geojson;
pub mod pipeline;

pub use crate::domain::model::{MapDocument, RawFeeds};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
