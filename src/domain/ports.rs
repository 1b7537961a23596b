use crate::domain::model::{MapDocument, MapView, RawFeeds};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn earthquake_url(&self) -> &str;
    /// `None` when the tectonic plate layer is disabled.
    fn plates_url(&self) -> Option<&str>;
    fn output_path(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn bundle_output(&self) -> bool;
    fn map_view(&self) -> MapView;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<RawFeeds>;
    async fn transform(&self, feeds: RawFeeds) -> Result<MapDocument>;
    async fn load(&self, document: MapDocument) -> Result<String>;
}
