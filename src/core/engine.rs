use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct MapEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> MapEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting quake map build...");

        // Extract
        tracing::info!("Fetching feeds...");
        let feeds = self.pipeline.extract().await?;
        tracing::info!(
            "Fetched earthquake feed{}",
            if feeds.plates.is_some() {
                " and tectonic plates"
            } else {
                ""
            }
        );

        // Transform
        tracing::info!("Styling features...");
        let document = self.pipeline.transform(feeds).await?;
        tracing::info!(
            "Styled {} of {} earthquakes ({} skipped)",
            document.summary.styled_features,
            document.summary.total_features,
            document.summary.skipped_features
        );

        // Load
        tracing::info!("Writing map artifacts...");
        let output_path = self.pipeline.load(document).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(output_path)
    }
}
