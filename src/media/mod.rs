mod extractor;
mod normalize;
mod platform;
mod types;

pub use extractor::{ApiExtractor, Extractor};
pub use normalize::normalize;
pub use platform::Platform;
pub use types::{NormalizedMedia, RawMedia};

use crate::error::ApiError;
use std::sync::Arc;
use tracing::info;

pub struct MediaService {
    extractor: Arc<dyn Extractor>,
}

impl MediaService {
    pub fn new(extractor: Arc<dyn Extractor>) -> Self {
        info!("Media service initialized with {} extractor", extractor.name());
        Self { extractor }
    }

    /// Validate the request and perform exactly one extraction call.
    pub async fn fetch_data(&self, platform: &str, url: &str) -> Result<RawMedia, ApiError> {
        if url.is_empty() {
            return Err(ApiError::invalid_input("URL is missing or invalid."));
        }
        let platform = Platform::resolve(platform)?;

        info!("Fetching {} metadata for URL: {}", platform, url);

        let value = self
            .extractor
            .extract(platform, url)
            .await
            .map_err(ApiError::ExtractionFailure)?;

        Ok(RawMedia::from_value(platform, value))
    }

    pub async fn download(&self, platform: &str, url: &str) -> Result<NormalizedMedia, ApiError> {
        let raw = self.fetch_data(platform, url).await?;
        Ok(normalize(&raw))
    }
}
