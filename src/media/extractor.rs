use super::platform::Platform;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

#[async_trait]
pub trait Extractor: Send + Sync {
    /// Human-readable name of the extractor
    fn name(&self) -> &'static str;

    /// Fetch the platform's raw metadata for a media URL
    async fn extract(&self, platform: Platform, url: &str) -> Result<Value>;
}

/// Extraction backed by a hosted API exposing one endpoint per platform,
/// each taking the media URL as a `url` query parameter.
pub struct ApiExtractor {
    client: reqwest::Client,
    api_base: Url,
}

impl ApiExtractor {
    pub fn new(api_base: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        let api_base = Url::parse(api_base)
            .with_context(|| format!("Invalid extractor API URL: {}", api_base))?;

        Ok(Self { client, api_base })
    }

    pub fn endpoint_url(&self, platform: Platform) -> Result<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Extractor API URL cannot be a base"))?
            .pop_if_empty()
            .push(platform.endpoint());
        Ok(url)
    }
}

#[async_trait]
impl Extractor for ApiExtractor {
    fn name(&self) -> &'static str {
        "extractor-api"
    }

    async fn extract(&self, platform: Platform, url: &str) -> Result<Value> {
        let endpoint = self.endpoint_url(platform)?;
        debug!("Requesting {} metadata from {}", platform, endpoint);

        let response = self
            .client
            .get(endpoint)
            .query(&[("url", url)])
            .send()
            .await
            .with_context(|| format!("Failed to reach {} extractor", platform))?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "{} extraction failed: HTTP {}",
                platform,
                response.status()
            ));
        }

        let body = response
            .text()
            .await
            .context("Failed to read extractor response")?;

        debug!("{} extractor output: {}", platform, body);

        serde_json::from_str(&body).context("Failed to parse extractor response")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url() {
        let extractor =
            ApiExtractor::new("https://api.example.com", Duration::from_secs(5)).unwrap();
        assert_eq!(
            extractor.endpoint_url(Platform::TikTok).unwrap().as_str(),
            "https://api.example.com/ttdl"
        );
        assert_eq!(
            extractor.endpoint_url(Platform::Instagram).unwrap().as_str(),
            "https://api.example.com/igdl"
        );
    }

    #[test]
    fn test_endpoint_url_keeps_base_path() {
        let extractor =
            ApiExtractor::new("https://api.example.com/v2/", Duration::from_secs(5)).unwrap();
        assert_eq!(
            extractor.endpoint_url(Platform::Facebook).unwrap().as_str(),
            "https://api.example.com/v2/fbdown"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(ApiExtractor::new("not a url", Duration::from_secs(5)).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_api_is_an_error() {
        let extractor =
            ApiExtractor::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
        let result = extractor
            .extract(Platform::YouTube, "https://youtube.com/watch?v=1")
            .await;
        assert!(result.is_err());
    }

    async fn fake_api() -> ApiExtractor {
        use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
        use serde_json::json;
        use std::collections::HashMap;

        let app = Router::new()
            .route(
                "/igdl",
                get(|Query(params): Query<HashMap<String, String>>| async move {
                    Json(json!([{ "url": params.get("url").cloned().unwrap_or_default() }]))
                }),
            )
            .route(
                "/ttdl",
                get(|| async { (StatusCode::BAD_GATEWAY, "bad gateway") }),
            )
            .route(
                "/youtube",
                get(|| async { "<html><body>captcha</body></html>" }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        ApiExtractor::new(&format!("http://{}", addr), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_extract_passes_url_as_query() {
        let extractor = fake_api().await;
        let value = extractor
            .extract(Platform::Instagram, "https://instagram.com/p/abc?igsh=1")
            .await
            .unwrap();
        assert_eq!(value[0]["url"], "https://instagram.com/p/abc?igsh=1");
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let extractor = fake_api().await;
        let err = extractor
            .extract(Platform::TikTok, "https://tiktok.com/@a/video/1")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("HTTP 502"), "{err}");
    }

    #[tokio::test]
    async fn test_non_json_body_is_an_error() {
        let extractor = fake_api().await;
        let err = extractor
            .extract(Platform::YouTube, "https://youtube.com/watch?v=1")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to parse extractor response");
    }
}
