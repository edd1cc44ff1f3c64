use async_trait::async_trait;
use geojson::FeatureCollection;

use super::FeedProvider;
use crate::error::QuakeMapError;
use crate::feature::parse_collection;

const USER_AGENT: &str = concat!("quakemap/", env!("CARGO_PKG_VERSION"));

/// Loads feeds over HTTP.
#[derive(Debug, Clone)]
pub struct UrlFeedProvider {
    http_client: reqwest::Client,
}

impl UrlFeedProvider {
    /// Creates a provider with its own HTTP client.
    pub fn new() -> Result<Self, QuakeMapError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { http_client })
    }

    async fn load_from_web(&self, url: &str) -> Result<String, QuakeMapError> {
        let response = self.http_client.get(url).send().await?;
        if !response.status().is_success() {
            log::info!("Failed to load {url}: {}", response.status());
            return Err(QuakeMapError::fetch(
                url,
                format!("server responded with {}", response.status()),
            ));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl FeedProvider for UrlFeedProvider {
    async fn load(&self, location: &str) -> Result<FeatureCollection, QuakeMapError> {
        log::debug!("Loading feed from {location}");
        let text = self.load_from_web(location).await?;
        let collection = parse_collection(&text)?;
        log::info!(
            "Loaded {} features from {location}",
            collection.features.len()
        );

        Ok(collection)
    }
}
