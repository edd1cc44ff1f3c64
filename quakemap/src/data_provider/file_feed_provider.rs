use async_trait::async_trait;
use geojson::FeatureCollection;

use super::FeedProvider;
use crate::error::QuakeMapError;
use crate::feature::parse_collection;

/// Reads feeds from local GeoJSON files.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFeedProvider;

#[async_trait]
impl FeedProvider for FileFeedProvider {
    async fn load(&self, location: &str) -> Result<FeatureCollection, QuakeMapError> {
        let text = tokio::fs::read_to_string(location)
            .await
            .map_err(|err| QuakeMapError::fetch(location, err))?;
        let collection = parse_collection(&text)?;
        log::info!(
            "Loaded {} features from {location}",
            collection.features.len()
        );

        Ok(collection)
    }
}
