//! Sources of GeoJSON feeds.

use async_trait::async_trait;
use geojson::FeatureCollection;

use crate::error::QuakeMapError;

mod file_feed_provider;
mod url_feed_provider;

pub use file_feed_provider::FileFeedProvider;
pub use url_feed_provider::UrlFeedProvider;

/// Loads a feature collection from a location: a URL, a file path, a key of an in-memory store.
#[async_trait]
pub trait FeedProvider: Send + Sync {
    /// Loads and parses the feed at `location`.
    async fn load(&self, location: &str) -> Result<FeatureCollection, QuakeMapError>;
}

#[async_trait]
impl<T: FeedProvider + ?Sized> FeedProvider for Box<T> {
    async fn load(&self, location: &str) -> Result<FeatureCollection, QuakeMapError> {
        (**self).load(location).await
    }
}

/// Picks a provider by the form of the location: `http(s)://` URLs are fetched over the network,
/// anything else is read from the file system.
#[derive(Debug, Clone)]
pub struct AutoFeedProvider {
    url: UrlFeedProvider,
    file: FileFeedProvider,
}

impl AutoFeedProvider {
    /// Creates a new provider.
    pub fn new() -> Result<Self, QuakeMapError> {
        Ok(Self {
            url: UrlFeedProvider::new()?,
            file: FileFeedProvider,
        })
    }
}

#[async_trait]
impl FeedProvider for AutoFeedProvider {
    async fn load(&self, location: &str) -> Result<FeatureCollection, QuakeMapError> {
        if is_url(location) {
            self.url.load(location).await
        } else {
            self.file.load(location).await
        }
    }
}

fn is_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}
