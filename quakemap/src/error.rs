//! Error types used by the crate.

use thiserror::Error;

/// Quakemap error type.
#[derive(Debug, Error)]
pub enum QuakeMapError {
    /// Network or HTTP failure while loading a feed.
    #[error("failed to fetch {url}: {reason}")]
    Fetch {
        /// Requested URL or file path.
        url: String,
        /// Transport or status description.
        reason: String,
    },
    /// Feed content is not a valid GeoJSON feature collection.
    #[error("failed to parse GeoJSON: {0}")]
    Parse(#[from] geojson::Error),
    /// A feature lacks a field required to draw it.
    #[error("feature #{index} cannot be rendered: {reason}")]
    Render {
        /// Position of the feature in its collection.
        index: usize,
        /// What is missing or malformed.
        reason: String,
    },
    /// Configuration values are inconsistent.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// Configuration file is not valid JSON.
    #[error("failed to read configuration: {0}")]
    ConfigFormat(#[from] serde_json::Error),
    /// Tile URL template cannot be formatted.
    #[error("invalid url template: {0}")]
    Template(#[from] strfmt::FmtError),
    /// Error reading/writing data to the FS.
    #[error("file system error: {0}")]
    FsIo(#[from] std::io::Error),
}

impl QuakeMapError {
    pub(crate) fn fetch(url: &str, reason: impl ToString) -> Self {
        Self::Fetch {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn render(index: usize, reason: impl Into<String>) -> Self {
        Self::Render {
            index,
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for QuakeMapError {
    fn from(value: reqwest::Error) -> Self {
        let url = value
            .url()
            .map(|url| url.to_string())
            .unwrap_or_default();
        Self::Fetch {
            url,
            reason: value.to_string(),
        }
    }
}
