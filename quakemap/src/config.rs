//! Configuration of a map: initial view, feed locations, base layers and styling.
//!
//! All sections are optional in the JSON form and fall back to the defaults, which reproduce the
//! USGS weekly earthquake map with tectonic plate boundaries:
//!
//! ```
//! use quakemap::config::QuakeMapConfig;
//!
//! let config = QuakeMapConfig::from_json_str(r#"{ "map": { "zoom": 5 } }"#)?;
//! assert_eq!(config.map.zoom, 5.0);
//! assert_eq!(config.style.magnitude_radius_scale, 5.0);
//! # Ok::<(), quakemap::error::QuakeMapError>(())
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::depth::{DepthBucket, DepthScale, DEFAULT_BUCKETS};
use crate::error::QuakeMapError;
use crate::geo::{GeoBounds, GeoPoint};
use crate::marker::{MarkerStyle, PopupTimeZone};
use crate::surface::{ControlPosition, LineStyle};
use crate::tile::{TileLayer, MAX_TILE_ZOOM};
use crate::view::MapView;

/// USGS summary feed with all earthquakes of the past week.
pub const USGS_ALL_WEEK_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson";

/// PB2002 plate boundaries.
pub const PB2002_BOUNDARIES_URL: &str =
    "https://raw.githubusercontent.com/fraxen/tectonicplates/master/GeoJSON/PB2002_boundaries.json";

/// Complete map configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuakeMapConfig {
    /// Initial view.
    pub map: MapOptions,
    /// Data sources.
    pub feeds: FeedConfig,
    /// Base layers. The first usable one is shown initially.
    pub base_layers: Vec<TileLayer>,
    /// Marker, line and legend styling.
    pub style: StyleConfig,
}

/// Parameters the map surface is created with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapOptions {
    /// Initial center.
    pub center: GeoPoint,
    /// Initial zoom.
    pub zoom: f64,
    /// Minimum zoom the user can reach.
    pub min_zoom: f64,
    /// Maximum zoom the user can reach.
    pub max_zoom: f64,
    /// Area the view center can not leave.
    pub max_bounds: Option<GeoBounds>,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            center: GeoPoint::latlon(-37.8136, 144.9631),
            zoom: 3.0,
            min_zoom: 0.0,
            max_zoom: 20.0,
            max_bounds: Some(GeoBounds::world()),
        }
    }
}

impl MapOptions {
    /// View the map starts with, before the surface size is known.
    pub fn initial_view(&self) -> MapView {
        let view = MapView::new(self.center, self.zoom).with_zoom_range(self.min_zoom, self.max_zoom);
        match self.max_bounds {
            Some(bounds) => view.with_max_bounds(bounds),
            None => view,
        }
    }
}

/// Locations of the GeoJSON feeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Earthquake feed.
    pub earthquakes: String,
    /// Plate boundaries feed. No plates layer is created when absent.
    pub plates: Option<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            earthquakes: USGS_ALL_WEEK_URL.into(),
            plates: Some(PB2002_BOUNDARIES_URL.into()),
        }
    }
}

/// Styling shared by the classifier, the marker renderer and the legend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Depth buckets in ascending order.
    pub buckets: Vec<DepthBucket>,
    /// Marker radius per unit of magnitude.
    pub magnitude_radius_scale: f64,
    /// Marker stroke and fill parameters.
    pub marker: MarkerStyle,
    /// Plate boundary lines.
    pub plates: LineStyle,
    /// Corner of the map holding the legend.
    pub legend_position: ControlPosition,
    /// Time zone of the dates in marker popups.
    pub time_zone: PopupTimeZone,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            buckets: DEFAULT_BUCKETS.to_vec(),
            magnitude_radius_scale: 5.0,
            marker: MarkerStyle::default(),
            plates: LineStyle::default(),
            legend_position: ControlPosition::BottomRight,
            time_zone: PopupTimeZone::Local,
        }
    }
}

impl Default for QuakeMapConfig {
    fn default() -> Self {
        Self {
            map: MapOptions::default(),
            feeds: FeedConfig::default(),
            base_layers: vec![TileLayer::street_map(), TileLayer::terrain_map()],
            style: StyleConfig::default(),
        }
    }
}

impl QuakeMapConfig {
    /// Single street base layer and no plates feed.
    pub fn earthquakes_only() -> Self {
        Self {
            feeds: FeedConfig {
                plates: None,
                ..Default::default()
            },
            base_layers: vec![TileLayer::street_map()],
            ..Default::default()
        }
    }

    /// Parses configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, QuakeMapError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, QuakeMapError> {
        let path = path.as_ref();
        log::debug!("Reading configuration from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Checks that the values are consistent with each other.
    pub fn validate(&self) -> Result<(), QuakeMapError> {
        self.depth_scale()?;

        let scale = self.style.magnitude_radius_scale;
        if !scale.is_finite() || scale < 0.0 {
            return Err(QuakeMapError::Config(format!(
                "magnitude radius scale must be a non-negative number, got {scale}"
            )));
        }

        let map = &self.map;
        if map.min_zoom > map.max_zoom {
            return Err(QuakeMapError::Config(format!(
                "min zoom {} is greater than max zoom {}",
                map.min_zoom, map.max_zoom
            )));
        }

        if !map.zoom.is_finite() || map.max_zoom > MAX_TILE_ZOOM as f64 {
            return Err(QuakeMapError::Config(format!(
                "zoom levels must be finite and not above {MAX_TILE_ZOOM}"
            )));
        }

        if let Some(bounds) = &map.max_bounds {
            if !bounds.is_ordered() {
                return Err(QuakeMapError::Config(
                    "max bounds south-west corner must be below and left of the north-east corner"
                        .into(),
                ));
            }
        }

        for layer in &self.base_layers {
            if layer.max_zoom > MAX_TILE_ZOOM || layer.min_zoom > layer.max_zoom {
                return Err(QuakeMapError::Config(format!(
                    "base layer '{}' zoom range {}..={} is not within 0..={MAX_TILE_ZOOM}",
                    layer.name, layer.min_zoom, layer.max_zoom
                )));
            }
        }

        if self.feeds.earthquakes.is_empty() {
            return Err(QuakeMapError::Config(
                "earthquake feed location is empty".into(),
            ));
        }

        Ok(())
    }

    /// Builds the depth classifier from the configured buckets.
    pub fn depth_scale(&self) -> Result<DepthScale, QuakeMapError> {
        DepthScale::new(self.style.buckets.clone())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::Color;

    #[test]
    fn empty_json_gives_defaults() {
        let config = QuakeMapConfig::from_json_str("{}").unwrap();
        assert_eq!(config, QuakeMapConfig::default());
        assert_eq!(config.base_layers.len(), 2);
        assert_eq!(config.style.buckets.len(), 6);
        assert_eq!(config.feeds.plates.as_deref(), Some(PB2002_BOUNDARIES_URL));
    }

    #[test]
    fn partial_sections() {
        let config = QuakeMapConfig::from_json_str(
            r##"{
                "feeds": { "plates": null },
                "style": {
                    "magnitude_radius_scale": 3,
                    "buckets": [
                        { "lower_km": 0, "upper_km": 50, "color": "#FFFFFF" },
                        { "lower_km": 50, "color": "#000000" }
                    ],
                    "time_zone": "utc",
                    "legend_position": "top_left"
                }
            }"##,
        )
        .unwrap();

        assert_eq!(config.feeds.plates, None);
        assert_eq!(config.feeds.earthquakes, USGS_ALL_WEEK_URL);
        assert_eq!(config.style.magnitude_radius_scale, 3.0);
        assert_eq!(config.style.time_zone, PopupTimeZone::Utc);
        assert_eq!(config.style.legend_position, ControlPosition::TopLeft);
        assert_eq!(config.depth_scale().unwrap().color(60.0), Color::BLACK);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert_matches!(
            QuakeMapConfig::from_json_str(r#"{ "style": { "buckets": [] } }"#),
            Err(QuakeMapError::Config(_))
        );
        assert_matches!(
            QuakeMapConfig::from_json_str(r#"{ "style": { "magnitude_radius_scale": -1 } }"#),
            Err(QuakeMapError::Config(_))
        );
        assert_matches!(
            QuakeMapConfig::from_json_str(r#"{ "map": { "min_zoom": 5, "max_zoom": 2 } }"#),
            Err(QuakeMapError::Config(_))
        );
        assert_matches!(
            QuakeMapConfig::from_json_str(r#"{ "map": { "zoom": 32, "max_zoom": 40 } }"#),
            Err(QuakeMapError::Config(_))
        );
        assert_matches!(
            QuakeMapConfig::from_json_str(
                r#"{ "base_layers": [
                    { "name": "Deep", "url_template": "https://t/{z}/{x}/{y}.png", "max_zoom": 40 }
                ] }"#
            ),
            Err(QuakeMapError::Config(_))
        );
        assert_matches!(
            QuakeMapConfig::from_json_str(
                r#"{ "map": { "max_bounds": {
                    "south_west": { "lat": 10, "lon": 10 },
                    "north_east": { "lat": -10, "lon": -10 }
                } } }"#
            ),
            Err(QuakeMapError::Config(_))
        );
        assert_matches!(
            QuakeMapConfig::from_json_str(r#"{ "map": "#),
            Err(QuakeMapError::ConfigFormat(_))
        );
    }

    #[test]
    fn earthquakes_only_preset() {
        let config = QuakeMapConfig::earthquakes_only();
        assert_eq!(config.feeds.plates, None);
        assert_eq!(config.base_layers, vec![TileLayer::street_map()]);
    }

    #[test]
    fn initial_view_respects_limits() {
        let options = MapOptions {
            zoom: 25.0,
            max_bounds: Some(GeoBounds::from_corners(
                GeoPoint::latlon(-10.0, -10.0),
                GeoPoint::latlon(10.0, 10.0),
            )),
            ..Default::default()
        };
        let view = options.initial_view();
        assert_eq!(view.zoom(), 20.0);
        assert_eq!(view.center(), GeoPoint::latlon(-10.0, 10.0));
    }

    #[test]
    fn missing_file() {
        assert_matches!(
            QuakeMapConfig::from_file("does/not/exist.json"),
            Err(QuakeMapError::FsIo(_))
        );
    }
}
