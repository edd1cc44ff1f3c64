//! Conversion of earthquake features into circle markers with popups.

use chrono::{DateTime, Local, Utc};
use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};

use crate::config::StyleConfig;
use crate::depth::DepthScale;
use crate::error::QuakeMapError;
use crate::feature::EarthquakeFeature;
use crate::geo::GeoPoint;
use crate::Color;

/// Date layout of popups, `11/14/2023, 10:13:20 PM`.
pub const POPUP_DATE_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Time zone used to display event dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PopupTimeZone {
    /// Time zone of the machine running the map.
    #[default]
    Local,
    /// Coordinated universal time.
    Utc,
}

/// Stroke and fill parameters shared by all markers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerStyle {
    /// Outline color.
    pub stroke_color: Color,
    /// Outline width in pixels.
    pub stroke_weight: f32,
    /// Outline opacity.
    pub stroke_opacity: f32,
    /// Fill opacity.
    pub fill_opacity: f32,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            stroke_color: Color::BLACK,
            stroke_weight: 1.0,
            stroke_opacity: 1.0,
            fill_opacity: 0.8,
        }
    }
}

/// Content of the popup attached to a marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    /// Event location.
    pub place: String,
    /// Event magnitude.
    pub magnitude: f64,
    /// Depth in kilometers.
    pub depth_km: f64,
    /// Formatted origin time.
    pub date: String,
}

impl Popup {
    /// Popup as lines of `Label: value` text.
    pub fn to_text(&self) -> String {
        format!(
            "Location: {}\nMagnitude: {}\nDepth: {} km\nDate: {}",
            self.place, self.magnitude, self.depth_km, self.date
        )
    }

    /// Popup as HTML with bold labels.
    pub fn to_html(&self) -> String {
        format!(
            "<strong>Location:</strong> {}<br><strong>Magnitude:</strong> {}<br><strong>Depth:</strong> {} km<br><strong>Date:</strong> {}",
            escape_html(&self.place),
            self.magnitude,
            self.depth_km,
            escape_html(&self.date)
        )
    }
}

impl std::fmt::Display for Popup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_text())
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Circle drawn for one earthquake.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    /// Circle center.
    pub position: GeoPoint,
    /// Circle radius in pixels. Not clamped: zero or negative magnitudes give zero or negative
    /// radius, and it is up to the surface how such markers are drawn.
    pub radius: f64,
    /// Fill color from the depth classification.
    pub fill_color: Color,
    /// Popup content.
    pub popup: Popup,
}

/// Result of rendering a whole feed.
#[derive(Debug, Default)]
pub struct RenderedFeatures {
    /// Markers of the well-formed features in feed order.
    pub markers: Vec<Marker>,
    /// One error for every feature that was skipped.
    pub errors: Vec<QuakeMapError>,
}

/// Maps earthquakes to markers: radius from magnitude, color from depth.
#[derive(Debug, Clone)]
pub struct MarkerRenderer {
    scale: DepthScale,
    magnitude_radius_scale: f64,
    time_zone: PopupTimeZone,
}

impl MarkerRenderer {
    /// Creates a new renderer.
    pub fn new(scale: DepthScale, magnitude_radius_scale: f64, time_zone: PopupTimeZone) -> Self {
        Self {
            scale,
            magnitude_radius_scale,
            time_zone,
        }
    }

    /// Creates a renderer from the style section of the configuration.
    pub fn from_style(style: &StyleConfig) -> Result<Self, QuakeMapError> {
        Ok(Self::new(
            DepthScale::new(style.buckets.clone())?,
            style.magnitude_radius_scale,
            style.time_zone,
        ))
    }

    /// Depth classifier used for fill colors.
    pub fn scale(&self) -> &DepthScale {
        &self.scale
    }

    /// Builds the marker of a single earthquake.
    pub fn render(&self, feature: &EarthquakeFeature) -> Marker {
        Marker {
            position: feature.position,
            radius: feature.magnitude * self.magnitude_radius_scale,
            fill_color: self.scale.color(feature.depth_km),
            popup: Popup {
                place: feature.place.clone(),
                magnitude: feature.magnitude,
                depth_km: feature.depth_km,
                date: self.format_date(feature.time_epoch_millis),
            },
        }
    }

    /// Builds markers for every feature of the collection.
    ///
    /// Features lacking magnitude, time or depth are skipped and reported in
    /// [`RenderedFeatures::errors`]; the rest are rendered.
    pub fn render_collection(&self, collection: &FeatureCollection) -> RenderedFeatures {
        let mut rendered = RenderedFeatures::default();
        for (index, feature) in collection.features.iter().enumerate() {
            match EarthquakeFeature::from_geojson(index, feature) {
                Ok(quake) => rendered.markers.push(self.render(&quake)),
                Err(err) => {
                    log::warn!("Skipping earthquake feature: {err}");
                    rendered.errors.push(err);
                }
            }
        }

        log::debug!(
            "Rendered {} markers, skipped {} features",
            rendered.markers.len(),
            rendered.errors.len()
        );

        rendered
    }

    /// Formats epoch milliseconds with [`POPUP_DATE_FORMAT`] in the configured time zone.
    pub fn format_date(&self, epoch_millis: i64) -> String {
        let Some(date) = DateTime::<Utc>::from_timestamp_millis(epoch_millis) else {
            return "Invalid Date".into();
        };

        match self.time_zone {
            PopupTimeZone::Utc => date.format(POPUP_DATE_FORMAT).to_string(),
            PopupTimeZone::Local => date
                .with_timezone(&Local)
                .format(POPUP_DATE_FORMAT)
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    use insta::assert_snapshot;

    use super::*;
    use crate::feature::parse_collection;

    fn renderer() -> MarkerRenderer {
        MarkerRenderer::new(DepthScale::default(), 5.0, PopupTimeZone::Utc)
    }

    fn quake(magnitude: f64, depth_km: f64) -> EarthquakeFeature {
        EarthquakeFeature {
            place: "5 km N of Somewhere".into(),
            magnitude,
            depth_km,
            time_epoch_millis: 1_700_000_000_000,
            position: GeoPoint::latlon(10.0, 20.0),
        }
    }

    #[test]
    fn radius_and_color() {
        let marker = renderer().render(&quake(4.0, 15.0));
        assert_abs_diff_eq!(marker.radius, 20.0);
        assert_eq!(marker.fill_color.to_hex(), "#FF3399");
        assert_eq!(marker.position, GeoPoint::latlon(10.0, 20.0));
    }

    #[test]
    fn radius_is_not_clamped() {
        assert_abs_diff_eq!(renderer().render(&quake(0.0, 5.0)).radius, 0.0);
        assert_abs_diff_eq!(renderer().render(&quake(-0.5, 5.0)).radius, -2.5);
    }

    #[test]
    fn negative_depth_is_shallowest() {
        let marker = renderer().render(&quake(1.0, -5.0));
        assert_eq!(marker.fill_color.to_hex(), "#FF66CC");
    }

    #[test]
    fn popup_text() {
        let marker = renderer().render(&quake(4.5, 10.0));
        assert_snapshot!(marker.popup.to_text(), @r"
        Location: 5 km N of Somewhere
        Magnitude: 4.5
        Depth: 10 km
        Date: 11/14/2023, 10:13:20 PM
        ");
        assert_eq!(marker.popup.to_string(), marker.popup.to_text());
    }

    #[test]
    fn popup_html_is_escaped() {
        let mut feature = quake(2.0, 3.5);
        feature.place = "<b>Cafe & Bar</b>".into();
        let html = renderer().render(&feature).popup.to_html();
        assert_snapshot!(html, @"<strong>Location:</strong> &lt;b&gt;Cafe &amp; Bar&lt;/b&gt;<br><strong>Magnitude:</strong> 2<br><strong>Depth:</strong> 3.5 km<br><strong>Date:</strong> 11/14/2023, 10:13:20 PM");
    }

    #[test]
    fn dates() {
        let renderer = renderer();
        assert_eq!(renderer.format_date(0), "1/1/1970, 12:00:00 AM");
        assert_eq!(renderer.format_date(i64::MAX), "Invalid Date");
    }

    #[test]
    fn collection_skips_malformed_features() {
        let collection = parse_collection(
            r#"{
                "type": "FeatureCollection",
                "features": [
                    { "type": "Feature", "properties": { "mag": 1.2, "place": "A", "time": 0 },
                      "geometry": { "type": "Point", "coordinates": [1, 2, 95] } },
                    { "type": "Feature", "properties": { "mag": null, "place": "B", "time": 0 },
                      "geometry": { "type": "Point", "coordinates": [1, 2, 5] } },
                    { "type": "Feature", "properties": { "mag": 3, "place": "C", "time": 0 },
                      "geometry": { "type": "Point", "coordinates": [1, 2, 40] } }
                ]
            }"#,
        )
        .unwrap();

        let rendered = renderer().render_collection(&collection);
        assert_eq!(rendered.markers.len(), 2);
        assert_eq!(rendered.markers[0].fill_color.to_hex(), "#330066");
        assert_eq!(rendered.markers[1].popup.place, "C");
        assert_eq!(rendered.errors.len(), 1);
        assert_matches!(rendered.errors[0], QuakeMapError::Render { index: 1, .. });
    }

    #[test]
    fn from_style() {
        let renderer = MarkerRenderer::from_style(&StyleConfig::default()).unwrap();
        assert_eq!(renderer.scale(), &DepthScale::default());
        assert_abs_diff_eq!(renderer.render(&quake(2.0, 0.0)).radius, 10.0);
    }
}
