use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde::Serialize;
use serde_json::json;

use super::{Control, Layer, MapSurface, MarkerLayer, Notice};
use crate::config::MapOptions;
use crate::error::QuakeMapError;
use crate::legend::Legend;

/// Map surface that records what it is given.
///
/// Used for headless export: the recorded map can be written as JSON, and the markers as a styled
/// GeoJSON collection that web map libraries can draw directly.
#[derive(Debug, Default, Clone, Serialize)]
pub struct MapDocument {
    options: Option<MapOptions>,
    layers: Vec<Layer>,
    controls: Vec<Control>,
}

impl MapDocument {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options the map was created with.
    pub fn options(&self) -> Option<&MapOptions> {
        self.options.as_ref()
    }

    /// Layers in drawing order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Controls in the order they were added.
    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    /// Returns the first layer with the given name.
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.name() == name)
    }

    /// Returns the marker layers.
    pub fn marker_layers(&self) -> impl Iterator<Item = &MarkerLayer> {
        self.layers.iter().filter_map(|layer| match layer {
            Layer::Markers(markers) => Some(markers),
            _ => None,
        })
    }

    /// Returns the legend, if one was added.
    pub fn legend(&self) -> Option<&Legend> {
        self.controls.iter().find_map(|control| match control {
            Control::Legend { legend, .. } => Some(legend),
            _ => None,
        })
    }

    /// Returns the notice, if one was added.
    pub fn notice(&self) -> Option<&Notice> {
        self.controls.iter().find_map(|control| match control {
            Control::Notice(notice) => Some(notice),
            _ => None,
        })
    }

    /// Serializes the whole document.
    pub fn to_json(&self) -> Result<String, QuakeMapError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Markers of all marker layers as GeoJSON points.
    ///
    /// Every feature carries the popup fields and the Leaflet path options (`radius`,
    /// `fillColor`, `color`, `weight`, `opacity`, `fillOpacity`) it should be drawn with.
    pub fn markers_geojson(&self) -> FeatureCollection {
        let features = self
            .marker_layers()
            .flat_map(|layer| {
                layer.markers.iter().map(move |marker| {
                    let style = &layer.style;
                    let properties = json!({
                        "layer": layer.name,
                        "place": marker.popup.place,
                        "mag": marker.popup.magnitude,
                        "depth": marker.popup.depth_km,
                        "date": marker.popup.date,
                        "popup": marker.popup.to_html(),
                        "radius": marker.radius,
                        "fillColor": marker.fill_color,
                        "fillOpacity": style.fill_opacity,
                        "color": style.stroke_color,
                        "weight": style.stroke_weight,
                        "opacity": style.stroke_opacity,
                    });

                    Feature {
                        bbox: None,
                        geometry: Some(Geometry::new(Value::Point(
                            marker.position.to_position(),
                        ))),
                        id: None,
                        properties: match properties {
                            serde_json::Value::Object(map) => Some(map),
                            _ => Some(JsonObject::new()),
                        },
                        foreign_members: None,
                    }
                })
            })
            .collect();

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

impl MapSurface for MapDocument {
    fn create_map(&mut self, options: &MapOptions) {
        log::debug!(
            "Creating map document centered at {:?}, zoom {}",
            options.center,
            options.zoom
        );
        self.options = Some(options.clone());
    }

    fn add_layer(&mut self, layer: Layer) {
        log::trace!("Layer added to document: {}", layer.name());
        self.layers.push(layer);
    }

    fn add_control(&mut self, control: Control) {
        self.controls.push(control);
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::depth::DepthScale;
    use crate::geo::GeoPoint;
    use crate::marker::{Marker, MarkerStyle, Popup};
    use crate::surface::ControlPosition;
    use crate::Color;

    fn document() -> MapDocument {
        let mut document = MapDocument::new();
        document.create_map(&MapOptions::default());
        document.add_layer(Layer::Markers(MarkerLayer {
            name: "Earthquakes".into(),
            visible: true,
            markers: vec![Marker {
                position: GeoPoint::latlon(-41.3, 174.8),
                radius: 12.5,
                fill_color: Color::from_hex("#CC00FF"),
                popup: Popup {
                    place: "Wellington".into(),
                    magnitude: 2.5,
                    depth_km: 33.0,
                    date: "1/1/1970, 12:00:00 AM".into(),
                },
            }],
            style: MarkerStyle::default(),
        }));
        document.add_control(Control::Legend {
            legend: Legend::build(&DepthScale::default()),
            position: ControlPosition::BottomRight,
        });
        document
    }

    #[test]
    fn records_surface_calls() {
        let document = document();
        assert_eq!(document.options(), Some(&MapOptions::default()));
        assert_eq!(document.layers().len(), 1);
        assert!(document.layer("Earthquakes").is_some());
        assert_eq!(document.legend().map(|l| l.entries().len()), Some(6));
        assert_eq!(document.notice(), None);
    }

    #[test]
    fn styled_geojson() {
        let collection = document().markers_geojson();
        assert_eq!(collection.features.len(), 1);

        let feature = &collection.features[0];
        assert_eq!(
            feature.geometry.as_ref().map(|g| g.value.clone()),
            Some(Value::Point(vec![174.8, -41.3]))
        );
        assert_eq!(
            feature.property("fillColor").and_then(|v| v.as_str()),
            Some("#CC00FF")
        );
        assert_eq!(
            feature.property("color").and_then(|v| v.as_str()),
            Some("#000000")
        );
        assert_abs_diff_eq!(
            feature.property("radius").and_then(|v| v.as_f64()).unwrap(),
            12.5
        );
    }

    #[test]
    fn json_export() {
        let json: serde_json::Value = serde_json::from_str(&document().to_json().unwrap()).unwrap();
        assert_eq!(json["layers"][0]["type"], "markers");
        assert_eq!(json["layers"][0]["name"], "Earthquakes");
        assert_eq!(json["controls"][0]["type"], "legend");
        assert_eq!(json["controls"][0]["position"], "bottom_right");
        assert_eq!(json["controls"][0]["legend"]["entries"][5]["label"], "90+");
    }
}
