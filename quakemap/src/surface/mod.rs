//! The seam between the earthquake map logic and whatever actually draws the map.
//!
//! A [`MapSurface`] receives map options once, then a sequence of [`Layer`]s and [`Control`]s.
//! Layers are drawn in the order they were added. The crate provides [`MapDocument`], which
//! records everything it receives; interactive surfaces live in their own crates.

use serde::{Deserialize, Serialize};

use crate::config::MapOptions;
use crate::feature::PlateBoundary;
use crate::legend::Legend;
use crate::marker::{Marker, MarkerStyle};
use crate::tile::TileLayer;
use crate::Color;

mod document;

pub use document::MapDocument;

/// Something earthquake maps can be drawn on.
pub trait MapSurface {
    /// Initializes the map with its view parameters. Called once, before anything is added.
    fn create_map(&mut self, options: &MapOptions);
    /// Adds a layer on top of the previously added ones.
    fn add_layer(&mut self, layer: Layer);
    /// Adds a control to the map.
    fn add_control(&mut self, control: Control);
}

/// Corner of the map a control is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlPosition {
    /// Top left.
    TopLeft,
    /// Top right.
    TopRight,
    /// Bottom left.
    BottomLeft,
    /// Bottom right.
    #[default]
    BottomRight,
}

/// Stroke of polylines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineStyle {
    /// Line color.
    pub color: Color,
    /// Line width in pixels.
    pub width: f32,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Color::ORANGE,
            width: 2.0,
        }
    }
}

/// Circle markers sharing one style.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerLayer {
    /// Name shown in the layer switcher.
    pub name: String,
    /// Whether the layer is shown initially.
    pub visible: bool,
    /// Markers in drawing order.
    pub markers: Vec<Marker>,
    /// Stroke and fill of all markers.
    pub style: MarkerStyle,
}

/// Polylines sharing one style.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineLayer {
    /// Name shown in the layer switcher.
    pub name: String,
    /// Whether the layer is shown initially.
    pub visible: bool,
    /// Boundaries to draw.
    pub boundaries: Vec<PlateBoundary>,
    /// Stroke of all lines.
    pub style: LineStyle,
}

/// Map layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Layer {
    /// Raster base layer. At most one base layer is visible at a time.
    Tiles {
        /// Tile source.
        layer: TileLayer,
        /// Whether the layer is shown initially.
        visible: bool,
    },
    /// Earthquake markers.
    Markers(MarkerLayer),
    /// Plate boundaries.
    Lines(LineLayer),
}

impl Layer {
    /// Name of the layer.
    pub fn name(&self) -> &str {
        match self {
            Layer::Tiles { layer, .. } => &layer.name,
            Layer::Markers(layer) => &layer.name,
            Layer::Lines(layer) => &layer.name,
        }
    }

    /// Whether the layer is currently shown.
    pub fn is_visible(&self) -> bool {
        match self {
            Layer::Tiles { visible, .. } => *visible,
            Layer::Markers(layer) => layer.visible,
            Layer::Lines(layer) => layer.visible,
        }
    }

    /// Shows or hides the layer.
    pub fn set_visible(&mut self, is_visible: bool) {
        match self {
            Layer::Tiles { visible, .. } => *visible = is_visible,
            Layer::Markers(layer) => layer.visible = is_visible,
            Layer::Lines(layer) => layer.visible = is_visible,
        }
    }

    /// Returns true for base layers.
    pub fn is_base_layer(&self) -> bool {
        matches!(self, Layer::Tiles { .. })
    }
}

/// Map control.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Control {
    /// Depth legend.
    Legend {
        /// Legend rows.
        legend: Legend,
        /// Corner the legend is anchored to.
        position: ControlPosition,
    },
    /// Radio choice between base layers and toggles for overlays.
    LayerSwitcher {
        /// Names of the base layers.
        base_layers: Vec<String>,
        /// Names of the overlay layers.
        overlays: Vec<String>,
    },
    /// Messages about data that could not be shown.
    Notice(Notice),
}

/// List of problems met while loading the map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// One line per problem.
    pub messages: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_visibility() {
        let mut layer = Layer::Tiles {
            layer: TileLayer::street_map(),
            visible: false,
        };
        assert_eq!(layer.name(), "Street Map");
        assert!(layer.is_base_layer());
        assert!(!layer.is_visible());

        layer.set_visible(true);
        assert!(layer.is_visible());

        let lines = Layer::Lines(LineLayer {
            name: "Tectonic Plates".into(),
            visible: true,
            boundaries: vec![],
            style: LineStyle::default(),
        });
        assert!(!lines.is_base_layer());
        assert_eq!(lines.name(), "Tectonic Plates");
    }

    #[test]
    fn default_line_style() {
        let style = LineStyle::default();
        assert_eq!(style.color.to_hex(), "#FFA500");
        assert_eq!(style.width, 2.0);
    }
}
