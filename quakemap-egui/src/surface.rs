use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use quakemap::config::MapOptions;
use quakemap::surface::{Control, Layer, MapSurface};
use quakemap::Attribution;

/// Everything added to the map so far.
#[derive(Debug, Default)]
pub struct SurfaceState {
    /// Options given to `create_map`.
    pub options: Option<MapOptions>,
    /// Layers in drawing order.
    pub layers: Vec<Layer>,
    /// Controls in the order they were added.
    pub controls: Vec<Control>,
}

impl SurfaceState {
    /// Shows the named base layer and hides all other base layers.
    pub fn select_base_layer(&mut self, name: &str) {
        for layer in self.layers.iter_mut().filter(|l| l.is_base_layer()) {
            let is_selected = layer.name() == name;
            layer.set_visible(is_selected);
        }
    }

    /// Name of the visible base layer.
    pub fn selected_base_layer(&self) -> Option<&str> {
        self.layers
            .iter()
            .find(|l| l.is_base_layer() && l.is_visible())
            .map(|l| l.name())
    }

    /// Shows or hides the named overlay.
    pub fn set_overlay_visible(&mut self, name: &str, visible: bool) {
        for layer in self
            .layers
            .iter_mut()
            .filter(|l| !l.is_base_layer() && l.name() == name)
        {
            layer.set_visible(visible);
        }
    }

    /// Returns true if the named overlay is shown.
    pub fn is_overlay_visible(&self, name: &str) -> bool {
        self.layers
            .iter()
            .any(|l| !l.is_base_layer() && l.name() == name && l.is_visible())
    }

    /// Attributions of the visible base layers.
    pub fn attributions(&self) -> Vec<Attribution> {
        self.layers
            .iter()
            .filter_map(|layer| match layer {
                Layer::Tiles {
                    layer,
                    visible: true,
                } => layer.attribution.clone(),
                _ => None,
            })
            .collect()
    }
}

/// Map surface that can be filled from a background task while the UI is drawing it.
#[derive(Debug, Clone)]
pub struct SharedSurface {
    state: Arc<RwLock<SurfaceState>>,
    messenger: MapStateMessenger,
}

impl SharedSurface {
    /// Creates an empty surface that repaints the given context on every change.
    pub fn new(context: egui::Context) -> Self {
        Self {
            state: Arc::new(RwLock::new(SurfaceState::default())),
            messenger: MapStateMessenger {
                requires_sync: Arc::new(AtomicBool::new(true)),
                context,
            },
        }
    }

    /// Shared state of the surface.
    pub fn state(&self) -> Arc<RwLock<SurfaceState>> {
        self.state.clone()
    }

    pub(crate) fn messenger(&self) -> MapStateMessenger {
        self.messenger.clone()
    }
}

impl MapSurface for SharedSurface {
    fn create_map(&mut self, options: &MapOptions) {
        self.state.write().options = Some(options.clone());
        self.messenger.request_sync();
    }

    fn add_layer(&mut self, layer: Layer) {
        log::debug!("Layer '{}' added to the map", layer.name());
        self.state.write().layers.push(layer);
        self.messenger.request_sync();
    }

    fn add_control(&mut self, control: Control) {
        self.state.write().controls.push(control);
        self.messenger.request_sync();
    }
}

/// Notifies the UI that the surface state was changed from another thread.
#[derive(Debug, Clone)]
pub(crate) struct MapStateMessenger {
    pub requires_sync: Arc<AtomicBool>,
    pub context: egui::Context,
}

impl MapStateMessenger {
    fn request_sync(&self) {
        log::trace!("Map state changed");
        if !self.requires_sync.swap(true, Ordering::Relaxed) {
            self.context.request_repaint();
        }
    }

    /// Returns true once after every change.
    pub fn take_sync_request(&self) -> bool {
        self.requires_sync.swap(false, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use quakemap::surface::{LineLayer, LineStyle};
    use quakemap::tile::TileLayer;

    use super::*;

    fn surface() -> SharedSurface {
        let mut surface = SharedSurface::new(egui::Context::default());
        surface.create_map(&MapOptions::default());
        for layer in [TileLayer::street_map(), TileLayer::terrain_map()] {
            surface.add_layer(Layer::Tiles {
                layer,
                visible: false,
            });
        }
        surface.add_layer(Layer::Lines(LineLayer {
            name: "Tectonic Plates".into(),
            visible: false,
            boundaries: vec![],
            style: LineStyle::default(),
        }));
        surface
    }

    #[test]
    fn changes_request_sync() {
        let surface = surface();
        let messenger = surface.messenger();
        assert!(messenger.take_sync_request());
        assert!(!messenger.take_sync_request());

        let mut writer = surface.clone();
        writer.add_control(Control::LayerSwitcher {
            base_layers: vec![],
            overlays: vec![],
        });
        assert!(messenger.take_sync_request());
        assert_eq!(surface.state().read().controls.len(), 1);
    }

    #[test]
    fn base_layer_selection() {
        let surface = surface();
        let state = surface.state();
        let mut state = state.write();
        assert_eq!(state.selected_base_layer(), None);

        state.select_base_layer("Terrain Map");
        assert_eq!(state.selected_base_layer(), Some("Terrain Map"));
        assert_eq!(state.attributions().len(), 1);

        state.select_base_layer("Street Map");
        assert_eq!(state.selected_base_layer(), Some("Street Map"));
        assert!(state.attributions()[0].text().contains("OpenStreetMap"));
    }

    #[test]
    fn overlay_toggle() {
        let surface = surface();
        let state = surface.state();
        let mut state = state.write();

        state.set_overlay_visible("Tectonic Plates", true);
        assert!(state.is_overlay_visible("Tectonic Plates"));

        state.set_overlay_visible("Street Map", false);
        state.select_base_layer("Street Map");
        assert_eq!(state.selected_base_layer(), Some("Street Map"));
    }
}
