use std::sync::Arc;

use egui::{Align2, Pos2, Rect, RichText, Sense, Shape, Stroke, Ui};
use parking_lot::RwLock;
use quakemap::geo::GeoPoint;
use quakemap::marker::{Marker, Popup};
use quakemap::surface::{Control, ControlPosition, Layer, LineLayer, MarkerLayer, Notice};
use quakemap::tile::TileLayer;
use quakemap::view::{MapView, ScreenPoint};
use quakemap::Attribution;

use crate::legend::EguiLegend;
use crate::surface::{MapStateMessenger, SharedSurface, SurfaceState};
use crate::to_color32;

/// Markers smaller than this are still clickable within this radius.
const MIN_HIT_RADIUS: f64 = 4.0;
/// Scroll points per zoom level.
const SCROLL_PER_ZOOM: f32 = 200.0;
const CONTROL_MARGIN: f32 = 10.0;

/// UI state of a map drawn from a [`SharedSurface`].
pub struct EguiMapState {
    state: Arc<RwLock<SurfaceState>>,
    messenger: MapStateMessenger,
    view: Option<MapView>,
    popup: Option<(GeoPoint, Popup)>,
}

impl EguiMapState {
    /// Creates UI state for the surface.
    pub fn new(surface: &SharedSurface) -> Self {
        Self {
            state: surface.state(),
            messenger: surface.messenger(),
            view: None,
            popup: None,
        }
    }

    /// Draws the map with all its layers and controls into the remaining space of `ui`.
    pub fn render(&mut self, ui: &mut Ui) {
        let available_size = ui.available_size().floor();
        let (rect, response) = ui.allocate_exact_size(available_size, Sense::click_and_drag());

        if self.messenger.take_sync_request() && self.view.is_none() {
            if let Some(options) = &self.state.read().options {
                log::debug!("Map created at {:?}", options.center);
                self.view = Some(options.initial_view());
            }
        }

        let Some(view) = self.view else {
            ui.put(rect, egui::Spinner::new());
            return;
        };

        let mut view = view.with_size(rect.width() as f64, rect.height() as f64);
        if response.dragged() {
            let delta = response.drag_delta();
            view.pan_by(delta.x as f64, delta.y as f64);
        }

        if let Some(pointer) = response.hover_pos() {
            let scroll = ui.input(|input| input.smooth_scroll_delta.y);
            if scroll.abs() > f32::EPSILON {
                view.zoom_by(
                    (scroll / SCROLL_PER_ZOOM) as f64,
                    to_screen_point(rect, pointer),
                );
            }
        }
        self.view = Some(view);

        let state = self.state.read();
        if response.clicked() {
            if let Some(pointer) = response.interact_pointer_pos() {
                self.popup = marker_at(&view, &state.layers, to_screen_point(rect, pointer))
                    .map(|marker| (marker.position, marker.popup.clone()));
            }
        }

        let painter = ui.painter_at(rect);
        for layer in state.layers.iter().filter(|layer| layer.is_visible()) {
            match layer {
                Layer::Tiles { layer, .. } => draw_tiles(ui, rect, &view, layer),
                Layer::Markers(markers) => draw_markers(&painter, rect, &view, markers),
                Layer::Lines(lines) => draw_lines(&painter, rect, &view, lines),
            }
        }

        let controls = state.controls.clone();
        let attributions = state.attributions();
        drop(state);

        if let Some((position, popup)) = &self.popup {
            show_popup(ui.ctx(), to_pos(rect, view.geo_to_screen(position)), popup);
        }

        for control in &controls {
            match control {
                Control::Legend { legend, position } => {
                    let (align, offset) = control_anchor(*position);
                    egui::Window::new("Depth")
                        .anchor(align, offset)
                        .collapsible(false)
                        .resizable(false)
                        .auto_sized()
                        .show(ui.ctx(), |ui| legend.render_into(&mut EguiLegend::new(ui)));
                }
                Control::LayerSwitcher {
                    base_layers,
                    overlays,
                } => self.show_layer_switcher(ui.ctx(), base_layers, overlays),
                Control::Notice(notice) => show_notice(ui.ctx(), notice),
            }
        }

        if !attributions.is_empty() {
            egui::Window::new("Attributions")
                .collapsible(false)
                .title_bar(false)
                .anchor(Align2::LEFT_BOTTOM, [CONTROL_MARGIN, -CONTROL_MARGIN])
                .auto_sized()
                .show(ui.ctx(), |ui| show_attributions(ui, &attributions));
        }
    }

    fn show_layer_switcher(&self, ctx: &egui::Context, base_layers: &[String], overlays: &[String]) {
        let (align, offset) = control_anchor(ControlPosition::TopRight);
        egui::Window::new("Layers")
            .anchor(align, offset)
            .collapsible(true)
            .resizable(false)
            .auto_sized()
            .show(ctx, |ui| {
                let mut state = self.state.write();

                let mut selected = state.selected_base_layer().map(String::from);
                for name in base_layers {
                    if ui.radio_value(&mut selected, Some(name.clone()), name.as_str()).changed() {
                        state.select_base_layer(name);
                    }
                }

                if !base_layers.is_empty() && !overlays.is_empty() {
                    ui.separator();
                }

                for name in overlays {
                    let mut visible = state.is_overlay_visible(name);
                    if ui.checkbox(&mut visible, name.as_str()).changed() {
                        state.set_overlay_visible(name, visible);
                    }
                }
            });
    }
}

fn draw_tiles(ui: &Ui, rect: Rect, view: &MapView, layer: &TileLayer) {
    let z = layer.clamp_zoom(view.tile_zoom());
    for (index, tile_rect) in view.visible_tiles(z) {
        match layer.tile_url(index.source()) {
            Ok(url) => {
                let tile_rect = Rect::from_min_max(
                    to_pos(rect, tile_rect.min),
                    to_pos(rect, tile_rect.max),
                );
                egui::Image::new(url).paint_at(ui, tile_rect);
            }
            Err(err) => log::trace!("Cannot build url of tile {index:?}: {err}"),
        }
    }
}

fn draw_markers(painter: &egui::Painter, rect: Rect, view: &MapView, layer: &MarkerLayer) {
    let style = &layer.style;
    let stroke = Stroke::new(
        style.stroke_weight,
        to_color32(style.stroke_color.with_opacity(style.stroke_opacity)),
    );

    for marker in &layer.markers {
        let center = to_pos(rect, view.geo_to_screen(&marker.position));
        if !rect.expand(marker.radius.max(0.0) as f32).contains(center) {
            continue;
        }

        painter.circle(
            center,
            marker.radius.max(0.0) as f32,
            to_color32(marker.fill_color.with_opacity(style.fill_opacity)),
            stroke,
        );
    }
}

fn draw_lines(painter: &egui::Painter, rect: Rect, view: &MapView, layer: &LineLayer) {
    let stroke = Stroke::new(layer.style.width, to_color32(layer.style.color));
    for line in layer.boundaries.iter().flat_map(|b| &b.lines) {
        for part in split_at_antimeridian(line) {
            let points: Vec<Pos2> = part
                .iter()
                .map(|point| to_pos(rect, view.geo_to_screen(point)))
                .collect();
            painter.add(Shape::line(points, stroke));
        }
    }
}

fn show_popup(ctx: &egui::Context, anchor: Pos2, popup: &Popup) {
    egui::Area::new(egui::Id::new("quake_popup"))
        .fixed_pos(anchor + egui::vec2(CONTROL_MARGIN, CONTROL_MARGIN))
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                let rows = [
                    ("Location:", popup.place.clone()),
                    ("Magnitude:", popup.magnitude.to_string()),
                    ("Depth:", format!("{} km", popup.depth_km)),
                    ("Date:", popup.date.clone()),
                ];
                for (label, value) in rows {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(label).strong());
                        ui.label(value);
                    });
                }
            });
        });
}

fn show_notice(ctx: &egui::Context, notice: &Notice) {
    let (align, offset) = control_anchor(ControlPosition::TopLeft);
    egui::Window::new("Some data could not be shown")
        .anchor(align, offset)
        .collapsible(true)
        .resizable(false)
        .default_open(false)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().max_height(200.0).show(ui, |ui| {
                for message in &notice.messages {
                    ui.colored_label(ui.visuals().warn_fg_color, message.as_str());
                }
            });
        });
}

fn show_attributions(ui: &mut Ui, attributions: &[Attribution]) {
    ui.horizontal(|ui| {
        for (index, attribution) in attributions.iter().enumerate() {
            if index > 0 {
                ui.label(" | ");
            }

            if let Some(url) = attribution.url() {
                ui.hyperlink_to(attribution.text(), url);
            } else {
                ui.label(attribution.text());
            }
        }
    });
}

/// Top-most marker under the screen point.
pub(crate) fn marker_at<'a>(
    view: &MapView,
    layers: &'a [Layer],
    point: ScreenPoint,
) -> Option<&'a Marker> {
    layers
        .iter()
        .rev()
        .filter(|layer| layer.is_visible())
        .filter_map(|layer| match layer {
            Layer::Markers(markers) => Some(markers),
            _ => None,
        })
        .flat_map(|layer| layer.markers.iter().rev())
        .find(|marker| {
            let center = view.geo_to_screen(&marker.position);
            center.distance(&point) <= marker.radius.max(MIN_HIT_RADIUS)
        })
}

/// Splits a polyline where consecutive points are on different sides of the antimeridian.
pub(crate) fn split_at_antimeridian(line: &[GeoPoint]) -> Vec<&[GeoPoint]> {
    let mut parts = vec![];
    let mut start = 0;
    for (index, pair) in line.windows(2).enumerate() {
        if (pair[1].lon - pair[0].lon).abs() > 180.0 {
            parts.push(&line[start..=index]);
            start = index + 1;
        }
    }

    if start < line.len() {
        parts.push(&line[start..]);
    }

    parts.retain(|part| part.len() > 1);
    parts
}

fn control_anchor(position: ControlPosition) -> (Align2, [f32; 2]) {
    match position {
        ControlPosition::TopLeft => (Align2::LEFT_TOP, [CONTROL_MARGIN, CONTROL_MARGIN]),
        ControlPosition::TopRight => (Align2::RIGHT_TOP, [-CONTROL_MARGIN, CONTROL_MARGIN]),
        ControlPosition::BottomLeft => (Align2::LEFT_BOTTOM, [CONTROL_MARGIN, -CONTROL_MARGIN]),
        ControlPosition::BottomRight => {
            (Align2::RIGHT_BOTTOM, [-CONTROL_MARGIN, -CONTROL_MARGIN])
        }
    }
}

fn to_pos(rect: Rect, point: ScreenPoint) -> Pos2 {
    rect.min + egui::vec2(point.x as f32, point.y as f32)
}

fn to_screen_point(rect: Rect, pos: Pos2) -> ScreenPoint {
    ScreenPoint::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64)
}
