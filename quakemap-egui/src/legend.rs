use egui::{Sense, Ui, Vec2};
use quakemap::legend::{LegendContainer, LegendEntry};

use crate::to_color32;

const SWATCH_SIZE: f32 = 18.0;

/// Draws legend rows into an egui container: a color swatch followed by the depth range.
pub struct EguiLegend<'a> {
    ui: &'a mut Ui,
}

impl<'a> EguiLegend<'a> {
    /// Creates a container drawing into `ui`.
    pub fn new(ui: &'a mut Ui) -> Self {
        Self { ui }
    }
}

impl LegendContainer for EguiLegend<'_> {
    fn add_entry(&mut self, entry: &LegendEntry) {
        self.ui.horizontal(|ui| {
            let (rect, _) = ui.allocate_exact_size(Vec2::splat(SWATCH_SIZE), Sense::hover());
            ui.painter()
                .rect_filled(rect, 2.0, to_color32(entry.swatch_color));
            ui.label(format!("{} km", entry.label));
        });
    }
}
