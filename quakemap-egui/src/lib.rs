//! Desktop viewer for quakemap earthquake maps.
//!
//! [`SharedSurface`] is a [`MapSurface`](quakemap::surface::MapSurface) that a background task
//! fills with layers and controls, while [`EguiMapState`] draws the surface content and lets the
//! user pan, zoom, switch layers and open marker popups.

mod egui_map;
mod init;
mod legend;
mod surface;

pub use egui_map::EguiMapState;
pub use init::run;
pub use legend::EguiLegend;
pub use surface::{SharedSurface, SurfaceState};

/// Converts a map color into an egui color.
pub fn to_color32(color: quakemap::Color) -> egui::Color32 {
    let [r, g, b, a] = color.to_u8_array();
    egui::Color32::from_rgba_unmultiplied(r, g, b, a)
}
