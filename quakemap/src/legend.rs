//! Depth legend listing every bucket of a [`DepthScale`] with its color.

use serde::Serialize;

use crate::depth::DepthScale;
use crate::Color;

/// One row of the legend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    /// Depth range text, e.g. `10 - 30` or `90+`.
    pub label: String,
    /// Color drawn next to the label.
    pub swatch_color: Color,
}

/// Legend rows in ascending depth order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    entries: Vec<LegendEntry>,
}

/// Anything a legend can be drawn into: a markup buffer, a UI panel, etc.
pub trait LegendContainer {
    /// Appends a single legend row.
    fn add_entry(&mut self, entry: &LegendEntry);
}

impl Legend {
    /// Builds one entry per bucket of the scale.
    ///
    /// Swatch colors are obtained by classifying a depth inside each bucket (the middle of a
    /// closed bucket, one kilometer below the start of the open one), so the legend always shows
    /// the colors the classifier actually produces.
    pub fn build(scale: &DepthScale) -> Self {
        let entries = scale
            .buckets()
            .iter()
            .map(|bucket| {
                let label = match bucket.upper_km {
                    Some(upper) => format!("{} - {}", bucket.lower_km, upper),
                    None => format!("{}+", bucket.lower_km),
                };

                LegendEntry {
                    label,
                    swatch_color: scale.color(bucket.representative_depth()),
                }
            })
            .collect();

        Self { entries }
    }

    /// Legend rows.
    pub fn entries(&self) -> &[LegendEntry] {
        &self.entries
    }

    /// Finds the row drawn with the given color.
    pub fn entry_for_color(&self, color: Color) -> Option<&LegendEntry> {
        self.entries
            .iter()
            .find(|entry| entry.swatch_color == color)
    }

    /// Appends all rows to the container.
    pub fn render_into(&self, container: &mut impl LegendContainer) {
        for entry in &self.entries {
            container.add_entry(entry);
        }
    }
}

/// Legend rendered as HTML, using the `legend` / `color-scale-item` class names.
#[derive(Debug, Default, Clone)]
pub struct HtmlLegend {
    items: String,
}

impl HtmlLegend {
    /// Creates an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the complete legend `div`.
    pub fn into_markup(self) -> String {
        format!("<div class=\"legend\">{}</div>", self.items)
    }
}

impl LegendContainer for HtmlLegend {
    fn add_entry(&mut self, entry: &LegendEntry) {
        self.items.push_str(&format!(
            "<div class=\"color-scale-item\"><div class=\"legend-color\" style=\"background:{}\"></div><div class=\"legend-text\">{} km</div></div>",
            entry.swatch_color, entry.label
        ));
    }
}
