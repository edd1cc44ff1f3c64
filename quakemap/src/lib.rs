//! Quakemap draws earthquake feeds on interactive maps: every event becomes a circle sized by its
//! magnitude and colored by its depth, with a legend explaining the colors and optional tectonic
//! plate boundaries drawn on top.
//!
//! # Quick start
//!
//! ```no_run
//! use quakemap::config::QuakeMapConfig;
//! use quakemap::data_provider::AutoFeedProvider;
//! use quakemap::surface::MapDocument;
//! use quakemap::QuakeMap;
//!
//! # tokio_test::block_on(async {
//! let mut map = QuakeMap::new(
//!     QuakeMapConfig::default(),
//!     AutoFeedProvider::new()?,
//!     MapDocument::new(),
//! )?;
//! let report = map.load().await;
//! println!("{} earthquakes on the map", report.markers);
//! # Ok::<(), quakemap::error::QuakeMapError>(())
//! # });
//! ```
//!
//! # Main components
//!
//! * [`DepthScale`](depth::DepthScale) maps a depth in kilometers to one of the configured
//!   depth buckets and its color.
//! * [`Legend`](legend::Legend) lists the buckets with their colors and can be drawn into any
//!   [`LegendContainer`](legend::LegendContainer).
//! * [`MarkerRenderer`](marker::MarkerRenderer) turns GeoJSON earthquake features into
//!   [`Marker`](marker::Marker)s with popups.
//! * [`QuakeMap`] loads the feeds through a [`FeedProvider`](data_provider::FeedProvider) and
//!   puts layers and controls on a [`MapSurface`](surface::MapSurface).
//!
//! Map surfaces are the only part that knows how to draw. [`MapDocument`](surface::MapDocument)
//! records the map for export; the `quakemap-egui` crate shows it in a window.

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

mod attribution;
mod color;
pub mod config;
pub mod data_provider;
pub mod depth;
pub mod error;
pub mod feature;
pub mod geo;
pub mod legend;
pub mod marker;
mod quake_map;
pub mod surface;
pub mod tile;
pub mod view;

pub use attribution::Attribution;
pub use color::{Color, ParseColorError};
pub use quake_map::{LoadReport, QuakeMap, EARTHQUAKES_LAYER, PLATES_LAYER};
