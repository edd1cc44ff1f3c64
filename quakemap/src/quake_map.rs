//! Builds an earthquake map on a [`MapSurface`] from the configured feeds.

use geojson::FeatureCollection;

use crate::config::QuakeMapConfig;
use crate::data_provider::FeedProvider;
use crate::error::QuakeMapError;
use crate::feature::plate_boundaries;
use crate::legend::Legend;
use crate::marker::MarkerRenderer;
use crate::surface::{Control, Layer, LineLayer, MapSurface, MarkerLayer, Notice};

/// Name of the earthquake marker layer.
pub const EARTHQUAKES_LAYER: &str = "Earthquakes";
/// Name of the plate boundaries layer.
pub const PLATES_LAYER: &str = "Tectonic Plates";

/// Outcome of a [`QuakeMap::load`] pass.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Number of earthquake markers added to the map.
    pub markers: usize,
    /// Number of plate boundaries added to the map.
    pub plate_boundaries: usize,
    /// Everything that went wrong, in the order it was met.
    pub errors: Vec<QuakeMapError>,
}

impl LoadReport {
    /// Returns true if all data was loaded and rendered.
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Earthquake map: configuration, a feed source and the surface everything is drawn on.
pub struct QuakeMap<S: MapSurface, P: FeedProvider> {
    config: QuakeMapConfig,
    provider: P,
    surface: S,
    renderer: MarkerRenderer,
    legend: Legend,
}

impl<S: MapSurface, P: FeedProvider> QuakeMap<S, P> {
    /// Validates the configuration and creates the map on the surface.
    pub fn new(config: QuakeMapConfig, provider: P, mut surface: S) -> Result<Self, QuakeMapError> {
        config.validate()?;
        let renderer = MarkerRenderer::from_style(&config.style)?;
        let legend = Legend::build(renderer.scale());

        surface.create_map(&config.map);

        Ok(Self {
            config,
            provider,
            surface,
            renderer,
            legend,
        })
    }

    /// Depth legend of the map.
    pub fn legend(&self) -> &Legend {
        &self.legend
    }

    /// Surface the map is drawn on.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Consumes the map, returning the surface.
    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Fetches the feeds and adds layers and controls to the surface.
    ///
    /// The earthquake and plate feeds are loaded concurrently. A failure of either feed does not
    /// prevent the rest of the map from being built: failed parts are left out, and the problems
    /// are shown in a [`Notice`] control and returned in the report.
    ///
    /// Each call adds a full set of layers, so it is meant to be called once per surface.
    pub async fn load(&mut self) -> LoadReport {
        let (quakes, plates) = self.fetch_feeds().await;
        let mut report = LoadReport::default();

        let base_layers = self.add_base_layers();
        let mut overlays = vec![];

        match quakes {
            Ok(collection) => {
                let rendered = self.renderer.render_collection(&collection);
                report.markers = rendered.markers.len();
                report.errors.extend(rendered.errors);

                self.surface.add_layer(Layer::Markers(MarkerLayer {
                    name: EARTHQUAKES_LAYER.into(),
                    visible: true,
                    markers: rendered.markers,
                    style: self.config.style.marker,
                }));
                overlays.push(EARTHQUAKES_LAYER.to_string());
            }
            Err(err) => {
                log::warn!("Earthquake feed is not available: {err}");
                report.errors.push(err);
            }
        }

        match plates {
            Some(Ok(collection)) => {
                let boundaries = plate_boundaries(&collection);
                report.plate_boundaries = boundaries.len();

                self.surface.add_layer(Layer::Lines(LineLayer {
                    name: PLATES_LAYER.into(),
                    visible: false,
                    boundaries,
                    style: self.config.style.plates,
                }));
                overlays.push(PLATES_LAYER.to_string());
            }
            Some(Err(err)) => {
                log::warn!("Plate boundaries feed is not available: {err}");
                report.errors.push(err);
            }
            None => {}
        }

        self.surface.add_control(Control::Legend {
            legend: self.legend.clone(),
            position: self.config.style.legend_position,
        });

        if base_layers.len() > 1 || self.config.feeds.plates.is_some() {
            self.surface.add_control(Control::LayerSwitcher {
                base_layers,
                overlays,
            });
        }

        if !report.errors.is_empty() {
            self.surface.add_control(Control::Notice(Notice {
                messages: report.errors.iter().map(|err| err.to_string()).collect(),
            }));
        }

        log::info!(
            "Map loaded: {} markers, {} plate boundaries, {} problems",
            report.markers,
            report.plate_boundaries,
            report.errors.len()
        );

        report
    }

    async fn fetch_feeds(
        &self,
    ) -> (
        Result<FeatureCollection, QuakeMapError>,
        Option<Result<FeatureCollection, QuakeMapError>>,
    ) {
        let provider = &self.provider;
        let feeds = &self.config.feeds;

        let plates = async {
            match &feeds.plates {
                Some(location) => Some(provider.load(location).await),
                None => None,
            }
        };

        futures::join!(provider.load(&feeds.earthquakes), plates)
    }

    fn add_base_layers(&mut self) -> Vec<String> {
        let mut names = vec![];
        for layer in &self.config.base_layers {
            if layer.is_missing_access_token() {
                log::warn!(
                    "Base layer '{}' requires an access token, skipping it",
                    layer.name
                );
                continue;
            }

            names.push(layer.name.clone());
            self.surface.add_layer(Layer::Tiles {
                layer: layer.clone(),
                visible: names.len() == 1,
            });
        }

        names
    }
}
