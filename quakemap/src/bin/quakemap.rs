//! Headless export of an earthquake map.
//!
//! Loads the configured feeds and writes the resulting map as JSON, the markers as styled GeoJSON
//! and the legend as HTML.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::{info, warn};
use quakemap::config::QuakeMapConfig;
use quakemap::data_provider::AutoFeedProvider;
use quakemap::legend::HtmlLegend;
use quakemap::surface::MapDocument;
use quakemap::QuakeMap;

#[derive(Parser, Debug)]
#[command(version, about = "Render earthquake feeds into a map document")]
struct Args {
    /// JSON configuration file. Defaults reproduce the USGS weekly earthquake map
    #[arg(long)]
    config: Option<PathBuf>,

    /// Earthquake feed URL or GeoJSON file, overrides the configuration
    #[arg(long)]
    quakes: Option<String>,

    /// Plate boundaries feed URL or GeoJSON file, overrides the configuration
    #[arg(long, conflicts_with = "no_plates")]
    plates: Option<String>,

    /// Do not load plate boundaries
    #[arg(long, default_value_t = false)]
    no_plates: bool,

    /// Write the map document JSON to this path instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write the earthquake markers as styled GeoJSON to this path
    #[arg(long)]
    geojson: Option<PathBuf>,

    /// Write the depth legend HTML to this path
    #[arg(long)]
    legend_html: Option<PathBuf>,
}

impl Args {
    fn load_config(&self) -> anyhow::Result<QuakeMapConfig> {
        let mut config = match &self.config {
            Some(path) => QuakeMapConfig::from_file(path)
                .with_context(|| format!("cannot load configuration {}", path.display()))?,
            None => QuakeMapConfig::default(),
        };

        if let Some(quakes) = &self.quakes {
            config.feeds.earthquakes = quakes.clone();
        }
        if let Some(plates) = &self.plates {
            config.feeds.plates = Some(plates.clone());
        }
        if self.no_plates {
            config.feeds.plates = None;
        }

        Ok(config)
    }
}

fn write_file(path: &Path, content: &str) -> anyhow::Result<()> {
    std::fs::write(path, content).with_context(|| format!("cannot write {}", path.display()))?;
    info!("Written {}", path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.load_config()?;

    let mut map = QuakeMap::new(config, AutoFeedProvider::new()?, MapDocument::new())?;
    let report = map.load().await;
    for err in &report.errors {
        warn!("{err}");
    }
    info!(
        "{} earthquakes, {} plate boundaries",
        report.markers, report.plate_boundaries
    );

    if let Some(path) = &args.legend_html {
        let mut html = HtmlLegend::new();
        map.legend().render_into(&mut html);
        write_file(path, &html.into_markup())?;
    }

    let document = map.into_surface();

    if let Some(path) = &args.geojson {
        let geojson = serde_json::to_string_pretty(&document.markers_geojson())?;
        write_file(path, &geojson)?;
    }

    let json = document.to_json()?;
    match &args.output {
        Some(path) => write_file(path, &json)?,
        None => println!("{json}"),
    }

    Ok(())
}
