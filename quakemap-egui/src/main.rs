//! Shows the earthquake map in a window. Takes an optional path to a JSON configuration.

use anyhow::Context;
use env_logger::Env;
use quakemap::config::QuakeMapConfig;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = match std::env::args_os().nth(1) {
        Some(path) => QuakeMapConfig::from_file(&path)
            .with_context(|| format!("cannot load configuration {}", path.to_string_lossy()))?,
        None => QuakeMapConfig::default(),
    };

    quakemap_egui::run(config)
}
