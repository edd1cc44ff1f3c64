use quakemap::config::QuakeMapConfig;
use quakemap::data_provider::AutoFeedProvider;
use quakemap::QuakeMap;
use tokio::runtime::Runtime;

use crate::{EguiMapState, SharedSurface};

const APP_NAME: &str = "Earthquakes of the past week";

struct MapApp {
    map: EguiMapState,
    _runtime: Runtime,
}

impl eframe::App for MapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.map.render(ui);
        });
    }
}

/// Opens a window with the configured map and loads its feeds in the background.
pub fn run(config: QuakeMapConfig) -> anyhow::Result<()> {
    let runtime = Runtime::new()?;
    let provider = AutoFeedProvider::new()?;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_NAME)
            .with_inner_size([1280.0, 800.0]),
        ..Default::default()
    };

    let app_creator: eframe::AppCreator<'static> = Box::new(move |cc| {
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let surface = SharedSurface::new(cc.egui_ctx.clone());
        let map_state = EguiMapState::new(&surface);

        let mut map = QuakeMap::new(config, provider, surface)?;
        runtime.spawn(async move {
            let report = map.load().await;
            for err in &report.errors {
                log::warn!("{err}");
            }
            log::info!(
                "Showing {} earthquakes and {} plate boundaries",
                report.markers,
                report.plate_boundaries
            );
        });

        Ok(Box::new(MapApp {
            map: map_state,
            _runtime: runtime,
        }))
    });

    eframe::run_native(APP_NAME, native_options, app_creator)
        .map_err(|err| anyhow::anyhow!("failed to start the viewer: {err}"))
}
