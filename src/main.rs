#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use anyhow::Result;
use floorsight::gui::FloorsightApp;
use floorsight::regions;
use floorsight::settings::{resolve_settings_path, AppSettings};

fn main() -> Result<()> {
    let settings_path = resolve_settings_path()?;
    let settings = AppSettings::load(&settings_path).unwrap_or_else(|err| {
        eprintln!("settings file unreadable, using defaults: {err:#}");
        AppSettings::default()
    });

    floorsight::logging::init(settings.debug_logging);

    let store = regions::persist::load().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "region combinations unreadable, starting empty");
        regions::RegionStore::default()
    });

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Floorsight",
        options,
        Box::new(move |_cc| Box::new(FloorsightApp::new(settings, settings_path, store))),
    )
    .map_err(|err| anyhow::anyhow!("eframe failed: {err}"))
}
