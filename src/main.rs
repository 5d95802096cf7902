#![warn(clippy::all, rust_2018_idioms)]

use well_schematic::config::EditorConfig;
use well_schematic::WellSchematicApp;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let config = EditorConfig::from_env();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Well Schematic")
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Well Schematic",
        options,
        Box::new(|cc| Ok(Box::new(WellSchematicApp::new(cc, config)))),
    )
}
