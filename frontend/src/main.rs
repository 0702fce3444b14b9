#![warn(clippy::all, rust_2018_idioms)]

mod app;
mod context;
mod event;
mod settings;

use settings::Settings;

fn main() -> eframe::Result<()> {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    // only used to size the window, the app loads its own copy
    let settings = Settings::default().with_env_override();
    let side = settings.window_width as f32;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([side + 280.0, side + 40.0])
            .with_min_inner_size([400.0, 300.0])
            .with_title("DFS Pathfinder"),
        ..Default::default()
    };
    eframe::run_native(
        "DFS Pathfinder",
        native_options,
        Box::new(|cc| Box::new(app::App::new(cc))),
    )
}
