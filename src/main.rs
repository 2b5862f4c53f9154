mod action_bar;
mod app;
mod canvas;
mod clipboard;
mod element;
mod history;
mod layout;
mod render;
mod state;
mod theme;
mod toolbar;
mod ui_controls;

use eframe::egui;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let viewport = egui::ViewportBuilder::default()
        .with_title("Scribble")
        .with_inner_size([1080.0, 760.0])
        .with_min_inner_size([640.0, 480.0]);

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Scribble",
        options,
        Box::new(|cc| Box::new(app::ScribbleApp::new(cc))),
    )
}
