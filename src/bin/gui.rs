// src/bin/gui.rs
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]
use eframe::egui::{IconData, ViewportBuilder};
use lead_search::{config::state::GuiState, gui};

/// Drawn rather than bundled: a magnifier ring on a blue tile.
fn app_icon() -> IconData {
    const SIZE: u32 = 64;
    let c = SIZE as f32 / 2.0 - 6.0;
    let rgba = image::RgbaImage::from_fn(SIZE, SIZE, |x, y| {
        let (dx, dy) = (x as f32 - c, y as f32 - c);
        let d = (dx * dx + dy * dy).sqrt();
        let handle = x > y.saturating_sub(2) && x < y + 4 && x as f32 > c + 10.0;
        if (14.0..=19.0).contains(&d) || handle {
            image::Rgba([250, 250, 250, 255])
        } else {
            image::Rgba([36, 99, 178, 255])
        }
    });
    let (w, h) = rgba.dimensions();
    IconData { rgba: rgba.into_raw(), width: w, height: h }
}

fn main() {
    let gui_defaults = GuiState::default();
    let options = eframe::NativeOptions {
        // eframe 0.32: icon set via viewport builder
        viewport: ViewportBuilder::default()
            .with_icon(app_icon())
            .with_inner_size([gui_defaults.window_w as f32, gui_defaults.window_h as f32]),
        ..Default::default()
    };

    if let Err(e) = gui::run(options) {
        eprintln!("GUI failed: {}", e);
        std::process::exit(1);
    }
}
