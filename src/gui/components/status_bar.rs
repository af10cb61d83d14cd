// src/gui/components/status_bar.rs

use eframe::egui;

use crate::gui::app::App;

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    ui.horizontal(|ui| {
        if app.running {
            ui.spinner();
        }
        ui.label(format!("Status: {}", app.status_text()));

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let n = app.session.results().len();
            if n > 0 {
                ui.label(format!("{n} lead(s)"));
            }
        });
    });
}
