// src/gui/components/export_bar.rs

use eframe::egui;

use crate::{
    export::ExportFormat,
    gui::{actions, app::App},
};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let has_rows = !app.session.results().is_empty() && !app.running;

    ui.horizontal(|ui| {
        ui.label("Folder:");
        if ui
            .add(
                egui::TextEdit::singleline(&mut app.state.gui.export_dir_text)
                    .desired_width(220.0)
                    .font(egui::TextStyle::Monospace),
            )
            .changed()
        {
            logd!("UI: export dir text → {}", app.state.gui.export_dir_text);
        }

        ui.separator();

        for format in ExportFormat::ALL {
            let label = format!("Export {}", format.label());
            if ui.add_enabled(has_rows, egui::Button::new(label)).clicked() {
                actions::export::export(app, format);
            }
        }

        if ui.add_enabled(has_rows, egui::Button::new("Copy")).clicked() {
            actions::export::copy(app, ui.ctx());
        }
    });
}
