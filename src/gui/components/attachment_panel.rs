// src/gui/components/attachment_panel.rs
//
// Current attachment + Browse / Load / Remove. Files can also be dropped
// anywhere on the window (handled in App::update).

use eframe::egui;

use crate::gui::{actions, app::App};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    ui.heading("Attachment");
    ui.add_space(4.0);

    match app.session.attachment() {
        Some(att) => {
            ui.label(egui::RichText::new(&att.file_name).strong());
            ui.label(format!("{} · {}", att.mime_type, human_size(att.size())));
            if att.is_spreadsheet() {
                ui.label("Searched locally, not uploaded");
            } else {
                ui.label("Sent along with the search");
            }
        }
        None => {
            ui.weak("No file. Drop one here or browse.");
        }
    }

    ui.add_space(4.0);
    ui.horizontal(|ui| {
        ui.add(
            egui::TextEdit::singleline(&mut app.state.gui.path_text)
                .hint_text("path/to/leads.xlsx")
                .desired_width(170.0)
                .font(egui::TextStyle::Monospace),
        );
        if ui.button("Load").clicked() {
            actions::attach::load_typed(app);
        }
    });

    ui.horizontal(|ui| {
        if ui.button("Browse…").clicked() {
            actions::attach::browse(app);
        }
        let has = app.session.attachment().is_some();
        if ui.add_enabled(has, egui::Button::new("Remove")).clicked() {
            actions::attach::clear(app);
        }
    });
}

fn human_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{bytes} B")
    } else if b < KB * KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{:.1} MB", b / (KB * KB))
    }
}
