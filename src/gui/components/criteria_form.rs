// src/gui/components/criteria_form.rs

use eframe::egui;

use crate::gui::{actions, app::App};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    ui.heading("Search");
    ui.add_space(4.0);

    let mut enter = false;
    {
        let form = &mut app.state.gui.form;
        egui::Grid::new("criteria_grid")
            .num_columns(2)
            .spacing([8.0, 6.0])
            .show(ui, |ui| {
                for (label, value, hint) in [
                    ("Name", &mut form.name, "e.g. Jane"),
                    ("Location", &mut form.location, "e.g. Austin"),
                    ("Technology", &mut form.technology, "e.g. Rust"),
                ] {
                    ui.label(label);
                    let resp = ui.add(egui::TextEdit::singleline(value).hint_text(hint));
                    if resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        enter = true;
                    }
                    ui.end_row();
                }
            });
    }

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        let busy = app.running;
        let search = ui.add_enabled(!busy, egui::Button::new(egui::RichText::new("Search").strong()));
        if search.clicked() || (enter && !busy) {
            actions::search::submit(app, ui.ctx());
        }
        if ui.add_enabled(!busy, egui::Button::new("Clear")).clicked() {
            app.state.gui.form.clear();
            logd!("UI: form cleared");
        }
    });

    if let Some(msg) = &app.form_error {
        ui.colored_label(ui.visuals().error_fg_color, msg);
    }

    if app.session.state().offers_fallback() {
        ui.add_space(6.0);
        ui.label(app.session.state().message());
        if ui.add_enabled(!app.running, egui::Button::new("Extended search")).clicked() {
            actions::search::fallback(app, ui.ctx());
        }
    }
}
