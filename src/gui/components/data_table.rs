// src/gui/components/data_table.rs
//
// Results table. Purely a view over `session.results()`; columns come from
// `Field::ALL` and cells from `LeadRecord::cells()`, same as every export.

use eframe::egui::{self, Align, Layout};
use egui_extras::{Column, TableBuilder};

use crate::{gui::app::App, lead::Field, search::SearchState};

const ROW_H: f32 = 20.0;
const HEADER_H: f32 = 24.0;

/// Initial widths (px), `Field::ALL` order. Phone takes the remainder.
const WIDTHS: [f32; 4] = [180.0, 150.0, 150.0, 220.0];

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let results = app.session.results();

    if results.is_empty() {
        let hint = match app.session.state() {
            SearchState::Idle => "Enter criteria or attach a file, then search.",
            s => s.message(),
        };
        ui.centered_and_justified(|ui| {
            ui.weak(hint);
        });
        return;
    }

    let mut table = TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(Layout::left_to_right(Align::Center))
        .min_scrolled_height(0.0);
    for w in WIDTHS {
        table = table.column(Column::initial(w).at_least(60.0).clip(true));
    }
    table = table.column(Column::remainder().at_least(80.0));

    table
        .header(HEADER_H, |mut header| {
            for field in Field::ALL {
                header.col(|ui| {
                    ui.strong(field.title());
                });
            }
        })
        .body(|body| {
            body.rows(ROW_H, results.len(), |mut row| {
                let rec = &results[row.index()];
                for cell in rec.cells() {
                    row.col(|ui| {
                        ui.label(cell).on_hover_text(cell);
                    });
                }
            });
        });
}
