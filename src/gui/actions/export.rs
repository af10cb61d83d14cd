// src/gui/actions/export.rs
use std::path::PathBuf;

use eframe::egui;

use crate::{
    export::{self, delimited, ExportFormat},
    gui::app::App,
};

pub fn export(app: &mut App, format: ExportFormat) {
    // pick up the folder box before anything else
    let typed = app.state.gui.export_dir_text.trim();
    if !typed.is_empty() {
        app.state.options.export.dir = PathBuf::from(typed);
    }

    let records = app.session.results();
    logf!("Export: Begin format={}, rows={}", format, records.len());

    let msg = match export::export_records(format, records, &app.state.options.export) {
        Ok(Some(path)) => format!("Exported {} lead(s) → {}", records.len(), path.display()),
        Ok(None) => {
            logd!("Export: Clicked, but there's nothing to export");
            s!("Nothing to export")
        }
        Err(e) => {
            loge!("Export: Error: {}", e);
            format!("Export error: {e}")
        }
    };
    app.status(msg);
}

pub fn copy(app: &mut App, ctx: &egui::Context) {
    let records = app.session.results();
    if records.is_empty() {
        app.status("Nothing to copy");
        logd!("Copy: Clicked, but there's nothing to copy");
        return;
    }

    match delimited::to_string(records) {
        Ok(txt) => {
            logf!("Copy: rows={}", records.len());
            ctx.copy_text(txt);
            app.status("Copied to clipboard");
        }
        Err(e) => {
            loge!("Copy: Error: {}", e);
            app.status(format!("Copy error: {e}"));
        }
    }
}
