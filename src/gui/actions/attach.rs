// src/gui/actions/attach.rs
use std::path::{Path, PathBuf};

use eframe::egui;

use crate::{attachment::Attachment, gui::app::App};

const SHEET_EXTS: [&str; 7] = ["csv", "tsv", "xls", "xlsx", "xlsm", "xlsb", "ods"];

pub fn browse(app: &mut App) {
    let mut dialog = rfd::FileDialog::new()
        .add_filter("Spreadsheets", &SHEET_EXTS)
        .add_filter("All files", &["*"]);
    if !app.state.gui.last_browse_dir.is_empty() {
        dialog = dialog.set_directory(&app.state.gui.last_browse_dir);
    }

    if let Some(path) = dialog.pick_file() {
        from_path(app, &path);
    }
}

/// Load whatever is in the path box.
pub fn load_typed(app: &mut App) {
    let typed = app.state.gui.path_text.trim();
    if typed.is_empty() {
        app.status("Type a file path or use Browse");
        return;
    }
    let path = PathBuf::from(typed);
    from_path(app, &path);
}

pub fn from_path(app: &mut App, path: &Path) {
    match Attachment::from_path(path) {
        Ok(att) => {
            if let Some(dir) = path.parent() {
                app.state.gui.last_browse_dir = dir.to_string_lossy().into_owned();
            }
            app.state.gui.path_text = path.to_string_lossy().into_owned();
            set(app, att);
        }
        Err(e) => {
            loge!("Attach: {}: {}", path.display(), e);
            app.status(format!("Could not read {}: {e}", path.display()));
        }
    }
}

/// Files dropped onto the window. Only the first one is kept.
pub fn take_dropped(app: &mut App, ctx: &egui::Context) {
    let dropped = ctx.input(|i| i.raw.dropped_files.first().cloned());
    let Some(file) = dropped else { return };

    if let Some(path) = &file.path {
        from_path(app, path);
    } else if let Some(bytes) = &file.bytes {
        set(app, Attachment::new(bytes.to_vec(), file.name.clone(), file.mime.clone()));
    }
}

pub fn clear(app: &mut App) {
    let warning = app.session.detach();
    app.state.gui.path_text.clear();
    match warning {
        Some(w) => app.status(format!("Attachment removed ({w})")),
        None => app.status("Attachment removed"),
    }
}

fn set(app: &mut App, att: Attachment) {
    let name = att.file_name.clone();
    let local = att.is_spreadsheet();
    let msg = match app.session.attach(att) {
        Some(w) => format!("Attached {name}, but {w}"),
        None if local => format!("Attached {name} (searched locally)"),
        None => format!("Attached {name}"),
    };
    app.status(msg);
}
