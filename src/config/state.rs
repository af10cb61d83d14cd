// src/config/state.rs
use super::options::AppOptions;
use crate::lead::Criteria;

/// Form contents as typed; trimmed into `Criteria` on submit.
#[derive(Clone, Debug, Default)]
pub struct FormState {
    pub name: String,
    pub location: String,
    pub technology: String,
}

impl FormState {
    pub fn to_criteria(&self) -> Criteria {
        Criteria::new(&self.name, &self.location, &self.technology)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Clone, Debug)]
pub struct GuiState {
    pub form: FormState,

    /// Path text box next to the Browse button
    pub path_text: String,

    /// Export folder as typed; copied into options on export
    pub export_dir_text: String,

    pub window_w: u32,
    pub window_h: u32,
    pub last_browse_dir: String,
}

impl Default for GuiState {
    fn default() -> Self {
        Self {
            form: FormState::default(),
            path_text: s!(),
            export_dir_text: s!(),
            window_w: 1100,
            window_h: 700,
            last_browse_dir: s!(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub options: AppOptions,
    pub gui: GuiState,
}

impl AppState {
    pub fn with_options(options: AppOptions) -> Self {
        let gui = GuiState {
            export_dir_text: options.export.dir.to_string_lossy().into_owned(),
            ..GuiState::default()
        };
        Self { options, gui }
    }
}
