// src/gui/app.rs
use std::{
    error::Error,
    sync::{mpsc::Receiver, Arc, Mutex},
};

use eframe::egui;

use crate::{
    attachment::SessionStore,
    config::{consts::APP_TITLE, options::AppOptions, state::AppState},
    error::{SearchError, Stage},
    lead::LeadRecord,
    search::{Orchestrator, SearchSession},
};

use super::{actions, components};

pub type Outcome = Result<Vec<LeadRecord>, SearchError>;

pub fn run(options: eframe::NativeOptions) -> Result<(), Box<dyn Error>> {
    crate::log::init();

    // a broken config file should not keep the window from opening
    let (opts, note) = match AppOptions::load() {
        Ok(o) => (o, None),
        Err(e) => {
            loge!("Config: {}", e);
            (AppOptions::default(), Some(format!("{e}. Using defaults.")))
        }
    };

    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(App::new(AppState::with_options(opts), note)))),
    )?;
    Ok(())
}

pub struct App {
    // single source of truth for the form (UI thread only)
    pub state: AppState,

    // results + attachment + flow state
    pub session: SearchSession,

    // None when the HTTP client could not be built
    pub orchestrator: Option<Orchestrator>,

    // validation message shown under the form
    pub form_error: Option<String>,

    // status/progress (workers write here)
    pub status: Arc<Mutex<String>>,
    pub running: bool,

    // in-flight search: which endpoint, and where its result lands
    pub pending: Option<(Stage, Receiver<Outcome>)>,
}

impl App {
    pub fn new(state: AppState, note: Option<String>) -> Self {
        let store = SessionStore::for_current_session(state.options.cache.max_bytes);
        logd!("Init: session cache at {}", store.path().display());
        let session = SearchSession::new(Box::new(store));

        let orchestrator = match Orchestrator::from_options(&state.options) {
            Ok(o) => Some(o),
            Err(e) => {
                loge!("Init: HTTP client unavailable: {}", e);
                None
            }
        };

        let status = match (&note, session.attachment()) {
            (Some(n), _) => n.clone(),
            (None, Some(att)) => format!("Restored attachment: {}", att.file_name),
            (None, None) => s!(session.state().message()),
        };

        logf!(
            "Init: primary={}, fallback={}, telemetry={}",
            state.options.endpoints.primary,
            state.options.endpoints.fallback,
            state.options.endpoints.telemetry.is_some()
        );

        Self {
            state,
            session,
            orchestrator,
            form_error: None,
            status: Arc::new(Mutex::new(status)),
            running: false,
            pending: None,
        }
    }

    /* ---------- tiny helpers ---------- */

    #[inline]
    pub fn status<T: Into<String>>(&self, msg: T) {
        if let Ok(mut s) = self.status.lock() {
            *s = msg.into();
        }
    }

    #[inline]
    pub fn status_text(&self) -> String {
        self.status.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        actions::search::poll(self);
        actions::attach::take_dropped(self, ctx);

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            components::status_bar::draw(ui, self);
        });

        egui::SidePanel::left("criteria")
            .resizable(false)
            .min_width(260.0)
            .show(ctx, |ui| {
                components::criteria_form::draw(ui, self);
                ui.separator();
                components::attachment_panel::draw(ui, self);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            components::export_bar::draw(ui, self);
            ui.separator();
            components::data_table::draw(ui, self);
        });
    }
}
