// src/gui/actions/search.rs
//
// Validation runs here on the UI thread; only a validated job goes to
// the worker. One search in flight at a time.

use std::{
    sync::mpsc::{self, TryRecvError},
    thread,
};

use eframe::egui;

use crate::{
    error::{RemoteFailure, SearchError},
    gui::{app::App, progress::GuiProgress},
    progress::Progress,
    search::{SearchJob, SearchState},
};

pub fn submit(app: &mut App, ctx: &egui::Context) {
    if app.running {
        logd!("Search: Clicked while busy, ignored");
        return;
    }
    let criteria = app.state.gui.form.to_criteria();
    logf!("Search: Begin {:?}", criteria);

    match app.session.prepare_submit(criteria) {
        Ok(job) => {
            app.form_error = None;
            spawn(app, ctx, job);
        }
        Err(e @ SearchError::Validation) => {
            app.form_error = Some(e.to_string());
            app.status("Nothing to search for");
        }
        Err(e) => app.status(e.to_string()),
    }
}

pub fn fallback(app: &mut App, ctx: &egui::Context) {
    if app.running {
        return;
    }
    logf!("Search: Extended search requested");
    match app.session.prepare_fallback() {
        Ok(job) => spawn(app, ctx, job),
        Err(e) => app.status(e.to_string()),
    }
}

fn spawn(app: &mut App, ctx: &egui::Context, job: SearchJob) {
    let stage = job.stage();

    let Some(orch) = app.orchestrator.clone() else {
        let err = SearchError::remote(stage, RemoteFailure::Network(s!("HTTP client unavailable")));
        let applied = app.session.finish(stage, Err(err));
        finish(app, applied);
        return;
    };

    let (tx, rx) = mpsc::channel();
    app.running = true;
    app.pending = Some((stage, rx));
    app.status(app.session.state().message());

    let status = app.status.clone();
    let ctx = ctx.clone();

    thread::spawn(move || {
        let mut prog = GuiProgress::new(status, ctx.clone());
        let outcome = job.run(&orch, Some(&mut prog));
        prog.finish();
        // receiver gone means the window closed; nothing left to tell
        let _ = tx.send(outcome);
        ctx.request_repaint();
    });
}

/// Called every frame. Applies a finished worker result, if any.
pub fn poll(app: &mut App) {
    let Some((stage, rx)) = &app.pending else { return };
    let stage = *stage;

    let outcome = match rx.try_recv() {
        Ok(outcome) => outcome,
        Err(TryRecvError::Empty) => return,
        Err(TryRecvError::Disconnected) => {
            loge!("Search: worker exited without a result");
            Err(SearchError::remote(stage, RemoteFailure::Network(s!("search was interrupted"))))
        }
    };

    app.pending = None;
    let applied = app.session.finish(stage, outcome);
    finish(app, applied);
}

fn finish(app: &mut App, applied: Result<SearchState, SearchError>) {
    app.running = false;
    let msg = match applied {
        Ok(SearchState::Rendered) => format!("Found {} lead(s)", app.session.results().len()),
        Ok(state) => s!(state.message()),
        Err(e) => e.to_string(),
    };
    app.status(msg);
}
