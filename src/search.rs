// src/search.rs
//! Search orchestration.
//!
//! ```text
//! Idle → Validating → (LocalSearch | RemoteSearch) → Rendered | NoResults
//!                                       NoResults → [FallbackSearch] → Rendered | ExhaustedNoResults
//! ```
//!
//! - [`Orchestrator`] owns the collaborators (endpoints, telemetry, header
//!   strategy) and runs one flow at a time. It holds no per-search state.
//! - [`SearchSession`] owns what the UI shows: current results, state, the
//!   last criteria and the attachment (plus its session cache). Results are
//!   replaced wholesale by every search.
//!
//! The GUI splits a search in three so the network call can leave the UI
//! thread: [`SearchSession::prepare_submit`] (validates, on the UI thread),
//! [`SearchJob::run`] (worker thread), [`SearchSession::finish`] (UI thread).
//! [`SearchSession::submit`] does all three inline for the CLI and tests.
//!
//! There are no automatic retries. The fallback only runs when asked for,
//! and only from `NoResults`.

use std::sync::Arc;

use crate::{
    attachment::{Attachment, AttachmentStore},
    config::options::AppOptions,
    decode::{self, SheetKind},
    error::{RemoteFailure, SearchError, Stage, StorageWarning},
    filter,
    lead::{Criteria, LeadRecord},
    normalize::{self, HeaderStrategy, SubstringHeaders},
    progress::Progress,
    remote::{HttpLeadSource, HttpTelemetry, LeadSource, NoTelemetry, SearchRequest, Telemetry},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    Validating,
    LocalSearch,
    RemoteSearch,
    Rendered,
    NoResults,
    FallbackSearch,
    ExhaustedNoResults,
}

impl SearchState {
    /// A flow is in flight; the trigger should be disabled.
    pub fn is_busy(self) -> bool {
        matches!(
            self,
            SearchState::Validating
                | SearchState::LocalSearch
                | SearchState::RemoteSearch
                | SearchState::FallbackSearch
        )
    }

    pub fn offers_fallback(self) -> bool {
        self == SearchState::NoResults
    }

    pub fn message(self) -> &'static str {
        match self {
            SearchState::Idle => "Ready",
            SearchState::Validating => "Checking input…",
            SearchState::LocalSearch => "Searching attached file…",
            SearchState::RemoteSearch => "Searching…",
            SearchState::Rendered => "Results ready",
            SearchState::NoResults => "No leads found. Try the extended search?",
            SearchState::FallbackSearch => "Running extended search…",
            SearchState::ExhaustedNoResults => "No leads found, even with the extended search.",
        }
    }
}

/// Where a search goes once validated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Local(SheetKind),
    Remote,
}

/// Spreadsheet attachments are searched locally and never sent to the
/// primary endpoint; anything else goes remote, file included.
pub fn route(attachment: Option<&Attachment>) -> Route {
    match attachment.and_then(Attachment::sheet_kind) {
        Some(kind) => Route::Local(kind),
        None => Route::Remote,
    }
}

pub fn validate(criteria: &Criteria, attachment: Option<&Attachment>) -> Result<(), SearchError> {
    if criteria.is_empty() && attachment.is_none() {
        return Err(SearchError::Validation);
    }
    Ok(())
}

/* ---------------- Orchestrator ---------------- */

#[derive(Clone)]
pub struct Orchestrator {
    primary: Arc<dyn LeadSource>,
    fallback: Arc<dyn LeadSource>,
    telemetry: Arc<dyn Telemetry>,
    headers: Arc<dyn HeaderStrategy>,
}

impl Orchestrator {
    pub fn new(primary: Arc<dyn LeadSource>, fallback: Arc<dyn LeadSource>) -> Self {
        Self {
            primary,
            fallback,
            telemetry: Arc::new(NoTelemetry),
            headers: Arc::new(SubstringHeaders),
        }
    }

    pub fn with_telemetry(mut self, telemetry: Arc<dyn Telemetry>) -> Self {
        self.telemetry = telemetry;
        self
    }

    pub fn with_headers(mut self, headers: Arc<dyn HeaderStrategy>) -> Self {
        self.headers = headers;
        self
    }

    /// Wire up HTTP endpoints from options.
    pub fn from_options(opts: &AppOptions) -> Result<Self, RemoteFailure> {
        let ep = &opts.endpoints;
        let primary = HttpLeadSource::new(&ep.primary, ep.timeout())?;
        let fallback = HttpLeadSource::new(&ep.fallback, ep.timeout())?;

        let mut orch = Self::new(Arc::new(primary), Arc::new(fallback))
            .with_headers(Arc::from(normalize::strategy_for(opts.headers.as_ref())));

        if let Some(url) = ep.telemetry.as_deref().filter(|u| !u.trim().is_empty()) {
            orch = orch.with_telemetry(Arc::new(HttpTelemetry::new(url, ep.timeout())?));
        }
        Ok(orch)
    }

    pub fn headers(&self) -> &dyn HeaderStrategy {
        self.headers.as_ref()
    }

    /// Primary flow: validate, log, route, run.
    pub fn search(
        &self,
        criteria: &Criteria,
        attachment: Option<&Attachment>,
        mut progress: Option<&mut dyn Progress>,
    ) -> Result<Vec<LeadRecord>, SearchError> {
        report(&mut progress, SearchState::Validating);
        validate(criteria, attachment)?;

        self.telemetry.submit(criteria, attachment);

        match route(attachment) {
            Route::Local(kind) => {
                report(&mut progress, SearchState::LocalSearch);
                // route() only yields Local for Some(attachment)
                let Some(att) = attachment else { return Ok(Vec::new()) };
                self.local_search(criteria, att, kind)
            }
            Route::Remote => {
                report(&mut progress, SearchState::RemoteSearch);
                let req = SearchRequest::new(criteria, attachment);
                self.primary
                    .search(&req)
                    .map_err(|e| SearchError::remote(Stage::Primary, e))
            }
        }
    }

    /// Decode → filter → normalize. No network.
    pub fn local_search(
        &self,
        criteria: &Criteria,
        attachment: &Attachment,
        kind: SheetKind,
    ) -> Result<Vec<LeadRecord>, SearchError> {
        let rows = decode::decode_bytes(&attachment.content, kind)?;
        let strategy = self.headers();
        let leads: Vec<LeadRecord> = filter::filter_rows(&rows, criteria, strategy)
            .map(|r| normalize::normalize(r, strategy))
            .collect();
        logf!(
            "Local: {} → {}/{} row(s) matched",
            attachment.file_name,
            leads.len(),
            rows.len()
        );
        Ok(leads)
    }

    /// Secondary endpoint, criteria only.
    pub fn fallback(
        &self,
        criteria: &Criteria,
        mut progress: Option<&mut dyn Progress>,
    ) -> Result<Vec<LeadRecord>, SearchError> {
        report(&mut progress, SearchState::FallbackSearch);
        self.fallback
            .search(&SearchRequest::criteria_only(criteria))
            .map_err(|e| SearchError::remote(Stage::Fallback, e))
    }
}

fn report(progress: &mut Option<&mut dyn Progress>, state: SearchState) {
    logd!("Search: → {:?}", state);
    if let Some(p) = progress.as_deref_mut() {
        p.stage(state);
    }
}

/* ---------------- Jobs ---------------- */

/// A validated unit of work, safe to move to a worker thread.
#[derive(Clone, Debug)]
pub enum SearchJob {
    Primary { criteria: Criteria, attachment: Option<Attachment> },
    Fallback { criteria: Criteria },
}

impl SearchJob {
    pub fn stage(&self) -> Stage {
        match self {
            SearchJob::Primary { .. } => Stage::Primary,
            SearchJob::Fallback { .. } => Stage::Fallback,
        }
    }

    pub fn run(
        &self,
        orch: &Orchestrator,
        progress: Option<&mut dyn Progress>,
    ) -> Result<Vec<LeadRecord>, SearchError> {
        match self {
            SearchJob::Primary { criteria, attachment } => {
                orch.search(criteria, attachment.as_ref(), progress)
            }
            SearchJob::Fallback { criteria } => orch.fallback(criteria, progress),
        }
    }
}

/* ---------------- Session ---------------- */

pub struct SearchSession {
    state: SearchState,
    results: Vec<LeadRecord>,
    criteria: Criteria,
    attachment: Option<Attachment>,
    store: Box<dyn AttachmentStore>,
}

impl SearchSession {
    /// Restores a cached attachment from `store`, if any.
    pub fn new(store: Box<dyn AttachmentStore>) -> Self {
        let attachment = store.load();
        Self {
            state: SearchState::Idle,
            results: Vec::new(),
            criteria: Criteria::default(),
            attachment,
            store,
        }
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn results(&self) -> &[LeadRecord] {
        &self.results
    }

    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    /// Replace the attachment. It is usable right away even when caching fails.
    pub fn attach(&mut self, attachment: Attachment) -> Option<StorageWarning> {
        logf!("Attach: {:?}", attachment);
        let warning = self.store.save(&attachment).err();
        if let Some(w) = &warning {
            logw!("Attach: not cached: {}", w);
        }
        self.attachment = Some(attachment);
        warning
    }

    pub fn detach(&mut self) -> Option<StorageWarning> {
        logf!("Attach: cleared");
        self.attachment = None;
        self.store.clear().err()
    }

    /// Validate and snapshot the inputs. On error nothing was sent anywhere.
    pub fn prepare_submit(&mut self, criteria: Criteria) -> Result<SearchJob, SearchError> {
        self.state = SearchState::Validating;
        if let Err(e) = validate(&criteria, self.attachment.as_ref()) {
            logw!("Search: rejected: {}", e);
            self.state = SearchState::Idle;
            return Err(e);
        }
        self.state = match route(self.attachment.as_ref()) {
            Route::Local(_) => SearchState::LocalSearch,
            Route::Remote => SearchState::RemoteSearch,
        };
        self.criteria = criteria.clone();
        Ok(SearchJob::Primary { criteria, attachment: self.attachment.clone() })
    }

    /// Only from `NoResults`, with the criteria of the search that came up empty.
    pub fn prepare_fallback(&mut self) -> Result<SearchJob, SearchError> {
        if !self.state.offers_fallback() {
            return Err(SearchError::FallbackUnavailable);
        }
        self.state = SearchState::FallbackSearch;
        Ok(SearchJob::Fallback { criteria: self.criteria.clone() })
    }

    /// Apply a job's outcome. Errors leave the session idle with no results.
    pub fn finish(
        &mut self,
        stage: Stage,
        outcome: Result<Vec<LeadRecord>, SearchError>,
    ) -> Result<SearchState, SearchError> {
        match outcome {
            Ok(leads) => {
                self.state = match (leads.is_empty(), stage) {
                    (false, _) => SearchState::Rendered,
                    (true, Stage::Primary) => SearchState::NoResults,
                    (true, Stage::Fallback) => SearchState::ExhaustedNoResults,
                };
                logf!("Search: {:?} → {:?} ({} lead(s))", stage, self.state, leads.len());
                self.results = leads;
                Ok(self.state)
            }
            Err(e) => {
                loge!("Search: {:?} failed: {}", stage, e);
                self.state = SearchState::Idle;
                self.results.clear();
                Err(e)
            }
        }
    }

    /// Inline submit: prepare → run → finish.
    pub fn submit(
        &mut self,
        orch: &Orchestrator,
        criteria: Criteria,
        progress: Option<&mut dyn Progress>,
    ) -> Result<SearchState, SearchError> {
        let job = self.prepare_submit(criteria)?;
        let outcome = job.run(orch, progress);
        self.finish(job.stage(), outcome)
    }

    /// Inline fallback: prepare → run → finish.
    pub fn request_fallback(
        &mut self,
        orch: &Orchestrator,
        progress: Option<&mut dyn Progress>,
    ) -> Result<SearchState, SearchError> {
        let job = self.prepare_fallback()?;
        let outcome = job.run(orch, progress);
        self.finish(job.stage(), outcome)
    }
}
