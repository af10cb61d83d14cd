// src/gui/actions/mod.rs
//
// Button "executive" actions. Layout lives in components/, the
// operational logic lives here.

pub mod attach;
pub mod export;
pub mod search;
