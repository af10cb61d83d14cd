// src/gui/components/mod.rs
pub mod attachment_panel;
pub mod criteria_form;
pub mod data_table;
pub mod export_bar;
pub mod status_bar;
