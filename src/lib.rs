// src/lib.rs
// #![allow(dead_code)]
// #![allow(unused)]

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;

pub mod attachment;
pub mod decode;
pub mod error;
pub mod export;
pub mod filter;
pub mod gui;
pub mod lead;
pub mod normalize;
pub mod progress;
pub mod remote;
pub mod search;
