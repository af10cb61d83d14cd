// src/config/consts.rs

pub const APP_NAME: &str = "lead_search";
pub const APP_TITLE: &str = "Lead Search";

// Config file
pub const CONFIG_FILE: &str = "lead_search.toml";
pub const ENV_PRIMARY_URL: &str = "LEAD_SEARCH_PRIMARY_URL";
pub const ENV_FALLBACK_URL: &str = "LEAD_SEARCH_FALLBACK_URL";
pub const ENV_TELEMETRY_URL: &str = "LEAD_SEARCH_TELEMETRY_URL";
pub const ENV_EXPORT_DIR: &str = "LEAD_SEARCH_EXPORT_DIR";

// Net config
pub const DEFAULT_PRIMARY_URL: &str = "http://127.0.0.1:5000/api/search";
pub const DEFAULT_FALLBACK_URL: &str = "http://127.0.0.1:5000/api/search/fallback";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const USER_AGENT: &str = concat!("lead_search/", env!("CARGO_PKG_VERSION"));

// Local store + logging
pub const STORE_DIR: &str = ".store";
pub const LOG_FILE: &str = "debug.log";
pub const LOG_ENV: &str = "LEAD_SEARCH_LOG";

// Session-scoped attachment cache
pub const SESSION_ENV: &str = "LEAD_SEARCH_SESSION";
pub const SESSION_FILE: &str = "attachment.json";
pub const DEFAULT_MAX_CACHE_BYTES: usize = 5 * 1024 * 1024;

// Export
pub const DEFAULT_EXPORT_DIR: &str = "out";
pub const EXPORT_STEM: &str = "leads";
pub const SHEET_NAME: &str = "Leads";
pub const DOCUMENT_CAPTION: &str = "Lead Search Results";
