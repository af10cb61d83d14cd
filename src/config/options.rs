// src/config/options.rs
//! Application options.
//!
//! Resolution order:
//! 1. `lead_search.toml` in the working directory
//! 2. `lead_search.toml` in the platform config dir
//! 3. built-in defaults
//!
//! Environment variables (`LEAD_SEARCH_*`) override whatever was loaded.
//!
//! ```toml
//! [endpoints]
//! primary = "https://leads.example.com/api/search"
//! fallback = "https://leads.example.com/api/search/fallback"
//! telemetry = "https://leads.example.com/api/log"
//! timeout_secs = 30
//!
//! [export]
//! dir = "out"
//! # Optional: a TrueType font for PDF characters the bundled faces lack
//! pdf_font = "fonts/NotoSansSC-Regular.ttf"
//!
//! [cache]
//! max_bytes = 5242880
//!
//! # Optional: exact header names instead of substring matching
//! [headers]
//! name = "Full Name"
//! location = "City"
//! ```

use std::{
    env,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;

use super::consts::*;
use crate::lead::Field;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    TomlParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Validation(String),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppOptions {
    pub endpoints: EndpointOptions,
    pub export: ExportOptions,
    pub cache: CacheOptions,
    /// Explicit header mapping. `None` → substring heuristic.
    pub headers: Option<HeaderOptions>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EndpointOptions {
    pub primary: String,
    pub fallback: String,
    pub telemetry: Option<String>,
    pub timeout_secs: u64,
}

impl Default for EndpointOptions {
    fn default() -> Self {
        Self {
            primary: s!(DEFAULT_PRIMARY_URL),
            fallback: s!(DEFAULT_FALLBACK_URL),
            telemetry: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl EndpointOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub dir: PathBuf,
    pub pdf_font: Option<PathBuf>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::in_dir(DEFAULT_EXPORT_DIR)
    }
}

impl ExportOptions {
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), pdf_font: None }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheOptions {
    pub max_bytes: usize,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self { max_bytes: DEFAULT_MAX_CACHE_BYTES }
    }
}

/// Exact header names per canonical field. Unset fields resolve to "".
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HeaderOptions {
    pub name: Option<String>,
    pub location: Option<String>,
    pub technology: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl HeaderOptions {
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Name => self.name.as_deref(),
            Field::Location => self.location.as_deref(),
            Field::Technology => self.technology.as_deref(),
            Field::Email => self.email.as_deref(),
            Field::Phone => self.phone.as_deref(),
        }
    }
}

impl AppOptions {
    /// Load from the first config file found, then apply env overrides.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Like `load`, but an explicit file skips the search.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let found = path.map(Path::to_path_buf).or_else(Self::find_config_file);
        let mut opts = match found {
            Some(path) => {
                logf!("Config: Loading {}", path.display());
                Self::from_file(&path)?
            }
            None => {
                logd!("Config: No {} found, using defaults", CONFIG_FILE);
                Self::default()
            }
        };
        opts.apply_env();
        opts.validate()?;
        Ok(opts)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| ConfigError::TomlParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn apply_env(&mut self) {
        if let Ok(v) = env::var(ENV_PRIMARY_URL) {
            self.endpoints.primary = v;
        }
        if let Ok(v) = env::var(ENV_FALLBACK_URL) {
            self.endpoints.fallback = v;
        }
        if let Ok(v) = env::var(ENV_TELEMETRY_URL) {
            self.endpoints.telemetry = if v.trim().is_empty() { None } else { Some(v) };
        }
        if let Ok(v) = env::var(ENV_EXPORT_DIR) {
            self.export.dir = PathBuf::from(v);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoints.primary.trim().is_empty() {
            return Err(ConfigError::Validation(s!("endpoints.primary is empty")));
        }
        if self.endpoints.fallback.trim().is_empty() {
            return Err(ConfigError::Validation(s!("endpoints.fallback is empty")));
        }
        if self.endpoints.timeout_secs == 0 {
            return Err(ConfigError::Validation(s!("endpoints.timeout_secs must be > 0")));
        }
        Ok(())
    }

    fn find_config_file() -> Option<PathBuf> {
        let local = PathBuf::from(CONFIG_FILE);
        if local.is_file() {
            return Some(local);
        }
        directories::ProjectDirs::from("", "", APP_NAME)
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
            .filter(|p| p.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_all_defaults() {
        let opts = AppOptions::from_toml("").unwrap();
        assert_eq!(opts, AppOptions::default());
        assert_eq!(opts.cache.max_bytes, DEFAULT_MAX_CACHE_BYTES);
        assert!(opts.headers.is_none());
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let opts = AppOptions::from_toml(
            r#"
            [endpoints]
            primary = "https://a.example/search"
            telemetry = "https://a.example/log"

            [headers]
            name = "Contact"
            "#,
        )
        .unwrap();
        assert_eq!(opts.endpoints.primary, "https://a.example/search");
        assert_eq!(opts.endpoints.fallback, DEFAULT_FALLBACK_URL);
        assert_eq!(opts.endpoints.telemetry.as_deref(), Some("https://a.example/log"));
        assert_eq!(opts.endpoints.timeout_secs, DEFAULT_TIMEOUT_SECS);
        let headers = opts.headers.unwrap();
        assert_eq!(headers.get(Field::Name), Some("Contact"));
        assert_eq!(headers.get(Field::Phone), None);
        assert_eq!(opts.export, ExportOptions::default());
    }

    #[test]
    fn pdf_font_is_read_from_export_section() {
        let opts = AppOptions::from_toml("[export]\npdf_font = \"fonts/cjk.ttf\"\n").unwrap();
        assert_eq!(opts.export.dir, PathBuf::from(DEFAULT_EXPORT_DIR));
        assert_eq!(opts.export.pdf_font, Some(PathBuf::from("fonts/cjk.ttf")));
    }

    #[test]
    fn zero_timeout_fails_validation() {
        let opts = AppOptions::from_toml("[endpoints]\ntimeout_secs = 0\n").unwrap();
        assert!(matches!(opts.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(AppOptions::from_toml("[endpoints\nprimary = 1").is_err());
    }
}
