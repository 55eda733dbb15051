//! # form-config
//!
//! Settings for how formwork hands form instances to the validation engine.
//!
//! Forms themselves are declared in code; nothing about a form's fields or
//! rules is configurable here. What is configurable is the evaluation of a
//! compiled composite rule: which JSON Schema draft it runs under, whether
//! `format` keywords such as `email` are asserted, and how an instance's
//! unset optional fields (serialized as `null`) are treated. The same
//! settings apply to `FormInstance::validate` and to `formctl check`, so an
//! exported rule checked from the command line behaves as it does in-process.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`FORMWORK_*` prefix, `__` as separator)
//! 2. Project-level `.formwork/config.toml`
//! 3. User-level `~/.config/formwork/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `FORMWORK_VALIDATION__DRAFT` -> `validation.draft`,
//! `FORMWORK_VALIDATION__VALIDATE_FORMATS` -> `validation.validate_formats`,
//! `FORMWORK_VALIDATION__NULL_AS_MISSING` -> `validation.null_as_missing`.
//! A CI job can thus relax format checks for fixture data without touching
//! the project file.
//!
//! # Usage
//!
//! ```no_run
//! use form_config::FormConfig;
//!
//! let config = FormConfig::load_with_dotenv().expect("config");
//! println!("validating under draft {:?}", config.validation.draft);
//! ```

mod error;
mod validation;

pub use error::ConfigError;
pub use validation::{SchemaDraft, ValidationConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration. Only the `[validation]` table exists today; it
/// is kept as a table so renderer-side settings can sit beside it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct FormConfig {
    #[serde(default)]
    pub validation: ValidationConfig,
}

impl FormConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source cannot be parsed or a value
    /// has the wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration after reading a `.env` file, if one exists.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests and binaries can layer extra providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".formwork/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("FORMWORK_").split("__"))
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("formwork").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if set) before falling back to the
    /// current directory. Silently does nothing if no `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}
