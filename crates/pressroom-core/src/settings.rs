use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Default directory searched for main, header and footer templates.
pub const DEFAULT_TEMPLATE_DIR: &str = "./assets";

pub const ENVIRONMENT_VAR: &str = "ENVIRONMENT";
pub const TEMPLATE_DIR_VAR: &str = "TEMPLATE_DIR";
pub const WKHTMLTOPDF_PATH_VAR: &str = "WKHTMLTOPDF_PATH";

/// Where the process runs. Only `Local` changes behavior: temp files then
/// live under a relative `temp` directory instead of the system one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Local,
    #[default]
    Deployed,
}

impl Environment {
    /// `"local"` selects [`Environment::Local`]; any other value does not.
    pub fn from_name(name: &str) -> Self {
        if name == "local" {
            Environment::Local
        } else {
            Environment::Deployed
        }
    }

    pub fn is_local(self) -> bool {
        self == Environment::Local
    }
}

/// Runtime settings of the PDF pipeline.
///
/// Read once at startup and passed explicitly; nothing below this type
/// looks at process environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default = "Settings::default_template_dir")]
    pub template_dir: PathBuf,
    /// Explicit renderer binary. `None` means look `wkhtmltopdf` up on `PATH`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wkhtmltopdf_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            template_dir: Self::default_template_dir(),
            wkhtmltopdf_path: None,
        }
    }
}

impl Settings {
    fn default_template_dir() -> PathBuf {
        PathBuf::from(DEFAULT_TEMPLATE_DIR)
    }

    /// Build settings from the process environment.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    ///
    /// An unset or empty `WKHTMLTOPDF_PATH` falls back to `PATH` discovery.
    /// `TEMPLATE_DIR`, when set, must not be empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup(ENVIRONMENT_VAR)
            .map(|name| Environment::from_name(&name))
            .unwrap_or_default();

        let template_dir = match lookup(TEMPLATE_DIR_VAR) {
            Some(dir) if dir.trim().is_empty() => {
                return Err(CoreError::InvalidSetting {
                    name: TEMPLATE_DIR_VAR,
                    reason: "must not be empty".to_string(),
                });
            }
            Some(dir) => PathBuf::from(dir),
            None => Self::default_template_dir(),
        };

        let wkhtmltopdf_path = lookup(WKHTMLTOPDF_PATH_VAR)
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        let settings = Settings {
            environment,
            template_dir,
            wkhtmltopdf_path,
        };
        tracing::debug!(?settings, "settings loaded");
        Ok(settings)
    }
}
