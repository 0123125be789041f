//! User configuration: `config.toml`, `PREDIZER_*` environment overrides, defaults.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use predizer_client::{EndpointUrl, PredictHttpConfig};
use predizer_error::FatalError;
use serde::{Deserialize, Serialize};

use crate::controller::{EmptyInputPolicy, RenderSettings};
use crate::tokens::RenderPolicy;

pub const ENV_PREFIX: &str = "PREDIZER";

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct FormConfig {
    #[serde(default)]
    pub endpoint: EndpointUrl,
    /// No timeout when unset.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub render_policy: RenderPolicy,
    #[serde(default)]
    pub empty_input: EmptyInputPolicy,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

impl FormConfig {
    /// Load from `path` (optional file) with environment overrides.
    ///
    /// `env` replaces the process environment as the override source when given.
    pub fn load_from(
        path: &Path,
        env: Option<HashMap<String, String>>,
    ) -> predizer_error::Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .and_then(|c| c.try_deserialize::<FormConfig>())
            .map_err(|e| FatalError::Config {
                message: format!("failed to load {}: {e}", path.display()),
                source: Some(Box::new(e)),
            })?;
        tracing::debug!(?cfg, "loaded configuration");
        Ok(cfg)
    }

    /// Save the configuration to the specified path, replacing it atomically.
    pub fn save_to_path(&self, path: &Path) -> color_eyre::Result<()> {
        let toml_str = toml::to_string_pretty(self)?;
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        std::fs::create_dir_all(&dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        use std::io::Write as _;
        tmp.write_all(toml_str.as_bytes())?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(path)?;
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn http_config(&self) -> PredictHttpConfig {
        PredictHttpConfig::new(self.endpoint.clone()).with_timeout(self.timeout())
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            render_policy: self.render_policy,
            empty_input: self.empty_input,
        }
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(predizer_common::default_log_dir)
    }
}

/// Default config.toml path: ~/.config/predizer/config.toml
pub fn default_config_path() -> PathBuf {
    predizer_common::default_config_path()
}
