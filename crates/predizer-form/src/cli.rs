use std::path::PathBuf;

use clap::Parser;
use predizer_client::EndpointUrl;

use crate::controller::EmptyInputPolicy;
use crate::tokens::RenderPolicy;
use crate::user_config::{self, FormConfig};

/// Send comma-separated features to a prediction endpoint and print the result.
///
/// Without `--features`, every line read from stdin is submitted as the input field's value.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "predizer", version, about, long_about = None)]
pub struct Cli {
    /// Submit these features once and exit, e.g. "1,2,3"
    #[arg(short, long, allow_hyphen_values = true)]
    pub features: Option<String>,

    /// Prediction endpoint URL
    #[arg(short, long)]
    pub endpoint: Option<EndpointUrl>,

    /// Give up on a request after this many seconds
    #[arg(short, long)]
    pub timeout_secs: Option<u64>,

    /// Which response wins when requests overlap
    #[arg(long, value_enum)]
    pub render_policy: Option<RenderPolicy>,

    /// When to show the "enter the features" guidance instead of sending
    #[arg(long, value_enum)]
    pub empty_input: Option<EmptyInputPolicy>,

    /// Config file, defaults to <config dir>/predizer/config.toml
    #[arg(short, long, env = "PREDIZER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory for log files
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Write the resolved settings to the config file and exit
    #[arg(long)]
    pub save_config: bool,
}

impl Cli {
    /// The config file this invocation reads and, with `--save-config`, writes.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(user_config::default_config_path)
    }

    /// Command-line flags win over file and environment settings.
    pub fn apply_to(&self, mut cfg: FormConfig) -> FormConfig {
        if let Some(endpoint) = &self.endpoint {
            cfg.endpoint = endpoint.clone();
        }
        if let Some(secs) = self.timeout_secs {
            cfg.timeout_secs = Some(secs);
        }
        if let Some(policy) = self.render_policy {
            cfg.render_policy = policy;
        }
        if let Some(policy) = self.empty_input {
            cfg.empty_input = policy;
        }
        if let Some(dir) = &self.log_dir {
            cfg.log_dir = Some(dir.clone());
        }
        cfg
    }
}
