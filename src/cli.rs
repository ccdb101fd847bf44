// cli.rs - Command-line interface configuration
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{ViewerConfig, DEFAULT_BASE_URL};

#[derive(Parser, Debug, Clone)]
#[command(name = "model-viewer")]
#[command(about = "glTF model viewer backed by a remote model catalog", long_about = None)]
pub struct Cli {
    /// Catalog endpoint listing and storing models
    #[arg(long, env = "MODEL_VIEWER_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Uniform scale applied to every model shown
    #[arg(long, default_value_t = 1000.0)]
    pub model_scale: f32,

    /// Per-request timeout for catalog calls
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Worker threads for store and parse jobs
    #[arg(long, default_value_t = 4)]
    pub workers: usize,

    /// Stage a local scene file for upload at startup
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Hide the model list and upload panel
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,
}

impl Cli {
    pub fn to_config(&self) -> anyhow::Result<ViewerConfig> {
        anyhow::ensure!(
            self.model_scale.is_finite() && self.model_scale > 0.0,
            "--model-scale must be a positive number, got {}",
            self.model_scale
        );
        let mut config = ViewerConfig::new(&self.base_url)?;
        config.model_scale = self.model_scale;
        config.request_timeout = Duration::from_secs(self.timeout_secs);
        config.workers = self.workers.max(1);
        config.show_ui = !self.no_ui;
        Ok(config)
    }
}
