use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::HistoryError;

pub const DEFAULT_TOP_DOMAINS: usize = 10;
pub const DEFAULT_DAYS_HISTORY: u32 = 30;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ExtractorConfig {
    pub database_path: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub file_prefix: String,
    pub save_csv: bool,
    /// Directory the temporary database snapshot is created in.
    pub scratch_dir: Option<PathBuf>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            output_dir: PathBuf::from("history_data"),
            file_prefix: "chrome_history".to_string(),
            save_csv: true,
            scratch_dir: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct VisualizerConfig {
    pub output_dir: PathBuf,
    pub top_n: usize,
    pub days: u32,
    pub chart_width: u32,
    pub chart_height: u32,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("charts"),
            top_n: DEFAULT_TOP_DOMAINS,
            days: DEFAULT_DAYS_HISTORY,
            chart_width: 1200,
            chart_height: 700,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub extractor: ExtractorConfig,
    pub visualizer: VisualizerConfig,
}

pub fn load_config(path: Option<&Path>) -> Result<Config, HistoryError> {
    let bytes: Vec<u8> = if let Some(p) = path {
        std::fs::read(p)?
    } else {
        include_bytes!("../config/default.yml").to_vec()
    };

    let config: Config = serde_yaml::from_slice(&bytes)?;
    Ok(config)
}
