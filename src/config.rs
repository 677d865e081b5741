use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::audio::waveform::DEFAULT_POINTS;
use crate::master::reference::DEFAULT_REFERENCE_DIR;

pub const CONFIG_FILE: &str = "masterify.toml";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub waveform: WaveformConfig,
    #[serde(default)]
    pub references: ReferenceConfig,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Overrides every preset's bitrate when set
    #[serde(default)]
    pub bitrate: Option<String>,
    #[serde(default = "default_format")]
    pub format: String,
}

#[derive(Debug, Deserialize)]
pub struct WaveformConfig {
    #[serde(default = "default_points")]
    pub points: usize,
}

#[derive(Debug, Deserialize)]
pub struct ReferenceConfig {
    #[serde(default = "default_reference_dir")]
    pub dir: PathBuf,
    /// Preset id -> download URL or local path
    #[serde(default)]
    pub urls: BTreeMap<String, String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            bitrate: None,
            format: default_format(),
        }
    }
}

impl Default for WaveformConfig {
    fn default() -> Self {
        Self {
            points: default_points(),
        }
    }
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            dir: default_reference_dir(),
            urls: BTreeMap::new(),
        }
    }
}

fn default_format() -> String { "mp3".into() }
fn default_points() -> usize { DEFAULT_POINTS }
fn default_reference_dir() -> PathBuf { PathBuf::from(DEFAULT_REFERENCE_DIR) }

pub fn load_config(path: &Path) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(err) => {
            log::warn!("Invalid config {}: {}", path.display(), err);
            None
        }
    }
}

/// `./masterify.toml`, then `~/.config/masterify/config.toml`, then the
/// platform config directory.
pub fn discover() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }
    if let Some(home) = dirs::home_dir() {
        let xdg = home.join(".config").join("masterify").join("config.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let platform = config_dir.join("masterify").join("config.toml");
        if platform.exists() {
            return Some(platform);
        }
    }
    None
}
