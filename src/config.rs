//! Compile-time defaults and optional TOML overrides.
//!
//! An ordered tag list, a border width in pixels, and the two border
//! colours. A missing or malformed file falls back to defaults rather than
//! unwrapping -- a window manager should not refuse to start over a config
//! typo.
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::layout::LayoutKind;

/// Default control-socket path.
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/vaswm.socket";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Colours {
    pub accent: u64,
    pub default: u64,
}

impl Default for Colours {
    fn default() -> Self {
        Colours {
            accent: 0xFF_0000,
            default: 0x88_8888,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tags: Vec<String>,
    pub borderpx: u32,
    pub colours: Colours,
    pub socket_path: String,
    /// The layout newly-constructed workspaces start on.
    #[serde(skip)]
    pub default_layout: LayoutKind,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tags: vec!["wrk", "www", "cmd", "fun", "etc"]
                .into_iter()
                .map(String::from)
                .collect(),
            borderpx: 4,
            colours: Colours::default(),
            socket_path: DEFAULT_SOCKET_PATH.to_string(),
            default_layout: LayoutKind::ThreeColumns,
        }
    }
}

impl Config {
    /// Default on-disk location, `$XDG_CONFIG_HOME/vaswm/config.toml`
    /// (falling back to `~/.config` the way `dirs::config_dir` does).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("vaswm").join("config.toml"))
    }

    /// Load from `path` if it exists and parses; otherwise log and fall back
    /// to [`Config::default`]. Never fails the process over configuration.
    pub fn load(path: Option<&Path>) -> Config {
        let path = path.map(Path::to_path_buf).or_else(Config::default_path);

        let path = match path {
            Some(p) => p,
            None => return Config::default(),
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(cfg) => {
                    debug!("loaded config from {:?}: {:#?}", path, cfg);
                    cfg
                }
                Err(e) => {
                    warn!("failed to parse config at {:?}: {}, using defaults", path, e);
                    Config::default()
                }
            },
            Err(_) => {
                debug!("no config file at {:?}, using defaults", path);
                Config::default()
            }
        }
    }
}
