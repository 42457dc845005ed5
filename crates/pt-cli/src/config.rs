//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use pt_core::{Encodings, Extensions, SourceError};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Report file, overwritten on every run.
    pub output_path: PathBuf,

    /// Directory holding decompressed logs while they are analyzed.
    pub scratch_dir: PathBuf,

    /// Text encodings to try, in order, when decoding a log.
    pub encodings: Vec<String>,

    /// Suffixes of plain log files inside directories.
    pub log_extensions: Vec<String>,

    /// Suffixes of gzip-compressed log files.
    pub compressed_extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        let extensions = Extensions::default();
        Self {
            output_path: PathBuf::from("playtime-report.txt"),
            scratch_dir: std::env::temp_dir().join("playtime"),
            encodings: vec!["utf-8".to_string(), "gbk".to_string()],
            log_extensions: extensions.plain,
            compressed_extensions: extensions.compressed,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (PLAYTIME_*)
        figment = figment.merge(Env::prefixed("PLAYTIME_"));

        figment.extract()
    }

    /// Resolves the configured encoding labels.
    pub fn encodings(&self) -> Result<Encodings, SourceError> {
        Encodings::from_labels(self.encodings.as_slice())
    }

    pub fn extensions(&self) -> Extensions {
        Extensions {
            plain: self.log_extensions.clone(),
            compressed: self.compressed_extensions.clone(),
        }
    }
}

/// Returns the platform-specific config directory for playtime.
///
/// On Linux: `~/.config/playtime`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("playtime"))
}
