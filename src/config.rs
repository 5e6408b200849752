use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::filter::DEFAULT_YEAR_RANGE;

/// Optional config file looked up in the working directory.
pub const CONFIG_FILE: &str = "rusty-reels.json";
/// Environment override for the dataset location.
pub const DATA_ENV: &str = "RUSTY_REELS_DATA";

// ---------------------------------------------------------------------------
// Application configuration
// ---------------------------------------------------------------------------

/// Startup settings. Precedence, lowest first: built-in defaults, the config
/// file, `RUSTY_REELS_DATA`, the first command-line argument.
///
/// ```json
/// { "data_path": "data/netflix_titles.csv", "default_year_range": [2010, 2021] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Dataset loaded at startup, relative to the working directory or absolute.
    pub data_path: PathBuf,
    /// Initial year range, clamped to the dataset's observed years.
    pub default_year_range: (i32, i32),
    /// Rows shown in the data preview table.
    pub preview_rows: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("netflix_titles.csv"),
            default_year_range: DEFAULT_YEAR_RANGE,
            preview_rows: 10,
        }
    }
}

impl AppConfig {
    /// Resolve the configuration for this process. A broken config file is
    /// logged and skipped.
    pub fn load() -> Self {
        let base = if Path::new(CONFIG_FILE).exists() {
            match Self::from_file(Path::new(CONFIG_FILE)) {
                Ok(cfg) => cfg,
                Err(e) => {
                    log::warn!("Ignoring {CONFIG_FILE}: {e:#}");
                    Self::default()
                }
            }
        } else {
            Self::default()
        };

        base.with_overrides(
            std::env::var_os(DATA_ENV).map(PathBuf::from),
            std::env::args_os().nth(1).map(PathBuf::from),
        )
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Apply the environment and command-line dataset paths, the latter winning.
    pub fn with_overrides(mut self, env_path: Option<PathBuf>, arg_path: Option<PathBuf>) -> Self {
        if let Some(path) = arg_path.or(env_path) {
            self.data_path = path;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.data_path, PathBuf::from("netflix_titles.csv"));
        assert_eq!(cfg.default_year_range, (2015, 2021));
        assert_eq!(cfg.preview_rows, 10);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "default_year_range": [2000, 2010] }}"#).unwrap();

        let cfg = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(cfg.default_year_range, (2000, 2010));
        assert_eq!(cfg.data_path, PathBuf::from("netflix_titles.csv"));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "data_pth": "x.csv" }}"#).unwrap();

        let err = AppConfig::from_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("data_pth"));
    }

    #[test]
    fn test_override_precedence() {
        let env = Some(PathBuf::from("env.csv"));
        let arg = Some(PathBuf::from("arg.csv"));

        let cfg = AppConfig::default().with_overrides(env.clone(), arg);
        assert_eq!(cfg.data_path, PathBuf::from("arg.csv"));

        let cfg = AppConfig::default().with_overrides(env, None);
        assert_eq!(cfg.data_path, PathBuf::from("env.csv"));

        let cfg = AppConfig::default().with_overrides(None, None);
        assert_eq!(cfg.data_path, PathBuf::from("netflix_titles.csv"));
    }
}
