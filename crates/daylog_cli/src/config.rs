//! CLI configuration: backing-file location, schema file, logging.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// The record store file. Created on first submitted entry.
    pub data_file: PathBuf,
    /// Optional schema JSON file; the built-in wellbeing schema is used
    /// when unset.
    pub schema_file: Option<PathBuf>,
    pub log_dir: PathBuf,
    pub log_level: String,
}

fn project_dirs() -> Result<ProjectDirs, String> {
    ProjectDirs::from("dev", "daylog", "DayLog")
        .ok_or_else(|| "cannot determine a home directory for this user".to_string())
}

impl Config {
    fn default_for(dirs: &ProjectDirs) -> Self {
        Self {
            data_file: dirs.data_dir().join("daylog.csv"),
            schema_file: None,
            log_dir: dirs.data_dir().join("logs"),
            log_level: "info".to_string(),
        }
    }
}

/// Loads the config file, writing defaults on first run.
///
/// An unreadable or unparsable file is a configuration error; it is
/// surfaced instead of silently replaced so a typo cannot redirect the
/// record store.
pub fn load_or_init() -> Result<Config, String> {
    let dirs = project_dirs()?;
    let path = dirs.config_dir().join("config.toml");

    if path.exists() {
        let text = fs::read_to_string(&path)
            .map_err(|err| format!("cannot read config `{}`: {err}", path.display()))?;
        return toml::from_str(&text)
            .map_err(|err| format!("config `{}` is invalid: {err}", path.display()));
    }

    let config = Config::default_for(&dirs);
    fs::create_dir_all(dirs.config_dir())
        .map_err(|err| format!("cannot create `{}`: {err}", dirs.config_dir().display()))?;
    let text = toml::to_string_pretty(&config)
        .map_err(|err| format!("cannot serialize default config: {err}"))?;
    fs::write(&path, text)
        .map_err(|err| format!("cannot write config `{}`: {err}", path.display()))?;
    Ok(config)
}
