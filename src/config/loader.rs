// src/config/loader.rs

use std::path::{Path, PathBuf};

use crate::config::model::{Config, RawConfig};
use crate::config::parser::parse_config;
use crate::errors::{ConfigError, Result};
use crate::fs::FileSystem;

/// File name looked up in the user's config directory.
pub const CONFIG_FILE_NAME: &str = "idlemon.conf";

/// Read and parse a config file without semantic validation.
///
/// Use [`load_and_validate`] for the checks on required fields, duplicate
/// task names and the presence of at least one task.
pub fn load_from_path(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<RawConfig> {
    let path = path.as_ref();
    let contents = fs
        .read_to_string(path)
        .map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(parse_config(&contents)?)
}

/// Load a config file from path and validate it.
///
/// Any failure rejects the whole file; nothing is partially applied.
pub fn load_and_validate(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<Config> {
    let raw_config = load_from_path(fs, &path)?;
    Config::try_from(raw_config)
}

/// Default config path: `$XDG_CONFIG_HOME/idlemon.conf`, falling back to
/// `~/.config/idlemon.conf`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}
