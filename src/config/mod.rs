// src/config/mod.rs

//! Configuration loading and validation for idlemon.
//!
//! Responsibilities:
//! - Define the data model (`model.rs`).
//! - Parse the line-oriented file format (`parser.rs`, `duration.rs`,
//!   `argv.rs`).
//! - Load a config file through a [`crate::fs::FileSystem`] (`loader.rs`).
//! - Validate required fields and unique task names (`validate.rs`).

pub mod argv;
pub mod duration;
pub mod loader;
pub mod model;
pub mod parser;
pub mod validate;

pub use duration::parse_duration;
pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{Config, GlobalSettings, LogSettings, RawConfig, RawTask, TaskConfig};
