//! Parsing and validation of `strata.toml` project descriptions.
//!
//! This crate reads the project configuration file and produces a strongly-typed
//! [`ProjectConfig`]: the primaries and their dependencies, the targets linked
//! from them, lone units, toolchain settings and per-profile flags.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE_NAME};
pub use resolve::{resolve_profile, resolve_target, ResolvedProfile};
pub use types::*;
