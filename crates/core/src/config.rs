//! Configuration path utilities for aka.
//!
//! This module provides functions for resolving the configuration file path
//! and expanding shell variables like `~` in paths.

/// Default path for the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "~/.aka/config.yml";

/// Prefix of executables on `PATH` that become aliases.
pub const PATH_COMMAND_PREFIX: &str = "aka-";

/// Resolves the configuration file path.
///
/// If a custom path is provided, uses that path. Otherwise, uses the default
/// configuration path. Shell expansions like `~` are resolved.
///
/// # Arguments
///
/// * `config_path_arg` - Optional custom configuration file path
///
/// # Returns
///
/// The resolved absolute path to the configuration file
///
/// # Examples
///
/// ```
/// use aka_core::config::get_config_path;
///
/// // Use default path
/// let default_path = get_config_path(&None);
///
/// // Use custom path
/// let custom_path = get_config_path(&Some("/path/to/config.yml".to_string()));
/// ```
pub fn get_config_path(config_path_arg: &Option<String>) -> String {
    let config_path = match config_path_arg {
        Some(config_path) => config_path,
        None => DEFAULT_CONFIG_PATH,
    };

    shellexpand::tilde(config_path).to_string()
}
