//! Reading the configuration file and validating alias names.

use std::fs;
use std::io::ErrorKind;

use log::info;

use crate::command_definitions::Config;
use crate::error::{Error, Result};

/// Loads the configuration file at `config_path`.
///
/// An empty file is an empty configuration. A missing file is only an error
/// when `required` is set; otherwise the defaults are used.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read (or is missing while `required`)
/// - The YAML is malformed or doesn't match the expected structure
///
/// # Examples
///
/// ```no_run
/// use aka_core::file_handling::load_config;
///
/// let config = load_config("/home/me/.aka/config.yml", false)?;
/// println!("PATH discovery: {}", config.alias.from_path);
/// # Ok::<(), aka_core::error::Error>(())
/// ```
pub fn load_config(config_path: &str, required: bool) -> Result<Config> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound && !required => {
            info!("No config file at `{config_path}`, using defaults");
            return Ok(Config::default());
        }
        Err(e) => {
            return Err(Error::io_error(
                "config".to_string(),
                config_path.to_string(),
                e,
            ))
        }
    };

    parse_config(config_path, &contents)
}

/// Parses configuration YAML read from `config_path`.
///
/// # Errors
///
/// Returns an error if the YAML is malformed or has the wrong structure.
pub fn parse_config(config_path: &str, contents: &str) -> Result<Config> {
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }

    serde_yaml::from_str(contents).map_err(|e| {
        Error::yaml_error(
            "reading".to_string(),
            "config".to_string(),
            config_path.to_string(),
            e,
        )
    })
}

/// Checks that `name` can be typed as a single command-line word.
///
/// # Errors
///
/// Returns [`Error::InvalidAliasName`] for empty names, names with
/// whitespace and names starting with `-`.
pub fn validate_name(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        "name may not be empty"
    } else if name.chars().any(char::is_whitespace) {
        "name may not contain whitespace"
    } else if name.starts_with('-') {
        "name may not start with `-`"
    } else {
        return Ok(());
    };

    Err(Error::InvalidAliasName {
        name: name.to_string(),
        reason,
    })
}
