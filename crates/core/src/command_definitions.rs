use std::fmt::{Display, Formatter};

use indexmap::IndexMap;
use serde::Deserialize;
use serde_yaml::Value;

use crate::error::{Error, Result};

/// Settings of the `alias` section of the configuration file.
#[derive(Deserialize, Debug, Clone)]
pub struct AliasSection {
    /// Register `aka-*` executables found on `PATH` as aliases.
    #[serde(default = "default_from_path")]
    pub from_path: bool,
    #[serde(default)]
    pub aliases: IndexMap<String, Value>,
}

fn default_from_path() -> bool {
    true
}

impl Default for AliasSection {
    fn default() -> Self {
        Self {
            from_path: default_from_path(),
            aliases: IndexMap::new(),
        }
    }
}

/// The whole configuration file.
///
/// Aliases may be given under `alias.aliases` or at the top level under
/// `aliases`; both are merged.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub alias: AliasSection,
    #[serde(default)]
    pub aliases: IndexMap<String, Value>,
}

impl Config {
    /// Both alias mappings, each with the key path used in error messages.
    #[must_use]
    pub fn alias_sources(&self) -> [(&'static str, &IndexMap<String, Value>); 2] {
        [
            ("alias.aliases", &self.alias.aliases),
            ("aliases", &self.aliases),
        ]
    }
}

/// A single configured alias, either a plain template or a mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasEntry {
    Template(String),
    Mapping {
        command: String,
        help: Option<String>,
        aliases: Vec<String>,
    },
}

impl AliasEntry {
    /// Interprets a raw configuration value found at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A mapping has no (or an empty) `command`
    /// - The value is neither a string nor a mapping
    pub fn from_value(path: &str, value: &Value) -> Result<Self> {
        match value {
            Value::String(template) => Ok(Self::Template(template.clone())),
            Value::Mapping(mapping) => {
                let command = mapping
                    .get("command")
                    .and_then(Value::as_str)
                    .filter(|command| !command.is_empty())
                    .ok_or_else(|| Error::MissingAliasCommand {
                        path: path.to_string(),
                    })?;

                let help = mapping
                    .get("help")
                    .and_then(Value::as_str)
                    .map(ToString::to_string);

                let aliases = match mapping.get("aliases") {
                    None | Some(Value::Null) => Vec::new(),
                    Some(Value::String(alias)) => vec![alias.clone()],
                    Some(Value::Sequence(aliases)) => aliases
                        .iter()
                        .map(|alias| {
                            alias.as_str().map(ToString::to_string).ok_or_else(|| {
                                Error::InvalidAliasEntry {
                                    path: format!("{path}.aliases"),
                                }
                            })
                        })
                        .collect::<Result<Vec<_>>>()?,
                    Some(_) => {
                        return Err(Error::InvalidAliasEntry {
                            path: format!("{path}.aliases"),
                        })
                    }
                };

                Ok(Self::Mapping {
                    command: command.to_string(),
                    help,
                    aliases,
                })
            }
            _ => Err(Error::InvalidAliasEntry {
                path: path.to_string(),
            }),
        }
    }
}

impl Display for AliasEntry {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Template(command) => formatter.write_str(command),
            Self::Mapping {
                command,
                help: Some(help),
                ..
            } => write!(formatter, "{command} ({help})"),
            Self::Mapping { command, .. } => formatter.write_str(command),
        }
    }
}
