use log::error;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Exit code used when a failure carries no code of its own.
pub const GENERIC_FAILURE_CODE: i32 = 1;

#[derive(Error, Debug)]
pub enum Error {
    #[error("alias {} was specified multiple times", .0)]
    DuplicateAlias(String),

    #[error("{}.command not found", .path)]
    MissingAliasCommand { path: String },

    #[error("{} must be a string or single-element mapping", .path)]
    InvalidAliasEntry { path: String },

    #[error("alias `{}` is reserved for the alias listing", .0)]
    ReservedAlias(String),

    #[error("alias `{}` has the name of a built-in command", .0)]
    AliasShadowsCommand(String),

    #[error("Invalid alias name `{}`: {}", .name, .reason)]
    InvalidAliasName { name: String, reason: &'static str },

    #[error("Could not split the command of alias `{}`: {}", .alias, .original)]
    MalformedTemplate {
        alias: String,
        original: shell_words::ParseError,
    },

    #[error("Error {} {} file at `{}`: {}", .action, .file_description, .path, .original)]
    Yaml {
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    },

    #[error("IO error with {} file at path `{}`: {}", .file_description, .path, .original)]
    Io {
        file_description: String,
        path: String,
        original: std::io::Error,
    },

    #[error("unknown command '{}'", .0)]
    UnknownCommand(String),

    #[error("Alias `{}` expanded to an empty command", .0)]
    EmptyCommand(String),

    #[error("Alias `{}` refers back to itself", .0)]
    RecursiveAlias(String),

    #[error("command `{}` exited with code {}", .command, .code)]
    ExternalCommandFailed { command: String, code: i32 },

    #[error("exit requested with code {}", .code.unwrap_or(0))]
    RequestedExit { code: Option<i32> },

    #[error("Could not start `{}`: {}", .program, .original)]
    Spawn {
        program: String,
        original: std::io::Error,
    },

    #[error("Error with sub process: {}", _0)]
    SubProcess(std::io::Error),

    #[error("Could not write output: {}", _0)]
    Stdio(#[from] std::io::Error),
}

impl Error {
    pub fn yaml_error(
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    ) -> Self {
        Self::Yaml {
            action,
            file_description,
            path,
            original,
        }
    }

    pub fn io_error(file_description: String, path: String, original: std::io::Error) -> Self {
        Self::Io {
            file_description,
            path,
            original,
        }
    }

    pub fn spawn_error(program: &str, original: std::io::Error) -> Self {
        error!("Failed to spawn `{program}`: {original}");
        Self::Spawn {
            program: program.to_string(),
            original,
        }
    }

    /// Errors raised while building the alias registry, before any dispatch.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::DuplicateAlias(_)
                | Self::MissingAliasCommand { .. }
                | Self::InvalidAliasEntry { .. }
                | Self::ReservedAlias(_)
                | Self::AliasShadowsCommand(_)
                | Self::InvalidAliasName { .. }
                | Self::MalformedTemplate { .. }
                | Self::Yaml { .. }
                | Self::Io { .. }
        )
    }

    /// A request to terminate that should be treated as plain success.
    #[must_use]
    pub fn is_clean_exit(&self) -> bool {
        matches!(self, Self::RequestedExit { code: None | Some(0) })
    }

    /// The process exit code this error should terminate with.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ExternalCommandFailed { code, .. } => *code,
            Self::RequestedExit { code } => code.unwrap_or(0),
            _ => GENERIC_FAILURE_CODE,
        }
    }
}
