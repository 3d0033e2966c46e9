//! One run of `aka`: load the configuration, build the command table and
//! dispatch the command line.

use std::ffi::OsStr;
use std::sync::Arc;

use log::{debug, info};

use aka_core::dispatch::{self, SubcommandTable};
use aka_core::error::{Error, Result};
use aka_core::events::Notifier;
use aka_core::host::{Context, Host, Output};
use aka_core::{config, file_handling, registry};

use crate::builtins;
use crate::cli_args::Args;
use crate::session::Session;

/// Loads the configuration and registers the built-ins and every alias.
///
/// # Errors
///
/// Returns any configuration error; nothing has been dispatched yet.
pub fn build_table(
    args: &Args,
    path_var: Option<&OsStr>,
    notifier: &Arc<dyn Notifier>,
) -> Result<SubcommandTable> {
    let config_path = config::get_config_path(&args.config_path);
    debug!("Config path: `{config_path}`");

    let config = file_handling::load_config(&config_path, args.config_path.is_some())?;

    let path_var = if args.no_path {
        info!("PATH discovery disabled for this run");
        None
    } else {
        path_var
    };
    let definitions = registry::build_definitions(&config, path_var)?;

    let mut table = SubcommandTable::new();
    builtins::register(&mut table, &config_path);
    registry::register_aliases(&mut table, definitions, notifier)?;
    Ok(table)
}

/// Runs the command line in `args`, or lists the commands if there is none.
///
/// The session is shut down before returning, whatever the outcome.
///
/// # Errors
///
/// Returns configuration errors and whatever ended the command.
pub fn execute(
    args: &Args,
    output: &Output,
    path_var: Option<&OsStr>,
    notifier: Arc<dyn Notifier>,
) -> Result<()> {
    let table = build_table(args, path_var, &notifier)?;
    let session = Session::new(notifier, output);
    let context = Context::new(&table, &session, output);

    let result = if args.command_line.is_empty() {
        builtins::write_help(&context)
    } else {
        dispatch::invoke(&context, args.command_line.clone())
    };

    session.shutdown();
    result
}

/// Process exit status for a failed run.
///
/// Codes that don't fit a process status become 1.
#[must_use]
pub fn exit_status(error: &Error) -> u8 {
    u8::try_from(error.exit_code()).unwrap_or(1)
}

/// Whether `error` should be printed before exiting.
///
/// Failed children and requested exits have already said what they had to.
#[must_use]
pub fn should_report(error: &Error) -> bool {
    !matches!(
        error,
        Error::ExternalCommandFailed { .. } | Error::RequestedExit { .. }
    )
}
