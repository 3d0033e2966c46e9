//! Resolving an argument vector to the subcommand or program that runs it.

use std::io::Write;

use clap::ArgMatches;
use log::{debug, warn};

use crate::error::{Error, Result};
use crate::execution;
use crate::host::Context;

/// Leading character of a template that runs an external program.
pub const EXTERNAL_MARKER: char = '!';

/// Arguments after a subcommand's own parser has seen them.
#[derive(Debug, Clone, Default)]
pub struct ParsedArgs {
    pub options: ArgMatches,
    pub remaining: Vec<String>,
}

/// How a subcommand interprets the tokens following its name.
#[derive(Debug, Clone)]
pub enum ArgumentParser {
    /// Hands every token over untouched.
    PassThrough,
    /// Parses tokens with a clap command; anything it rejects ends the run.
    Clap(Box<clap::Command>),
}

impl ArgumentParser {
    /// Parses `args` for the subcommand called `name`.
    ///
    /// # Errors
    ///
    /// A clap parse failure is printed (help and version to stdout, usage
    /// errors to stderr) and returned as [`Error::RequestedExit`] with clap's
    /// exit code.
    pub fn parse(&self, context: &Context<'_>, name: &str, args: &[String]) -> Result<ParsedArgs> {
        match self {
            Self::PassThrough => Ok(ParsedArgs {
                options: ArgMatches::default(),
                remaining: args.to_vec(),
            }),
            Self::Clap(command) => {
                let program = std::iter::once(name.to_string());
                let argv = program.chain(args.iter().cloned());
                match command.as_ref().clone().try_get_matches_from(argv) {
                    Ok(options) => Ok(ParsedArgs {
                        options,
                        remaining: Vec::new(),
                    }),
                    Err(e) => {
                        if e.use_stderr() {
                            write!(context.output.stderr(), "{e}")?;
                        } else {
                            write!(context.output.stdout(), "{e}")?;
                        }
                        Err(Error::RequestedExit {
                            code: Some(e.exit_code()),
                        })
                    }
                }
            }
        }
    }
}

/// A command of the host application.
pub trait Subcommand {
    fn name(&self) -> &str;

    /// Short names the command also answers to.
    fn aliases(&self) -> &[String] {
        &[]
    }

    fn help(&self) -> &str;

    fn parser(&self) -> &ArgumentParser;

    /// Runs the command.
    ///
    /// # Errors
    ///
    /// [`Error::RequestedExit`] asks the host to terminate with a code; any
    /// other error is a fault.
    fn invoke(&self, context: &Context<'_>, args: ParsedArgs) -> Result<()>;

    fn matches(&self, name: &str) -> bool {
        self.name() == name || self.aliases().iter().any(|alias| alias == name)
    }
}

/// Ordered set of host subcommands. Earlier entries win on lookup.
#[derive(Default)]
pub struct SubcommandTable {
    commands: Vec<Box<dyn Subcommand>>,
}

impl SubcommandTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, command: Box<dyn Subcommand>) {
        if let Some(existing) = self.find(command.name()) {
            warn!(
                "Command `{}` is shadowed by `{}`",
                command.name(),
                existing.name()
            );
        }
        self.commands.push(command);
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<&dyn Subcommand> {
        self.commands
            .iter()
            .find(|command| command.matches(name))
            .map(|command| &**command)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Subcommand> {
        self.commands.iter().map(|command| &**command)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Where an argument vector goes.
pub enum DispatchTarget<'a> {
    Internal {
        subcommand: &'a dyn Subcommand,
        parsed: ParsedArgs,
    },
    External {
        executable: String,
        argv: Vec<String>,
    },
}

impl std::fmt::Debug for DispatchTarget<'_> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Internal { subcommand, parsed } => formatter
                .debug_struct("Internal")
                .field("subcommand", &subcommand.name())
                .field("remaining", &parsed.remaining)
                .finish(),
            Self::External { executable, argv } => formatter
                .debug_struct("External")
                .field("executable", executable)
                .field("argv", argv)
                .finish(),
        }
    }
}

/// Removes the external marker from the first token.
///
/// A first token made of the marker alone is dropped.
pub fn strip_marker(argv: &mut Vec<String>) {
    let Some(stripped) = argv
        .first()
        .and_then(|first| first.strip_prefix(EXTERNAL_MARKER))
        .map(str::to_string)
    else {
        return;
    };

    if stripped.is_empty() {
        argv.remove(0);
    } else {
        argv[0] = stripped;
    }
}

/// Decides what runs `argv`.
///
/// With `external` set the first token (marker removed) is the program to
/// spawn. Otherwise it must name a subcommand in the context's table, whose
/// parser then receives the remaining tokens.
///
/// # Errors
///
/// - [`Error::EmptyCommand`] if there is nothing to run
/// - [`Error::UnknownCommand`] if no subcommand matches
/// - [`Error::RequestedExit`] if the subcommand's parser rejects the tokens
pub fn resolve<'a>(
    context: &Context<'a>,
    alias: &str,
    mut argv: Vec<String>,
    external: bool,
) -> Result<DispatchTarget<'a>> {
    if external {
        strip_marker(&mut argv);
        let Some(executable) = argv.first().cloned() else {
            return Err(Error::EmptyCommand(alias.to_string()));
        };

        return Ok(DispatchTarget::External { executable, argv });
    }

    let Some((name, rest)) = argv.split_first() else {
        return Err(Error::EmptyCommand(alias.to_string()));
    };

    let subcommand = context
        .table
        .find(name)
        .ok_or_else(|| Error::UnknownCommand(name.clone()))?;

    debug!("Resolved `{name}` to subcommand `{}`", subcommand.name());

    let parsed = subcommand
        .parser()
        .parse(context, subcommand.name(), rest)?;

    Ok(DispatchTarget::Internal { subcommand, parsed })
}

/// Runs a resolved target to completion.
///
/// # Errors
///
/// Propagates the subcommand's error, or the runner's for external programs.
pub fn execute(context: &Context<'_>, target: DispatchTarget<'_>) -> Result<()> {
    match target {
        DispatchTarget::Internal { subcommand, parsed } => subcommand.invoke(context, parsed),
        DispatchTarget::External { executable, argv } => {
            execution::run(&executable, &argv, context.output)
        }
    }
}

/// Runs the subcommand named by `argv[0]` with the tokens that follow.
///
/// This is the entry point for a command line typed by the user.
///
/// # Errors
///
/// See [`resolve`] and [`execute`].
pub fn invoke(context: &Context<'_>, argv: Vec<String>) -> Result<()> {
    let target = resolve(context, "command line", argv, false)?;
    execute(context, target)
}
