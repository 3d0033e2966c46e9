//! Commands `aka` ships with besides the aliases.

use std::fs;
use std::io::{ErrorKind, Write};

use clap::{Arg, ArgAction};
use itertools::Itertools;
use log::debug;

use aka_core::dispatch::{ArgumentParser, ParsedArgs, Subcommand, SubcommandTable};
use aka_core::error::{Error, Result};
use aka_core::host::Context;

/// `version`, prints the version of the binary.
pub struct VersionCommand {
    aliases: Vec<String>,
    parser: ArgumentParser,
}

impl VersionCommand {
    #[must_use]
    pub fn new() -> Self {
        Self {
            aliases: vec!["ver".to_string()],
            parser: ArgumentParser::PassThrough,
        }
    }
}

impl Default for VersionCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl Subcommand for VersionCommand {
    fn name(&self) -> &str {
        "version"
    }

    fn aliases(&self) -> &[String] {
        &self.aliases
    }

    fn help(&self) -> &str {
        "Output the version of aka."
    }

    fn parser(&self) -> &ArgumentParser {
        &self.parser
    }

    fn invoke(&self, context: &Context<'_>, _args: ParsedArgs) -> Result<()> {
        writeln!(
            context.output.stdout(),
            "aka version {}",
            env!("CARGO_PKG_VERSION")
        )?;
        Ok(())
    }
}

/// `config [-p]`, shows the configuration file or its path.
pub struct ConfigCommand {
    config_path: String,
    aliases: Vec<String>,
    parser: ArgumentParser,
}

impl ConfigCommand {
    #[must_use]
    pub fn new(config_path: &str) -> Self {
        let command = clap::Command::new("config")
            .about("Show the configuration")
            .arg(
                Arg::new("paths")
                    .short('p')
                    .long("paths")
                    .action(ArgAction::SetTrue)
                    .help("Show the configuration file path instead of its contents"),
            );

        Self {
            config_path: config_path.to_string(),
            aliases: vec!["cfg".to_string()],
            parser: ArgumentParser::Clap(Box::new(command)),
        }
    }
}

impl Subcommand for ConfigCommand {
    fn name(&self) -> &str {
        "config"
    }

    fn aliases(&self) -> &[String] {
        &self.aliases
    }

    fn help(&self) -> &str {
        "Show the configuration."
    }

    fn parser(&self) -> &ArgumentParser {
        &self.parser
    }

    fn invoke(&self, context: &Context<'_>, args: ParsedArgs) -> Result<()> {
        if args.options.get_flag("paths") {
            writeln!(context.output.stdout(), "{}", self.config_path)?;
            return Ok(());
        }

        match fs::read_to_string(&self.config_path) {
            Ok(contents) => {
                let mut stdout = context.output.stdout();
                write!(stdout, "{contents}")?;
                if !contents.is_empty() && !contents.ends_with('\n') {
                    writeln!(stdout)?;
                }
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                writeln!(
                    context.output.stderr(),
                    "No configuration file at {}",
                    self.config_path
                )?;
                Ok(())
            }
            Err(e) => Err(Error::io_error(
                "config".to_string(),
                self.config_path.clone(),
                e,
            )),
        }
    }
}

/// `help`, lists every command of the table.
pub struct HelpCommand {
    aliases: Vec<String>,
    parser: ArgumentParser,
}

impl HelpCommand {
    #[must_use]
    pub fn new() -> Self {
        Self {
            aliases: vec!["?".to_string(), "h".to_string()],
            parser: ArgumentParser::PassThrough,
        }
    }
}

impl Default for HelpCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl Subcommand for HelpCommand {
    fn name(&self) -> &str {
        "help"
    }

    fn aliases(&self) -> &[String] {
        &self.aliases
    }

    fn help(&self) -> &str {
        "Give detailed help on a specific sub-command."
    }

    fn parser(&self) -> &ArgumentParser {
        &self.parser
    }

    fn invoke(&self, context: &Context<'_>, _args: ParsedArgs) -> Result<()> {
        write_help(context)
    }
}

/// One line per command, `name (short names)  help`, sorted by name.
#[must_use]
pub fn help_lines(table: &SubcommandTable) -> Vec<String> {
    let entries: Vec<(String, &str)> = table
        .iter()
        .map(|command| {
            let label = if command.aliases().is_empty() {
                command.name().to_string()
            } else {
                format!("{} ({})", command.name(), command.aliases().join(", "))
            };
            (label, command.help())
        })
        .sorted_by(|a, b| a.0.cmp(&b.0))
        .collect();

    let width = entries
        .iter()
        .map(|(label, _)| label.len())
        .max()
        .unwrap_or(0);
    entries
        .into_iter()
        .map(|(label, help)| format!("  {label:<width$}  {help}"))
        .collect()
}

/// Writes the usage line and the command listing to stdout.
///
/// # Errors
///
/// Returns an error if stdout can't be written.
pub fn write_help(context: &Context<'_>) -> Result<()> {
    let mut stdout = context.output.stdout();
    writeln!(stdout, "Usage: aka [-c PATH] [--no-path] <command> [args...]")?;
    writeln!(stdout)?;
    writeln!(stdout, "Commands:")?;
    for line in help_lines(context.table) {
        writeln!(stdout, "{line}")?;
    }
    stdout.flush()?;
    Ok(())
}

/// Adds the built-in commands. They go in before any alias.
pub fn register(table: &mut SubcommandTable, config_path: &str) {
    debug!("Registering built-in commands");
    table.register(Box::new(VersionCommand::new()));
    table.register(Box::new(ConfigCommand::new(config_path)));
    table.register(Box::new(HelpCommand::new()));
}
