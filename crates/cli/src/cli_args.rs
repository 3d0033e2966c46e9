//! Command-line argument parsing.
//!
//! Only the options before the command name belong to `aka` itself. The
//! command name and everything after it are handed to the dispatcher
//! untouched, flags included.

use clap::Parser;

/// Command-line arguments for the `aka` binary.
///
/// # Examples
///
/// ```rust
/// use clap::Parser;
/// use aka_cli::cli_args::Args;
///
/// let args = Args::parse_from(["aka", "--no-path", "hello", "-v", "world"]);
/// assert!(args.no_path);
/// assert_eq!(args.command_line, vec!["hello", "-v", "world"]);
/// ```
#[derive(Parser, Debug)] // requires `derive` feature
#[command(name = "aka", version, about, term_width = 0)]
pub struct Args {
    /// Path to the configuration YAML.
    ///
    /// If not provided, defaults to `~/.aka/config.yml`, which may be absent.
    /// A path given here must exist.
    #[arg(long, short = 'c')]
    pub config_path: Option<String>,

    /// Don't turn `aka-*` executables on `PATH` into aliases for this run.
    #[arg(long, action)]
    pub no_path: bool,

    /// The command to run followed by its arguments.
    ///
    /// When empty, the available commands are listed.
    #[arg(trailing_var_arg = true)]
    pub command_line: Vec<String>,
}
