//! aka CLI Library
//!
//! This crate provides the command-line interface for aka, a command-alias
//! dispatcher. It parses the options `aka` itself understands, wires the
//! built-in commands and the configured aliases into one command table, and
//! hands the rest of the command line to the dispatcher.
//!
//! # Key Features
//!
//! - **Verbatim Pass-Through**: Everything after the command name reaches the alias untouched
//! - **Built-in Commands**: `alias`, `version`, `config` and `help`
//! - **PATH Plugins**: `aka-*` executables on `PATH` become aliases unless `--no-path` is given
//! - **Exit Codes**: A failed external command's exit code becomes the exit code of `aka`
//!
//! # Architecture
//!
//! - [`cli_args`]: Command-line argument parsing
//! - [`builtins`]: The commands `aka` ships with
//! - [`session`]: The host shutdown hook
//! - [`app`]: Configuration loading, table building and dispatch
//!
//! # Examples
//!
//! ```bash
//! # List every command
//! aka
//!
//! # Print every alias and its template
//! aka alias
//!
//! # Run an alias, flags included
//! aka hello -v world
//!
//! # Use another configuration and skip PATH discovery
//! aka -c ./aliases.yml --no-path hello
//! ```

pub mod app;
pub mod builtins;
pub mod cli_args;
pub mod session;
