//! aka Core Library
//!
//! This crate provides the core functionality for aka, a command-alias
//! dispatcher. An alias maps a short name to a template that expands either
//! into another command of the host application or into an external program.
//!
//! # Key Features
//!
//! - **Placeholder Substitution**: `{0}`, `{1}`, ... take single caller arguments, `{}` takes the rest
//! - **Dual Dispatch**: Templates starting with `!` run external programs, anything else runs a host subcommand
//! - **Live Output Relay**: Child stdout and stderr are forwarded line by line while the child runs
//! - **Alias Registry**: Aliases from the configuration file and from `aka-*` executables on `PATH`
//! - **Notifications**: Success and failure events for every alias run
//!
//! # Examples
//!
//! Building the alias table from a configuration file:
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use aka_core::dispatch::SubcommandTable;
//! use aka_core::events::{LogNotifier, Notifier};
//! use aka_core::file_handling::load_config;
//! use aka_core::registry::{build_definitions, register_aliases};
//!
//! let config = load_config("/home/me/.aka/config.yml", false)?;
//! let definitions = build_definitions(&config, std::env::var_os("PATH").as_deref())?;
//!
//! let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);
//! let mut table = SubcommandTable::new();
//! register_aliases(&mut table, definitions, &notifier)?;
//! # Ok::<(), aka_core::error::Error>(())
//! ```

pub mod alias;
pub mod command_definitions;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod execution;
pub mod file_handling;
pub mod host;
pub mod registry;
pub mod template;
