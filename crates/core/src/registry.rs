//! Collecting alias definitions from every source and registering them.

use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use itertools::Itertools;
use log::{debug, info};

use crate::alias::{AliasCommand, AliasDefinition};
use crate::command_definitions::{AliasEntry, Config};
use crate::config::PATH_COMMAND_PREFIX;
use crate::dispatch::{ArgumentParser, ParsedArgs, Subcommand, SubcommandTable, EXTERNAL_MARKER};
use crate::error::{Error, Result};
use crate::events::Notifier;
use crate::file_handling::validate_name;
use crate::host::Context;

/// Name of the listing command; no alias may use it.
pub const RESERVED_NAME: &str = "alias";

/// Finds `aka-*` executables in the directories of `path_var`.
///
/// Directories are searched in order and the first executable for a name
/// wins. Unreadable directories and names that are not a single word are
/// skipped.
#[must_use]
pub fn discover_path_commands(path_var: &OsStr) -> Vec<AliasDefinition> {
    let mut seen = HashSet::new();
    let mut definitions = Vec::new();

    for directory in std::env::split_paths(path_var) {
        let Ok(entries) = fs::read_dir(&directory) else {
            continue;
        };

        let file_names = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| is_executable(&entry.path()))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|file_name| file_name.len() > PATH_COMMAND_PREFIX.len())
            .filter(|file_name| file_name.starts_with(PATH_COMMAND_PREFIX))
            .sorted();

        for file_name in file_names {
            let alias = file_name[PATH_COMMAND_PREFIX.len()..].to_string();
            if !seen.insert(alias.clone()) {
                debug!(
                    "Ignoring `{}`, `{alias}` already found",
                    directory.join(&file_name).display()
                );
                continue;
            }

            if let Err(e) = validate_name(&alias) {
                debug!("Skipping `{file_name}`: {e}");
                continue;
            }

            let template = format!("{EXTERNAL_MARKER}{}", shell_words::quote(&file_name));
            let help = format!("Run external command `{file_name}`");
            match AliasDefinition::new(&alias, &template, Some(help)) {
                Ok(definition) => definitions.push(definition),
                Err(e) => debug!("Skipping `{file_name}`: {e}"),
            }
        }
    }

    definitions
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(path)
        .map(|metadata| metadata.is_file() && metadata.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Builds every alias definition the configuration asks for.
///
/// Executables from `path_var` come first (when `alias.from_path` is set and
/// a search path is given), then `alias.aliases`, then the top-level
/// `aliases`.
///
/// # Errors
///
/// Returns an error if:
/// - A name (or short name) appears more than once across all sources
/// - A name is the reserved listing name or otherwise invalid
/// - An entry is malformed or its command cannot be split into words
pub fn build_definitions(
    config: &Config,
    path_var: Option<&OsStr>,
) -> Result<Vec<AliasDefinition>> {
    let mut definitions = match path_var {
        Some(path_var) if config.alias.from_path => discover_path_commands(path_var),
        _ => Vec::new(),
    };

    let mut names: HashSet<String> = definitions
        .iter()
        .map(|definition| definition.name.clone())
        .collect();

    for (source, aliases) in config.alias_sources() {
        for (name, value) in aliases {
            if !names.insert(name.clone()) {
                return Err(Error::DuplicateAlias(name.clone()));
            }

            let entry = AliasEntry::from_value(&format!("{source}.{name}"), value)?;
            debug!("Alias `{name}` from `{source}`: {entry}");
            let definition = match entry {
                AliasEntry::Template(template) => AliasDefinition::new(name, &template, None)?,
                AliasEntry::Mapping {
                    command,
                    help,
                    aliases,
                } => {
                    for short_name in &aliases {
                        validate_name(short_name)?;
                        if !names.insert(short_name.clone()) {
                            return Err(Error::DuplicateAlias(short_name.clone()));
                        }
                    }
                    let help = help.or_else(|| Some(command.clone()));
                    AliasDefinition::new(name, &command, help)?
                        .with_short_names(aliases)
                }
            };

            definitions.push(definition);
        }
    }

    for definition in &definitions {
        validate_name(&definition.name)?;
        let reserved = definition.name == RESERVED_NAME
            || definition.short_names.contains(&RESERVED_NAME.to_string());
        if reserved {
            return Err(Error::ReservedAlias(RESERVED_NAME.to_string()));
        }
    }

    info!("Loaded {} aliases", definitions.len());
    Ok(definitions)
}

/// Formats the alias listing: `name: template`, sorted by name.
#[must_use]
pub fn listing(definitions: &[AliasDefinition]) -> Vec<String> {
    definitions
        .iter()
        .sorted_by(|a, b| a.name.cmp(&b.name))
        .map(|definition| format!("{}: {}", definition.name, definition.template))
        .collect()
}

/// The reserved command printing every alias and its template.
pub struct ListAliases {
    lines: Vec<String>,
    parser: ArgumentParser,
}

impl ListAliases {
    #[must_use]
    pub fn new(definitions: &[AliasDefinition]) -> Self {
        Self {
            lines: listing(definitions),
            parser: ArgumentParser::PassThrough,
        }
    }
}

impl Subcommand for ListAliases {
    fn name(&self) -> &str {
        RESERVED_NAME
    }

    fn help(&self) -> &str {
        "Print the available alias commands."
    }

    fn parser(&self) -> &ArgumentParser {
        &self.parser
    }

    fn invoke(&self, context: &Context<'_>, _args: ParsedArgs) -> Result<()> {
        let mut stdout = context.output.stdout();
        for line in &self.lines {
            writeln!(stdout, "{line}")?;
        }
        stdout.flush()?;
        Ok(())
    }
}

/// Adds the listing command and one [`AliasCommand`] per definition.
///
/// # Errors
///
/// Returns [`Error::AliasShadowsCommand`] if an alias name or short name is
/// already taken by a command in `table`. Nothing is registered then.
pub fn register_aliases(
    table: &mut SubcommandTable,
    definitions: Vec<AliasDefinition>,
    notifier: &Arc<dyn Notifier>,
) -> Result<()> {
    let taken = definitions
        .iter()
        .flat_map(|definition| definition.short_names.iter().chain([&definition.name]))
        .find(|name| table.find(name).is_some());
    if let Some(name) = taken {
        return Err(Error::AliasShadowsCommand(name.clone()));
    }

    table.register(Box::new(ListAliases::new(&definitions)));
    for definition in definitions {
        let command = AliasCommand::new(definition, Arc::clone(notifier));
        table.register(Box::new(command));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_handling::parse_config;

    fn config(yaml: &str) -> Config {
        parse_config("test.yml", yaml).unwrap()
    }

    #[test]
    fn test_build_from_both_sources() {
        let config = config(
            r#"
alias:
  aliases:
    hello: '!echo "Hello {0}"'
    with-help:
      command: ls -a
      help: do something or other
aliases:
  ls-alias: ls
"#,
        );

        let definitions = build_definitions(&config, None).unwrap();
        let names: Vec<&str> = definitions.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["hello", "with-help", "ls-alias"]);
        assert_eq!(definitions[1].help.as_deref(), Some("do something or other"));
        assert!(definitions[0].help.is_none());
    }

    #[test]
    fn test_mapping_help_defaults_to_command() {
        let config = config("aliases:\n  hello:\n    command: '!echo Hello'\n");
        let definitions = build_definitions(&config, None).unwrap();
        assert_eq!(definitions[0].help.as_deref(), Some("!echo Hello"));
    }

    #[test]
    fn test_duplicate_across_sources() {
        let config = config(
            r#"
alias:
  aliases:
    hello: echo
aliases:
  hello: echo2
"#,
        );

        let result = build_definitions(&config, None);
        let err = result.unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(err.to_string(), "alias hello was specified multiple times");
    }

    #[test]
    fn test_duplicate_short_name() {
        let config = config(
            r#"
aliases:
  hello:
    command: '!echo Hello'
    aliases: [hi]
  hi: '!echo Hi'
"#,
        );

        assert!(matches!(
            build_definitions(&config, None),
            Err(Error::DuplicateAlias(name)) if name == "hi"
        ));
    }

    #[test]
    fn test_reserved_name() {
        let config = config("alias:\n  aliases:\n    alias: echo\n");
        let result = build_definitions(&config, None);
        assert!(matches!(result, Err(Error::ReservedAlias(_))));
    }

    #[test]
    fn test_malformed_template() {
        let config = config("aliases:\n  broken: 'echo \"oops'\n");
        let result = build_definitions(&config, None);
        assert!(matches!(result, Err(Error::MalformedTemplate { .. })));
    }

    #[test]
    fn test_listing_sorted() {
        let definitions = vec![
            AliasDefinition::new("zeta", "!echo z", None).unwrap(),
            AliasDefinition::new("alpha", "ls", None).unwrap(),
            AliasDefinition::new("mid", "config -p", None).unwrap(),
        ];

        assert_eq!(
            listing(&definitions),
            vec!["alpha: ls", "mid: config -p", "zeta: !echo z"]
        );
    }

    #[test]
    fn test_alias_cannot_take_a_registered_name() {
        let notifier: Arc<dyn Notifier> = Arc::new(crate::events::Recorder::default());
        let mut table = SubcommandTable::new();
        let hello = AliasDefinition::new("hello", "!echo hello", None)
            .unwrap()
            .with_short_names(vec!["hi".to_string()]);
        register_aliases(&mut table, vec![hello], &notifier).unwrap();
        assert_eq!(table.len(), 2);

        let clash = vec![AliasDefinition::new("hi", "!echo hi", None).unwrap()];
        let result = register_aliases(&mut table, clash, &notifier);

        assert!(matches!(result, Err(Error::AliasShadowsCommand(name)) if name == "hi"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_listing_to_closed_pipe_is_output_error() {
        struct ClosedPipe;

        impl Write for ClosedPipe {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::ErrorKind::BrokenPipe.into())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let definitions = vec![AliasDefinition::new("hello", "!echo hello", None).unwrap()];
        let mut table = SubcommandTable::new();
        table.register(Box::new(ListAliases::new(&definitions)));
        let output = crate::host::Output::new(Box::new(ClosedPipe), Box::new(ClosedPipe));
        let context = Context::new(&table, &crate::host::NoopHost, &output);

        let result = crate::dispatch::invoke(&context, vec![RESERVED_NAME.to_string()]);

        let err = result.unwrap_err();
        assert!(matches!(err, Error::Stdio(_)));
        assert!(err.to_string().starts_with("Could not write output"));
    }

    #[test]
    fn test_listing_sorted_by_name_not_line() {
        // "x: ..." sorts after "x-y: ..." as a whole line
        let definitions = vec![
            AliasDefinition::new("x-y", "ls -l", None).unwrap(),
            AliasDefinition::new("x", "ls", None).unwrap(),
        ];

        assert_eq!(listing(&definitions), vec!["x: ls", "x-y: ls -l"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_discover_path_commands() {
        use std::os::unix::fs::PermissionsExt;

        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();

        let write_script = |dir: &Path, name: &str, mode: u32| {
            let path = dir.join(name);
            fs::write(&path, "#!/bin/sh\necho hi\n").unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
        };

        write_script(first.path(), "aka-testcommand", 0o755);
        write_script(first.path(), "aka-testcommand2", 0o644);
        write_script(first.path(), "other-command", 0o755);
        write_script(second.path(), "aka-testcommand", 0o755);
        write_script(second.path(), "aka-later", 0o755);

        let paths = [first.path(), second.path()];
        let path_var = std::env::join_paths(paths).unwrap();
        let definitions = discover_path_commands(&path_var);

        let names: Vec<&str> = definitions.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["testcommand", "later"]);
        assert_eq!(definitions[0].template, "!aka-testcommand");
        assert_eq!(
            definitions[0].help.as_deref(),
            Some("Run external command `aka-testcommand`")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_path_discovery_respects_from_path() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aka-hello");
        fs::write(&path, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        let path_var = dir.path().as_os_str();

        let enabled = build_definitions(&config("aliases: {}"), Some(path_var)).unwrap();
        assert_eq!(enabled.len(), 1);

        let disabled =
            build_definitions(&config("alias:\n  from_path: false\n"), Some(path_var)).unwrap();
        assert!(disabled.is_empty());

        let clash = build_definitions(&config("aliases:\n  hello: ls\n"), Some(path_var));
        assert!(matches!(clash, Err(Error::DuplicateAlias(_))));
    }
}
