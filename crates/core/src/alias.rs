//! Alias definitions and the subcommand that runs them.

use std::sync::Arc;

use log::debug;

use crate::dispatch::{
    self, ArgumentParser, DispatchTarget, ParsedArgs, Subcommand, EXTERNAL_MARKER,
};
use crate::error::{Error, Result};
use crate::events::{Event, Notifier};
use crate::host::Context;
use crate::template;

/// A named template, ready to be substituted and run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasDefinition {
    pub name: String,
    pub template: String,
    pub help: Option<String>,
    pub short_names: Vec<String>,
    words: Vec<String>,
}

impl AliasDefinition {
    /// Creates a definition, splitting `template` into words up front.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedTemplate`] if the template has unbalanced
    /// quotes or a dangling escape.
    pub fn new(name: &str, template: &str, help: Option<String>) -> Result<Self> {
        let words = template::tokenize(template).map_err(|original| Error::MalformedTemplate {
            alias: name.to_string(),
            original,
        })?;

        Ok(Self {
            name: name.to_string(),
            template: template.to_string(),
            help,
            short_names: Vec::new(),
            words,
        })
    }

    #[must_use]
    pub fn with_short_names(mut self, short_names: Vec<String>) -> Self {
        self.short_names = short_names;
        self
    }

    /// Whether the template runs an external program.
    #[must_use]
    pub fn is_external(&self) -> bool {
        self.template.starts_with(EXTERNAL_MARKER)
    }

    /// The template with `args` substituted in.
    #[must_use]
    pub fn substitute(&self, args: &[String]) -> Vec<String> {
        template::substitute_words(&self.words, args)
    }
}

/// How an alias invocation ended, as reported to observers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub exit_code: Option<i32>,
    pub message: Option<String>,
}

impl From<&Error> for ExecutionOutcome {
    fn from(error: &Error) -> Self {
        match error {
            Error::ExternalCommandFailed { code, .. } => Self {
                exit_code: Some(*code),
                message: None,
            },
            Error::RequestedExit { code } => Self {
                exit_code: *code,
                message: None,
            },
            other => Self {
                exit_code: None,
                message: Some(other.to_string()),
            },
        }
    }
}

/// Subcommand running one [`AliasDefinition`].
pub struct AliasCommand {
    definition: AliasDefinition,
    help: String,
    parser: ArgumentParser,
    notifier: Arc<dyn Notifier>,
}

impl AliasCommand {
    #[must_use]
    pub fn new(definition: AliasDefinition, notifier: Arc<dyn Notifier>) -> Self {
        let help = definition
            .help
            .clone()
            .unwrap_or_else(|| definition.template.clone());

        Self {
            definition,
            help,
            parser: ArgumentParser::PassThrough,
            notifier,
        }
    }

    /// Substitutes, resolves and executes the alias, then reports the result.
    ///
    /// Observers are notified before any error is returned. An external
    /// failure also runs the host's shutdown hook first.
    ///
    /// # Errors
    ///
    /// Returns the error that ended the run. A requested exit with no code or
    /// code zero counts as success.
    pub fn run(&self, context: &Context<'_>, args: &[String]) -> Result<()> {
        let name = &self.definition.name;

        if !context.enter(name) {
            let error = Error::RecursiveAlias(name.clone());
            self.failed(&self.definition.words, args, &error);
            return Err(error);
        }

        let result = self.run_entered(context, args);
        context.leave(name);
        result
    }

    fn run_entered(&self, context: &Context<'_>, args: &[String]) -> Result<()> {
        let argv = self.definition.substitute(args);
        let external = self.definition.is_external();

        debug!("Running {}", shell_words::join(&argv));

        let resolved = dispatch::resolve(context, &self.definition.name, argv.clone(), external);
        let (command, result) = match resolved {
            Ok(target) => {
                let command = match &target {
                    DispatchTarget::External { argv, .. } => argv.clone(),
                    DispatchTarget::Internal { .. } => argv,
                };
                (command, dispatch::execute(context, target))
            }
            Err(e) => (argv, Err(e)),
        };

        match result {
            Ok(()) => {
                self.succeeded(command, args);
                Ok(())
            }
            Err(e) if e.is_clean_exit() => {
                self.succeeded(command, args);
                Ok(())
            }
            Err(e) => {
                self.failed(&command, args, &e);
                if matches!(e, Error::ExternalCommandFailed { .. }) && external {
                    context.host.shutdown();
                }
                Err(e)
            }
        }
    }

    fn succeeded(&self, command: Vec<String>, args: &[String]) {
        self.notifier.notify(&Event::AliasSucceeded {
            alias: self.definition.name.clone(),
            command,
            args: args.to_vec(),
        });
    }

    fn failed(&self, command: &[String], args: &[String], error: &Error) {
        let outcome = ExecutionOutcome::from(error);

        let exit_message = match outcome.exit_code {
            Some(code) if code != 0 => format!(" with {code}"),
            _ => String::new(),
        };
        let message = outcome
            .message
            .as_ref()
            .map(|message| format!(": {message}"))
            .unwrap_or_default();
        debug!(
            "command `{}` failed{exit_message}{message}",
            shell_words::join(command)
        );

        self.notifier.notify(&Event::AliasFailed {
            alias: self.definition.name.clone(),
            command: command.to_vec(),
            args: args.to_vec(),
            exit_code: outcome.exit_code,
            message: outcome.message,
        });
    }
}

impl Subcommand for AliasCommand {
    fn name(&self) -> &str {
        &self.definition.name
    }

    fn aliases(&self) -> &[String] {
        &self.definition.short_names
    }

    fn help(&self) -> &str {
        &self.help
    }

    fn parser(&self) -> &ArgumentParser {
        &self.parser
    }

    fn invoke(&self, context: &Context<'_>, args: ParsedArgs) -> Result<()> {
        self.run(context, &args.remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_tokenizes_eagerly() {
        let definition = AliasDefinition::new("hello", r#"!echo "Hello {0}""#, None).unwrap();
        assert!(definition.is_external());
        assert_eq!(
            definition.substitute(&["world".to_string()]),
            vec!["!echo", "Hello world"]
        );

        let malformed = AliasDefinition::new("broken", r#"echo "unterminated"#, None);
        assert!(matches!(malformed, Err(Error::MalformedTemplate { .. })));
    }

    #[test]
    fn test_internal_template_is_not_external() {
        let definition = AliasDefinition::new("ls-alias", "ls -a", None).unwrap();
        assert!(!definition.is_external());
    }

    #[test]
    fn test_outcome_from_errors() {
        let outcome = ExecutionOutcome::from(&Error::ExternalCommandFailed {
            command: "false".to_string(),
            code: 7,
        });
        assert_eq!(
            outcome,
            ExecutionOutcome {
                exit_code: Some(7),
                message: None
            }
        );

        let outcome = ExecutionOutcome::from(&Error::UnknownCommand("missing".to_string()));
        assert_eq!(outcome.exit_code, None);
        assert_eq!(outcome.message.as_deref(), Some("unknown command 'missing'"));
    }
}
