//! Placeholder substitution for alias templates.
//!
//! A template is split into words with POSIX shell rules, then caller
//! arguments are substituted into it:
//!
//! - `{N}` is replaced by the `N`th caller argument, which is then consumed.
//! - A bare `{}` word expands to every argument not consumed by `{N}`.
//! - Without a `{}` word, unconsumed arguments are appended.

use crate::error::{Error, Result};

/// Word that expands to all remaining caller arguments.
pub const REST_PLACEHOLDER: &str = "{}";

/// Splits a template into words, honoring quotes and escapes.
///
/// # Errors
///
/// Returns an error if the template has an unterminated quote or a
/// trailing escape.
pub fn tokenize(template: &str) -> std::result::Result<Vec<String>, shell_words::ParseError> {
    shell_words::split(template)
}

/// Tokenizes `template` and substitutes `args` into it.
///
/// # Errors
///
/// Returns an error only if the template cannot be tokenized.
///
/// # Examples
///
/// ```
/// use aka_core::template::substitute;
///
/// let argv = substitute("cmd {0} {}", &["a".into(), "b".into(), "c".into()]).unwrap();
/// assert_eq!(argv, vec!["cmd", "a", "b", "c"]);
/// ```
pub fn substitute(template: &str, args: &[String]) -> Result<Vec<String>> {
    let words = tokenize(template).map_err(|original| Error::MalformedTemplate {
        alias: template.to_string(),
        original,
    })?;

    Ok(substitute_words(&words, args))
}

/// Substitutes `args` into already tokenized template words.
#[must_use]
pub fn substitute_words(words: &[String], args: &[String]) -> Vec<String> {
    let mut words = words.to_vec();
    let mut unused: Vec<Option<&String>> = args.iter().map(Some).collect();

    for (index, arg) in args.iter().enumerate().rev() {
        let token = format!("{{{index}}}");
        let mut found = false;

        for word in words.iter_mut() {
            if word.contains(&token) {
                *word = word.replace(&token, arg);
                found = true;
            }
        }

        if found {
            unused[index] = None;
        }
    }

    let rest: Vec<String> = unused.into_iter().flatten().cloned().collect();

    if words.iter().any(|word| word == REST_PLACEHOLDER) {
        let mut expanded = Vec::with_capacity(words.len() + rest.len());
        for word in words {
            if word == REST_PLACEHOLDER {
                expanded.extend(rest.iter().cloned());
            } else {
                expanded.push(word);
            }
        }
        expanded
    } else {
        words.extend(rest);
        words
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_no_placeholders_no_args() {
        let result = substitute(r#"echo "Goodbye!""#, &[]).unwrap();
        assert_eq!(result, strings(&["echo", "Goodbye!"]));
    }

    #[test]
    fn test_positional_consumed() {
        let result = substitute("cmd {0}", &strings(&["world"])).unwrap();
        assert_eq!(result, strings(&["cmd", "world"]));
    }

    #[test]
    fn test_positional_and_rest() {
        let result = substitute("cmd {0} {}", &strings(&["a", "b", "c"])).unwrap();
        assert_eq!(result, strings(&["cmd", "a", "b", "c"]));
    }

    #[test]
    fn test_append_without_placeholders() {
        let result = substitute("cmd", &strings(&["x", "y"])).unwrap();
        assert_eq!(result, strings(&["cmd", "x", "y"]));
    }

    #[test]
    fn test_positional_inside_quoted_word() {
        let result = substitute(
            r#"echo "Hello {0}, I'm a {1} plugin""#,
            &strings(&["world", "beets"]),
        )
        .unwrap();
        assert_eq!(result, strings(&["echo", "Hello world, I'm a beets plugin"]));
    }

    #[test]
    fn test_positional_with_append_remainder() {
        let result = substitute(
            r#"echo "Hello {0}, I'm a plugin""#,
            &strings(&["world", "beets"]),
        )
        .unwrap();
        assert_eq!(
            result,
            strings(&["echo", "Hello world, I'm a plugin", "beets"])
        );
    }

    #[test]
    fn test_rest_in_middle() {
        let result = substitute(
            r#"echo "Hello {0}, I'm a" {} "plugin""#,
            &strings(&["world", "beets", "extra"]),
        )
        .unwrap();
        assert_eq!(
            result,
            strings(&["echo", "Hello world, I'm a", "beets", "extra", "plugin"])
        );
    }

    #[test]
    fn test_out_of_range_index_left_literal() {
        let result = substitute("cmd {0} {3}", &strings(&["a"])).unwrap();
        assert_eq!(result, strings(&["cmd", "a", "{3}"]));
    }

    #[test]
    fn test_whitespace_in_argument_kept_as_one_token() {
        let result = substitute("echo", &strings(&["hello world"])).unwrap();
        assert_eq!(result, strings(&["echo", "hello world"]));

        let result = substitute("echo {0}", &strings(&["hello world"])).unwrap();
        assert_eq!(result, strings(&["echo", "hello world"]));
    }

    #[test]
    fn test_repeated_positional_consumed_once() {
        let args = strings(&["file", "extra"]);
        let result = substitute("cp {0} {0}.bak", &args).unwrap();
        assert_eq!(result, strings(&["cp", "file", "file.bak", "extra"]));
    }

    #[test]
    fn test_multiple_rest_placeholders_each_get_remainder() {
        let result = substitute("cmd {} -- {}", &strings(&["a", "b"])).unwrap();
        assert_eq!(result, strings(&["cmd", "a", "b", "--", "a", "b"]));
    }

    #[test]
    fn test_rest_with_no_remaining_args_is_removed() {
        let result = substitute("cmd {0} {} end", &strings(&["a"])).unwrap();
        assert_eq!(result, strings(&["cmd", "a", "end"]));
    }

    #[test]
    fn test_spliced_rest_argument_not_expanded_again() {
        let result = substitute("cmd {}", &strings(&["{}", "x"])).unwrap();
        assert_eq!(result, strings(&["cmd", "{}", "x"]));
    }

    #[test]
    fn test_lower_placeholder_in_argument_is_substituted() {
        // Higher indices go first, so `{0}` arriving through `{1}` is replaced too
        let result = substitute("echo {1} {0}", &strings(&["a", "{0}"])).unwrap();
        assert_eq!(result, strings(&["echo", "a", "a"]));
    }

    #[test]
    fn test_two_digit_index() {
        let args: Vec<String> = (0..11).map(|i| format!("a{i}")).collect();
        let result = substitute("cmd {10} {1}", &args).unwrap();
        assert_eq!(result[0], "cmd");
        assert_eq!(result[1], "a10");
        assert_eq!(result[2], "a1");
        assert_eq!(result.len(), 3 + 9);
    }

    #[test]
    fn test_unterminated_quote_is_error() {
        assert!(substitute(r#"echo "oops"#, &[]).is_err());
    }
}
