//! The structured result of parsing one line of input.

use crate::errors::{Error, Result};

/// Upper bound on the number of arguments in a single command.
pub const MAX_ARGS: usize = 512;

const INPUT_REDIRECT_TOKEN: &str = "<";
const OUTPUT_REDIRECT_TOKEN: &str = ">";
const BACKGROUND_TOKEN: &str = "&";
const COMMENT_LEADER: char = '#';

/// Represents all information associated with one line of user input.
///
/// A `CommandSpec` is created fresh for each input line and consumed by a
/// single dispatch cycle; it owns its argument and path strings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommandSpec {
    argv: Vec<String>,
    /// The name of the input file, if one is specified.
    input_file: Option<String>,
    /// The file to write stdout to, if one is specified.
    output_file: Option<String>,
    /// Run the command in the background, defaults to false.
    background: bool,
}

impl CommandSpec {
    /// Parses one input line into a `CommandSpec`.
    ///
    /// Returns `Ok(None)` for lines that name no command: blank lines,
    /// comments and lines consisting only of redirections or `&`. Words are
    /// split on whitespace; no quoting or escaping is supported.
    ///
    /// # Examples
    ///
    /// ```
    /// use minsh::core::command::CommandSpec;
    ///
    /// let spec = CommandSpec::parse("wc -l < words.txt &").unwrap().unwrap();
    /// assert_eq!(spec.program(), "wc");
    /// assert_eq!(spec.input_file(), Some("words.txt"));
    /// assert!(spec.background());
    /// ```
    pub fn parse(input: &str) -> Result<Option<CommandSpec>> {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed.starts_with(COMMENT_LEADER) {
            return Ok(None);
        }

        let mut tokens: Vec<&str> = trimmed.split_whitespace().collect();
        let mut spec = CommandSpec::default();

        // Only a trailing `&` marks background intent.
        if tokens.last() == Some(&BACKGROUND_TOKEN) {
            spec.background = true;
            tokens.pop();
        }

        let mut tokens = tokens.into_iter();
        while let Some(token) = tokens.next() {
            match token {
                INPUT_REDIRECT_TOKEN => match tokens.next() {
                    Some(path) => spec.input_file = Some(path.to_owned()),
                    None => return Err(Error::syntax(trimmed)),
                },
                OUTPUT_REDIRECT_TOKEN => match tokens.next() {
                    Some(path) => spec.output_file = Some(path.to_owned()),
                    None => return Err(Error::syntax(trimmed)),
                },
                _ => spec.argv.push(token.to_owned()),
            }
        }

        if spec.argv.is_empty() {
            return Ok(None);
        }
        if spec.argv.len() > MAX_ARGS {
            return Err(Error::syntax(trimmed));
        }

        Ok(Some(spec))
    }

    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }

    pub fn input_file(&self) -> Option<&str> {
        self.input_file.as_ref().map(String::as_str)
    }

    pub fn output_file(&self) -> Option<&str> {
        self.output_file.as_ref().map(String::as_str)
    }

    pub fn background(&self) -> bool {
        self.background
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_command() {
        let spec = CommandSpec::parse("echo test").unwrap().unwrap();
        assert_eq!(spec.program(), "echo");
        assert_eq!(spec.args(), ["test"]);
        assert!(spec.input_file().is_none());
        assert!(spec.output_file().is_none());
        assert!(!spec.background());
    }

    #[test]
    fn test_parse_redirections() {
        let spec = CommandSpec::parse("sort < words.txt > sorted.txt")
            .unwrap()
            .unwrap();
        assert_eq!(spec.program(), "sort");
        assert!(spec.args().is_empty());
        assert_eq!(spec.input_file(), Some("words.txt"));
        assert_eq!(spec.output_file(), Some("sorted.txt"));
    }

    #[test]
    fn test_parse_trailing_ampersand_requests_background() {
        let spec = CommandSpec::parse("sleep 5 &").unwrap().unwrap();
        assert_eq!(spec.program(), "sleep");
        assert_eq!(spec.args(), ["5"]);
        assert!(spec.background());
    }

    #[test]
    fn test_parse_interior_ampersand_is_an_argument() {
        let spec = CommandSpec::parse("echo a & b").unwrap().unwrap();
        assert!(!spec.background());
        assert_eq!(spec.args(), ["a", "&", "b"]);
    }

    #[test]
    fn test_parse_blank_lines_and_comments() {
        assert_eq!(CommandSpec::parse("").unwrap(), None);
        assert_eq!(CommandSpec::parse("   ").unwrap(), None);
        assert_eq!(CommandSpec::parse("# a comment").unwrap(), None);
    }

    #[test]
    fn test_parse_commandless_line_is_no_command() {
        assert_eq!(CommandSpec::parse("< words.txt").unwrap(), None);
        assert_eq!(CommandSpec::parse("&").unwrap(), None);
    }

    #[test]
    fn test_parse_dangling_redirect_is_a_syntax_error() {
        assert!(CommandSpec::parse("cat <").is_err());
        assert!(CommandSpec::parse("echo hi >").is_err());
    }

    #[test]
    fn test_parse_rejects_too_many_arguments() {
        let input = vec!["x"; MAX_ARGS + 1].join(" ");
        assert!(CommandSpec::parse(&input).is_err());
    }
}
