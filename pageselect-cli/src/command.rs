//! Command line parsing for the interactive prompt.

use thiserror::Error;

/// A parsed prompt command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Go to the next page.
    Next,
    /// Go to the previous page.
    Previous,
    /// Go to a page by 1-based index.
    Page(usize),
    /// Set the selection target.
    Select(i64),
    /// Flip the checked state of visible rows by identity key.
    Toggle(Vec<String>),
    /// Check every visible row.
    CheckAll,
    /// Uncheck every visible row.
    UncheckAll,
    /// Clear the whole selection.
    Clear,
    /// Redraw.
    Show,
    /// Print the command list.
    Help,
    /// Leave.
    Quit,
}

/// Why a line could not be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),
    #[error("'{command}' needs {what}")]
    MissingArgument { command: &'static str, what: &'static str },
    #[error("'{0}' is not a number")]
    NotANumber(String),
}

pub const HELP: &str = "\
commands:
  n, next          next page
  p, prev          previous page
  page N           go to page N
  select N         select N rows, fetching further pages as needed
  toggle KEY...    check/uncheck visible rows by id
  all | none       check/uncheck every visible row
  clear            clear the whole selection
  show             redraw
  help             this list
  q, quit          exit";

impl Command {
    /// Parses one prompt line. Blank lines parse as `Show`.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let mut words = line.split_whitespace();
        let Some(word) = words.next() else {
            return Ok(Self::Show);
        };

        match word.to_ascii_lowercase().as_str() {
            "n" | "next" => Ok(Self::Next),
            "p" | "prev" | "previous" => Ok(Self::Previous),
            "page" | "g" => {
                let arg = words.next().ok_or(ParseError::MissingArgument {
                    command: "page",
                    what: "a page number",
                })?;
                arg.parse()
                    .map(Self::Page)
                    .map_err(|_| ParseError::NotANumber(arg.to_string()))
            }
            "select" | "s" => {
                let arg = words.next().ok_or(ParseError::MissingArgument {
                    command: "select",
                    what: "a row count",
                })?;
                arg.parse()
                    .map(Self::Select)
                    .map_err(|_| ParseError::NotANumber(arg.to_string()))
            }
            "toggle" | "t" => {
                let keys: Vec<String> = words.map(str::to_string).collect();
                if keys.is_empty() {
                    return Err(ParseError::MissingArgument {
                        command: "toggle",
                        what: "at least one row id",
                    });
                }
                Ok(Self::Toggle(keys))
            }
            "all" => Ok(Self::CheckAll),
            "none" => Ok(Self::UncheckAll),
            "clear" => Ok(Self::Clear),
            "show" | "ls" => Ok(Self::Show),
            "help" | "?" => Ok(Self::Help),
            "q" | "quit" | "exit" => Ok(Self::Quit),
            other => Err(ParseError::Unknown(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_commands() {
        assert_eq!(Command::parse("n"), Ok(Command::Next));
        assert_eq!(Command::parse("  PREV "), Ok(Command::Previous));
        assert_eq!(Command::parse(""), Ok(Command::Show));
        assert_eq!(Command::parse("quit"), Ok(Command::Quit));
    }

    #[test]
    fn test_numeric_arguments() {
        assert_eq!(Command::parse("page 3"), Ok(Command::Page(3)));
        assert_eq!(Command::parse("select 20"), Ok(Command::Select(20)));
        assert_eq!(Command::parse("select -2"), Ok(Command::Select(-2)));
        assert_eq!(
            Command::parse("page x"),
            Err(ParseError::NotANumber("x".to_string()))
        );
        assert!(matches!(
            Command::parse("select"),
            Err(ParseError::MissingArgument { command: "select", .. })
        ));
    }

    #[test]
    fn test_toggle_keys() {
        assert_eq!(
            Command::parse("toggle 129884 27992"),
            Ok(Command::Toggle(vec!["129884".to_string(), "27992".to_string()]))
        );
        assert!(Command::parse("toggle").is_err());
    }

    #[test]
    fn test_unknown() {
        assert_eq!(
            Command::parse("frobnicate"),
            Err(ParseError::Unknown("frobnicate".to_string()))
        );
    }
}
