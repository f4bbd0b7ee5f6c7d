//! The little command language that simulates a hosting page.
//!
//! One command per line. A line opening with `{` or `[` is a raw JSON
//! message posted at the component, exactly as a host would; everything
//! else is a keyword command for the simulated user:
//!
//! ```text
//! # comments and blank lines are skipped
//! {"columns": [{"key": "s", "label": "Status"}], "rows": [{"s": "OK"}]}
//! inject 42
//! filter Risk Ranking = High
//! filter Risk Ranking =
//! select 0
//! trace
//! show
//! controls
//! options Risk Ranking
//! ```
//!
//! `inject` exists for messages that are not JSON objects or arrays;
//! `filter` with nothing after `=` clears that filter; `select` takes the
//! 0-based card index shown in the rendered view.

use serde_json::Value;
use thiserror::Error;

/// One parsed script command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Post a raw message at the component.
    Inject(Value),
    /// Set or clear a filter: `filter <key> = [value]`.
    Filter {
        /// Filterable column key; may contain spaces.
        key: String,
        /// `None` clears the filter.
        value: Option<Value>,
    },
    /// Select the card at a 0-based index of the rendered view.
    Select(usize),
    /// Request a source trace for the selected card.
    Trace,
    /// Repaint the view even though nothing changed.
    Show,
    /// Print the filter controls in detail.
    Controls,
    /// Print the filter options for one column key.
    Options(String),
}

/// Why a script line could not be parsed.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The first word is not a known command.
    #[error("line {line}: unknown command `{word}`")]
    UnknownCommand {
        /// 1-based script line number.
        line: usize,
        /// The offending first word.
        word: String,
    },
    /// A raw or injected message did not parse as JSON.
    #[error("line {line}: bad message JSON: {source}")]
    BadJson {
        /// 1-based script line number.
        line: usize,
        /// The underlying parse failure.
        #[source]
        source: serde_json::Error,
    },
    /// `select` got something that is not a card index.
    #[error("line {line}: `select` wants a 0-based card index, got `{raw}`")]
    BadIndex {
        /// 1-based script line number.
        line: usize,
        /// What was there instead.
        raw: String,
    },
    /// A command that needs an argument had none.
    #[error("line {line}: `{command}` is missing its argument")]
    MissingArgument {
        /// 1-based script line number.
        line: usize,
        /// The command keyword.
        command: &'static str,
    },
}

/// Parse one script line.
///
/// Returns `Ok(None)` for blank lines and comments.
pub fn parse_line(line: usize, raw: &str) -> Result<Option<Command>, ScriptError> {
    let text = raw.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }

    if text.starts_with('{') || text.starts_with('[') {
        return parse_message(line, text).map(Some);
    }

    let (word, rest) = match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (text, ""),
    };

    match word {
        "inject" => {
            if rest.is_empty() {
                return Err(ScriptError::MissingArgument {
                    line,
                    command: "inject",
                });
            }
            parse_message(line, rest).map(Some)
        }
        "filter" => {
            let Some((key, value)) = rest.split_once('=') else {
                return Err(ScriptError::MissingArgument {
                    line,
                    command: "filter",
                });
            };
            let key = key.trim();
            if key.is_empty() {
                return Err(ScriptError::MissingArgument {
                    line,
                    command: "filter",
                });
            }
            Ok(Some(Command::Filter {
                key: key.to_owned(),
                value: parse_filter_value(value.trim()),
            }))
        }
        "select" => rest
            .parse::<usize>()
            .map(|index| Some(Command::Select(index)))
            .map_err(|_| ScriptError::BadIndex {
                line,
                raw: rest.to_owned(),
            }),
        "trace" => Ok(Some(Command::Trace)),
        "show" => Ok(Some(Command::Show)),
        "controls" => Ok(Some(Command::Controls)),
        "options" => {
            if rest.is_empty() {
                return Err(ScriptError::MissingArgument {
                    line,
                    command: "options",
                });
            }
            Ok(Some(Command::Options(rest.to_owned())))
        }
        _ => Err(ScriptError::UnknownCommand {
            line,
            word: word.to_owned(),
        }),
    }
}

fn parse_message(line: usize, raw: &str) -> Result<Command, ScriptError> {
    serde_json::from_str(raw)
        .map(Command::Inject)
        .map_err(|source| ScriptError::BadJson { line, source })
}

/// Filter values read as JSON when they look like it (numbers, booleans,
/// null, quoted strings) and as bare strings otherwise. Nothing after the
/// `=` means "clear".
fn parse_filter_value(raw: &str) -> Option<Value> {
    if raw.is_empty() {
        return None;
    }
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(_) => Some(Value::String(raw.to_owned())),
    }
}
