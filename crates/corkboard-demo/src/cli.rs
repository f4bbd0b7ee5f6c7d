//! Command-line interface for `corkboard-demo`.
//!
//! Defines the CLI contract using clap derive macros.
//!
//! # Examples
//!
//! ```bash
//! # Drive the component from a script file
//! corkboard-demo session.cb
//!
//! # Pipe host messages straight in
//! echo '{"columns":[{"key":"s","label":"Status"}],"rows":[{"s":"OK"}]}' | corkboard-demo
//!
//! # Different filter controls, narrow cards
//! corkboard-demo --filterable owner,risk --width 48 session.cb
//!
//! # Fail the run when the host sends garbage (for CI)
//! corkboard-demo --strict session.cb
//! ```

use std::path::PathBuf;

use clap::Parser;

/// Host simulator for the corkboard card-grid pipeline.
///
/// Feeds scripted host messages and user interactions into one engine
/// instance and renders the resulting view state as text cards.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "corkboard-demo",
    version,
    about = "Host simulator for the corkboard card-grid pipeline",
    long_about = "Feeds scripted host messages and user interactions into one \
                  corkboard engine instance and renders the resulting view state \
                  as text cards. Reads commands from a script file, or from stdin \
                  when no script is given."
)]
pub struct Cli {
    /// Script of host commands; reads stdin when omitted
    ///
    /// A script line is either a raw JSON message (starts with `{` or `[`)
    /// or one of: inject, filter, select, trace, show, controls, options.
    /// Blank lines and lines starting with `#` are skipped.
    pub script: Option<PathBuf>,

    /// Column keys that get filter controls, comma separated
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "Clause/Section,Risk Ranking",
        env = "CORKBOARD_FILTERABLE"
    )]
    pub filterable: Vec<String>,

    /// Also print the machine half of outbound trace requests
    #[arg(long, env = "CORKBOARD_SHOW_LLM")]
    pub show_llm: bool,

    /// Exit nonzero when any inbound message was rejected
    #[arg(long)]
    pub strict: bool,

    /// Card width in terminal cells
    #[arg(long, default_value_t = 60, env = "CORKBOARD_WIDTH")]
    pub width: usize,

    /// Enable verbose logging
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Create CLI from iterator (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if argument parsing fails.
    pub fn try_parse_from<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Default log filter directive for the chosen verbosity.
    ///
    /// `RUST_LOG` still wins when set.
    #[must_use]
    pub const fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_defaults() {
        let cli = Cli::try_parse_from(["corkboard-demo"]).unwrap();

        assert!(cli.script.is_none());
        assert_eq!(cli.filterable, vec!["Clause/Section", "Risk Ranking"]);
        assert!(!cli.show_llm);
        assert!(!cli.strict);
        assert_eq!(cli.width, 60);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn cli_parses_script_path() {
        let cli = Cli::try_parse_from(["corkboard-demo", "session.cb"]).unwrap();
        assert_eq!(cli.script, Some(PathBuf::from("session.cb")));
    }

    #[test]
    fn cli_splits_filterable_on_commas() {
        let cli =
            Cli::try_parse_from(["corkboard-demo", "--filterable", "owner,risk"]).unwrap();
        assert_eq!(cli.filterable, vec!["owner", "risk"]);
    }

    #[test]
    fn cli_filterable_keys_may_contain_spaces() {
        let cli =
            Cli::try_parse_from(["corkboard-demo", "--filterable", "Risk Ranking"]).unwrap();
        assert_eq!(cli.filterable, vec!["Risk Ranking"]);
    }

    #[test]
    fn cli_parses_flags() {
        let cli = Cli::try_parse_from([
            "corkboard-demo",
            "--show-llm",
            "--strict",
            "--width",
            "40",
        ])
        .unwrap();

        assert!(cli.show_llm);
        assert!(cli.strict);
        assert_eq!(cli.width, 40);
    }

    #[test]
    fn cli_parses_verbose() {
        let cli = Cli::try_parse_from(["corkboard-demo"]).unwrap();
        assert_eq!(cli.log_directive(), "warn");

        let cli = Cli::try_parse_from(["corkboard-demo", "-v"]).unwrap();
        assert_eq!(cli.log_directive(), "info");

        let cli = Cli::try_parse_from(["corkboard-demo", "-vv"]).unwrap();
        assert_eq!(cli.log_directive(), "debug");

        let cli = Cli::try_parse_from(["corkboard-demo", "-vvv"]).unwrap();
        assert_eq!(cli.log_directive(), "trace");
    }

    #[test]
    fn cli_rejects_non_numeric_width() {
        let result = Cli::try_parse_from(["corkboard-demo", "--width", "wide"]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_help_works() {
        let result = Cli::try_parse_from(["corkboard-demo", "--help"]);
        // --help returns an error (but it's the "help" kind)
        assert!(result.is_err());
    }
}
