//! Runtime configuration for `corkboard-demo`.
//!
//! The [`Config`] struct is the single source of truth for runtime options,
//! independent of how they were specified (CLI or environment). Tests
//! construct it directly without CLI parsing.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::cli::Cli;

/// Narrowest card that still fits a border, padding, and some text.
pub const MIN_WIDTH: usize = 24;

/// Runtime configuration for the host simulator.
///
/// Resolved from CLI args and environment variables; serializable so a
/// session setup can be saved and replayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Script file to read commands from; stdin when absent.
    pub script: Option<PathBuf>,

    /// Column keys that get filter controls, in declared order.
    pub filterable: Vec<String>,

    /// Whether to print the machine half of outbound trace requests.
    pub show_llm: bool,

    /// Whether a rejected inbound message fails the whole run.
    pub strict: bool,

    /// Card width in terminal cells.
    pub width: usize,

    /// Log verbosity level (0=warn, 1=info, 2=debug, 3+=trace).
    pub verbosity: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            script: None,
            filterable: default_filterable(),
            show_llm: false,
            strict: false,
            width: 60,
            verbosity: 0,
        }
    }
}

/// The filter controls the component historically shipped with.
#[must_use]
pub fn default_filterable() -> Vec<String> {
    vec!["Clause/Section".to_owned(), "Risk Ranking".to_owned()]
}

impl Config {
    /// Create config from CLI arguments.
    ///
    /// This is the primary way to construct a Config in production.
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            script: cli.script.clone(),
            filterable: cli.filterable.clone(),
            show_llm: cli.show_llm,
            strict: cli.strict,
            width: cli.width,
            verbosity: cli.verbose,
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < MIN_WIDTH {
            return Err(ConfigError::WidthTooNarrow(self.width));
        }

        if self.filterable.iter().any(String::is_empty) {
            return Err(ConfigError::EmptyFilterKey);
        }

        if let Some(ref path) = self.script
            && !path.exists()
        {
            return Err(ConfigError::ScriptNotFound(path.clone()));
        }

        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Script file not found.
    #[error("Script file not found: {0}")]
    ScriptNotFound(PathBuf),

    /// Card width below the renderable minimum.
    #[error("Card width {0} is below the renderable minimum")]
    WidthTooNarrow(usize),

    /// An empty string in the filterable key list.
    #[error("Filterable keys must be non-empty")]
    EmptyFilterKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default() {
        let config = Config::default();

        assert!(config.script.is_none());
        assert_eq!(config.filterable, vec!["Clause/Section", "Risk Ranking"]);
        assert!(!config.show_llm);
        assert!(!config.strict);
        assert_eq!(config.width, 60);
        assert_eq!(config.verbosity, 0);
    }

    #[test]
    fn config_from_cli_defaults() {
        let cli = Cli::try_parse_from(["corkboard-demo"]).unwrap();
        let config = Config::from_cli(&cli);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn config_from_cli_maps_every_field() {
        let cli = Cli::try_parse_from([
            "corkboard-demo",
            "--filterable",
            "owner",
            "--show-llm",
            "--strict",
            "--width",
            "48",
            "-vv",
            "session.cb",
        ])
        .unwrap();
        let config = Config::from_cli(&cli);

        assert_eq!(config.script, Some(PathBuf::from("session.cb")));
        assert_eq!(config.filterable, vec!["owner"]);
        assert!(config.show_llm);
        assert!(config.strict);
        assert_eq!(config.width, 48);
        assert_eq!(config.verbosity, 2);
    }

    #[test]
    fn config_validate_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn config_validate_rejects_narrow_width() {
        let config = Config {
            width: MIN_WIDTH - 1,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::WidthTooNarrow(_))
        ));
    }

    #[test]
    fn config_validate_accepts_minimum_width() {
        let config = Config {
            width: MIN_WIDTH,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_validate_rejects_empty_filter_key() {
        let config = Config {
            filterable: vec!["owner".to_owned(), String::new()],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyFilterKey)));
    }

    #[test]
    fn config_validate_allows_no_filterable_columns() {
        let config = Config {
            filterable: Vec::new(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_validate_rejects_missing_script() {
        let config = Config {
            script: Some(PathBuf::from("/definitely/not/a/real/session.cb")),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ScriptNotFound(_))
        ));
    }

    #[test]
    fn config_serialization() {
        let config = Config {
            script: Some(PathBuf::from("session.cb")),
            strict: true,
            ..Default::default()
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn config_error_display_messages() {
        let err = ConfigError::ScriptNotFound(PathBuf::from("bad.cb"));
        assert!(err.to_string().contains("bad.cb"));

        let err = ConfigError::WidthTooNarrow(3);
        assert!(err.to_string().contains('3'));

        let err = ConfigError::EmptyFilterKey;
        assert!(err.to_string().contains("non-empty"));
    }
}
