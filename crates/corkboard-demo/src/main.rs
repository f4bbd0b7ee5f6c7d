//! Terminal host for the corkboard card grid.
//!
//! Plays a command script against a single grid instance and paints the
//! view after every change, the way an embedding page would react to the
//! component's change events. The script comes from a file argument or
//! stdin; outbound user messages are printed instead of posted.
//!
//! ```text
//! corkboard-demo walkthrough.txt
//! echo 'select 0
//! trace' | corkboard-demo --show-llm
//! ```
//!
//! Set `RUST_LOG` or pass `-v` flags to see the component's diagnostics
//! on stderr.

#![forbid(unsafe_code)]

mod cli;
mod config;
mod render;
mod script;
mod session;

use std::fs::File;
use std::io::{self, BufReader};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::Config;
use crate::session::Session;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_directive());

    let config = Config::from_cli(&cli);
    config.validate().context("invalid configuration")?;

    let script = config.script.clone();
    let mut session = Session::new(config);
    match script {
        Some(path) => {
            let file = File::open(&path)
                .with_context(|| format!("failed to open script {}", path.display()))?;
            session.run(BufReader::new(file))
        }
        None => session.run(io::stdin().lock()),
    }
}

/// `RUST_LOG` wins; otherwise the `-v` count picks the level.
fn init_tracing(directive: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}
