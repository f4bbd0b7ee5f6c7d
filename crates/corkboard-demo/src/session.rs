//! Drives one grid from a command script.
//!
//! The session owns the component instance, feeds it parsed commands, and
//! repaints after any batch of commands that changed the view. Outbound
//! user messages are printed instead of posted, which is what a terminal
//! host has instead of a message bus.

use std::cell::Cell;
use std::io::BufRead;
use std::rc::Rc;

use anyhow::{Context, Result, bail};
use corkboard::prelude::{CardGrid, OutboundChannel, SurfaceId, UserMessage};

use crate::config::Config;
use crate::render;
use crate::script::{self, Command};

/// The terminal pane hosting the grid. There is only one.
const SURFACE: SurfaceId = SurfaceId(0);

/// Prints outbound user messages to stdout.
struct PrintChannel {
    show_llm: bool,
}

impl OutboundChannel for PrintChannel {
    fn send(&self, message: &UserMessage) {
        println!("trace: {}", message.message);
        if self.show_llm {
            println!("llm: {}", message.llm_message);
        }
    }
}

/// One scripted run against one grid instance.
pub struct Session {
    grid: CardGrid,
    config: Config,
    repaint: Rc<Cell<bool>>,
    rejected: usize,
}

impl Session {
    /// Build the grid the way the config asks and hook up the repaint flag.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let repaint = Rc::new(Cell::new(false));
        let flag = Rc::clone(&repaint);
        let mut grid = CardGrid::new()
            .filterable_columns(config.filterable.clone())
            .with_outbound(PrintChannel {
                show_llm: config.show_llm,
            });
        grid.on_change(move |_| flag.set(true));
        Self {
            grid,
            config,
            repaint,
            rejected: 0,
        }
    }

    /// Paint the initial view, then run every script line in order.
    ///
    /// Script syntax errors abort the run. Rejected messages only abort it
    /// in strict mode, and then only after the whole script has run.
    pub fn run(&mut self, input: impl BufRead) -> Result<()> {
        println!("{}", render::paint(&self.grid, self.config.width));

        for (index, line) in input.lines().enumerate() {
            let line = line.with_context(|| format!("failed to read script line {}", index + 1))?;
            if let Some(command) = script::parse_line(index + 1, &line)? {
                self.apply(command);
            }
            if self.repaint.replace(false) {
                println!("{}", render::paint(&self.grid, self.config.width));
            }
        }

        if self.config.strict && self.rejected > 0 {
            bail!("{} message(s) rejected", self.rejected);
        }
        Ok(())
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::Inject(message) => {
                if self.grid.receive(message).is_err() {
                    self.rejected += 1;
                }
            }
            Command::Filter { key, value } => self.grid.set_filter(&key, value),
            Command::Select(index) => {
                self.grid.select(index, SURFACE);
            }
            Command::Trace => {
                self.grid.trace_selected();
            }
            Command::Show => self.repaint.set(true),
            Command::Controls => println!("{}", render::controls_block(&self.grid)),
            Command::Options(key) => println!("{}", render::options_line(&self.grid, &key)),
        }
    }
}
