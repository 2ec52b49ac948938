//! Terminal rendering: per-test status, progress bar, final summary.
//!
//! Purely presentational. Colours and in-place redraws are ANSI escapes and
//! are only emitted when the run configuration allows them.

use std::io::{self, Write};

use crate::classify::Classification;
use crate::suite::{RunConfig, SuiteTally};

const PROGRESS_WIDTH: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Red = 1,
    Green = 2,
    Yellow = 3,
}

#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    colors: bool,
    interactive: bool,
    verbose: bool,
}

impl Renderer {
    pub const fn new(config: &RunConfig) -> Self {
        Self {
            colors: config.colors,
            interactive: config.interactive,
            verbose: config.verbose,
        }
    }

    fn paint(&self, text: &str, color: Option<Color>) -> String {
        if !self.colors {
            return text.to_owned();
        }
        match color {
            Some(color) => format!("\x1b[1m\x1b[{}m{text}\x1b[0m", 30 + color as u8),
            None => format!("\x1b[1m{text}\x1b[0m"),
        }
    }

    pub fn header(&self, out: &mut dyn Write) -> io::Result<()> {
        write!(out, "{}", self.paint("Running tests...\n", None))?;
        out.flush()
    }

    /// Print the test label, and in interactive mode draw the progress bar on
    /// the next row before moving the cursor back behind the label.
    pub fn start_test(
        &self,
        out: &mut dyn Write,
        description: &str,
        tally: &SuiteTally,
        total: usize,
    ) -> io::Result<()> {
        let label = format!("  {description} ... ");
        write!(out, "{label}")?;
        if self.interactive {
            writeln!(out)?;
            write!(out, "{}", progress_bar(tally.done(), total))?;
            write!(out, "\r\x1b[A\x1b[{}C", label.chars().count())?;
        }
        out.flush()
    }

    pub fn finish_test(
        &self,
        out: &mut dyn Write,
        classification: Classification,
        comments: &[String],
    ) -> io::Result<()> {
        let status = match classification {
            Classification::Fail => self.paint("Failed", Some(Color::Red)),
            Classification::Pass => self.paint("Passed", Some(Color::Green)),
            Classification::PassImprove => {
                self.paint("Passed with improvements!", Some(Color::Yellow))
            }
        };
        writeln!(out, "{status}")?;
        if self.interactive {
            // Clear the progress bar below the cursor.
            write!(out, "\x1b[J")?;
        }
        if self.verbose {
            for comment in comments {
                writeln!(out, "    {comment}")?;
            }
        }
        out.flush()
    }

    pub fn summary(&self, out: &mut dyn Write, tally: &SuiteTally, total: usize) -> io::Result<()> {
        write!(out, "{}", self.paint("Results:\n", None))?;
        let line = summary_line(tally, total);
        let color = if tally.fail == 0 {
            Color::Green
        } else {
            Color::Red
        };
        write!(out, "{}", self.paint(&format!("{line}\n"), Some(color)))?;
        out.flush()
    }
}

/// Uncoloured summary sentence, indented by two spaces.
pub fn summary_line(tally: &SuiteTally, total: usize) -> String {
    if tally.fail != 0 {
        format!("  {}/{} tests failed.", tally.fail, total)
    } else if tally.pass_improve > 0 {
        format!(
            "  {} tests passed successfully (with {} improvement(s)).",
            tally.pass + tally.pass_improve,
            tally.pass_improve
        )
    } else {
        format!("  {} tests passed successfully.", tally.pass)
    }
}

/// `[#####     ] NN%`, 50 columns wide.
pub fn progress_bar(done: usize, total: usize) -> String {
    let percent = if total == 0 {
        100.0
    } else {
        100.0 * done as f64 / total as f64
    };
    let width = ((PROGRESS_WIDTH as f64 * percent / 100.0) as usize).min(PROGRESS_WIDTH);
    format!(
        "[{}{}] {}%",
        "#".repeat(width),
        " ".repeat(PROGRESS_WIDTH - width),
        percent as u32
    )
}
