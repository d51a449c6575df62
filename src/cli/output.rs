//! Terminal rendering for the Yojana CLI
//!
//! Command results (plans, tool listings, search answers) go to stdout so
//! they can be piped. Warnings, errors and `--verbose` details go to stderr.
//! Every line is rendered to a `String` first; the printing methods are thin
//! wrappers.

use crate::planner::Plan;
use owo_colors::OwoColorize;

/// Severity of a status line on stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Warning,
    Error,
}

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    pub fn status_line(&self, level: Level, message: &str) -> String {
        match (level, self.colored) {
            (Level::Warning, true) => format!("  {} {}", "⚠".yellow().bold(), message.yellow()),
            (Level::Warning, false) => format!("  [WARN] {}", message),
            (Level::Error, true) => format!("  {} {}", "✗".red().bold(), message.red()),
            (Level::Error, false) => format!("  [ERROR] {}", message),
        }
    }

    pub fn detail_line(&self, key: &str, value: &str) -> String {
        if self.colored {
            format!("    {}: {}", key.dimmed(), value.bright_white())
        } else {
            format!("    {}: {}", key, value)
        }
    }

    /// Header followed by one `n. step` line per step, numbered from 1
    pub fn plan_lines(&self, plan: &Plan) -> Vec<String> {
        let header = if self.colored {
            format!("  {}", "Plan".bright_white().bold().underline())
        } else {
            "  === Plan ===".to_string()
        };

        std::iter::once(header)
            .chain(plan.iter().enumerate().map(|(i, step)| {
                let number = format!("{}.", i + 1);
                if self.colored {
                    format!("  {} {}", number.cyan().bold(), step)
                } else {
                    format!("  {} {}", number, step)
                }
            }))
            .collect()
    }

    pub fn warning(&self, message: &str) {
        eprintln!("{}", self.status_line(Level::Warning, message));
    }

    pub fn error(&self, message: &str) {
        eprintln!("{}", self.status_line(Level::Error, message));
    }

    /// `--verbose` key/value detail
    pub fn detail(&self, key: &str, value: &str) {
        eprintln!("{}", self.detail_line(key, value));
    }

    pub fn plan(&self, plan: &Plan) {
        for line in self.plan_lines(plan) {
            println!("{}", line);
        }
    }

    /// Raw command result on stdout, uncoloured
    pub fn result(&self, text: &str) {
        println!("{}", text);
    }
}
