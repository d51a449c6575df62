//! CLI module for Yojana
//!
//! Provides command-line interface parsing for the `yojana` binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Yojana - break questions into plans and run agent tools
#[derive(Parser, Debug)]
#[command(
    name = "yojana",
    author = "Dirmacs <build@dirmacs.com>",
    version,
    about = "Yojana - plan-then-act agent building blocks",
    long_about = "Yojana asks a model to break a question into ordered subtasks,\n\
                  lists the registered tools, and runs the built-in web search.\n\n\
                  Configuration is read from yojana.toml in the working directory\n\
                  when present. Secrets come from the environment or a .env file.",
    after_help = "EXAMPLES:\n    \
                  yojana plan \"今天天气如何？\"          # Generate a plan\n    \
                  yojana plan --json \"...\"            # Print the plan as a JSON array\n    \
                  yojana tools                        # List registered tools\n    \
                  yojana search \"英伟达最新的GPU型号\"   # Run a web search"
)]
pub struct Cli {
    /// Path to the configuration file (defaults to ./yojana.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Break a question into an ordered plan of subtasks
    Plan {
        /// The question to plan for
        question: String,

        /// Print the plan as a JSON array instead of a numbered list
        #[arg(long)]
        json: bool,
    },

    /// List the registered tools and their descriptions
    Tools,

    /// Run a web search and print the extracted answer
    Search {
        /// Search query
        query: String,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
