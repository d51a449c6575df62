//! Yojana CLI Entry Point
//!
//! - `yojana plan <QUESTION>` - Break a question into ordered subtasks
//! - `yojana tools` - List the registered tools
//! - `yojana search <QUERY>` - Run the web search tool

use owo_colors::OwoColorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use yojana::cli::output::Output;
use yojana::cli::{Cli, Commands};
use yojana::tools::SEARCH_TOOL_NAME;
use yojana::utils::toml_config::LoggingConfig;
use yojana::{ClientOptions, Planner, Provider, ToolRegistry, YojanaConfig};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse_args();

    // Secrets may live in .env; a missing file is fine
    dotenvy::dotenv().ok();

    let config = YojanaConfig::discover(cli.config.as_deref())?;
    init_tracing(&config.logging, cli.verbose, !cli.no_color);

    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    match cli.command {
        Commands::Plan { question, json } => {
            run_plan(&config, &output, &question, json, cli.verbose).await
        }
        Commands::Tools => {
            let registry = ToolRegistry::with_default_tools(&config)?;
            output.result(&registry.list_available());
            Ok(())
        }
        Commands::Search { query } => run_search(&config, &output, &query).await,
    }
}

/// Log to stderr; `RUST_LOG` wins over the configured level
fn init_tracing(logging: &LoggingConfig, verbose: bool, ansi: bool) {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(ansi)
                    .with_target(false),
            )
            .init();
    }
}

async fn run_plan(
    config: &YojanaConfig,
    output: &Output,
    question: &str,
    json: bool,
    verbose: bool,
) -> anyhow::Result<()> {
    let provider = Provider::from_config(&config.llm)?;
    if verbose {
        output.detail("Provider", provider.name());
        output.detail("Model", provider.model());
    }

    let client = provider.create_client_with(&ClientOptions::from_config(&config.llm))?;
    let planner = Planner::new(client);

    let plan = match planner.try_plan(question).await {
        Ok(plan) => plan,
        Err(e) => {
            output.warning(&format!("No usable plan: {}", e));
            Default::default()
        }
    };

    if json {
        output.result(&serde_json::to_string(&plan)?);
        return Ok(());
    }

    if plan.is_empty() {
        output.warning("The model returned an empty plan");
        return Ok(());
    }

    output.plan(&plan);
    Ok(())
}

async fn run_search(config: &YojanaConfig, output: &Output, query: &str) -> anyhow::Result<()> {
    let registry = ToolRegistry::with_default_tools(config)?;

    let Some(tool) = registry.lookup(SEARCH_TOOL_NAME) else {
        output.error(&format!("Tool not found: {}", SEARCH_TOOL_NAME));
        anyhow::bail!("search tool is not registered");
    };

    let answer = tool.invoke(query).await?;
    output.result(&answer);
    Ok(())
}
