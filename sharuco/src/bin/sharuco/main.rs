mod commands;
mod context;
mod output;
mod theme;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use sharuco::{Client, RedisStore};

use commands::{Commands, handle_command};
use context::AppContext;
use output::{GlobalOptions, OutputFormat, OutputManager};

#[derive(Parser)]
#[command(name = "sharuco")]
#[command(version = "0.1.0")]
#[command(
    about = "Operate the Sharuco social graph",
    long_about = r#"Command-line access to the Sharuco social core:

• Follow and unfollow users (both sides are updated)
• Favorite and unfavorite snippets
• Store a personal access token used to publish gists
• Inspect a user's public profile

Environment:
  REDIS_URL      Redis connection URL (RedisJSON required)
  SHARUCO_USER   Default value for --as
  RUST_LOG       Log filter, e.g. sharuco=debug
"#
)]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Cli {
    /// Path to a config file (defaults to the nearest .sharuco/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "table", global = true)]
    output: OutputFormat,

    /// Suppress output (only errors will be shown)
    #[arg(short = 'q', long, global = true)]
    quiet: bool,

    /// Enable verbose output
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let output = OutputManager::new(GlobalOptions {
        output_format: cli.output.clone(),
        quiet: cli.quiet,
        verbose: cli.verbose,
        no_color: cli.no_color,
    });

    if let Err(err) = execute(cli, &output).await {
        output.error(&format!("{err:#}"));
        std::process::exit(1);
    }
}

async fn execute(cli: Cli, output: &OutputManager) -> Result<()> {
    let ctx = AppContext::load(cli.config.as_deref())?;
    if let Some(path) = &ctx.config_path {
        output.verbose(&format!("using config {}", path.display()));
    }

    let url = ctx.redis_url()?;
    let store = RedisStore::connect(&url, ctx.config.store.prefix.clone())
        .await
        .with_context(|| format!("Failed to connect to {url}"))?
        .with_service(ctx.config.store.service.clone());

    let client = Client::new(store);
    handle_command(cli.command, &client, output).await
}
