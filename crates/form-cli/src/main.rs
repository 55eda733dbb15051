use anyhow::Context;
use clap::Parser;
use form_config::FormConfig;

mod cli;
mod commands;
mod output;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("formctl error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();

    match &cli.command {
        cli::Commands::DescriptorSchema => commands::descriptor_schema::handle(&flags),
        cli::Commands::Check(args) => {
            let config = load_config()?;
            commands::check::handle(args, &flags, &config.validation).await
        }
        cli::Commands::Config => commands::config::handle(&load_config()?, &flags),
    }
}

fn load_config() -> anyhow::Result<FormConfig> {
    let config =
        FormConfig::load_with_dotenv().context("failed to load formwork configuration")?;
    tracing::debug!(draft = ?config.validation.draft, "configuration loaded");
    Ok(config)
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("FORMWORK_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
