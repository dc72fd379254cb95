/// Chorus - chat-driven music bot
use chorus_bot::{build_executor, config::BotConfig, console};
use clap::{Parser, Subcommand};
use std::{path::PathBuf, sync::Arc};
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "chorus-bot")]
#[command(about = "Chat-driven music queue bot", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./chorus.toml when present)
    #[arg(short, long, env = "CHORUS_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read chat lines from stdin and answer on stdout
    Run,
    /// Load and validate the configuration, then print it
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the chat
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "chorus_bot=info,chorus_commands=info,chorus_resolver=info,chorus_playback=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = BotConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run(&config).await?,
        Commands::CheckConfig => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

async fn run(config: &BotConfig) -> anyhow::Result<()> {
    let executor = Arc::new(build_executor(config)?);
    tracing::info!(
        name = %config.bot.name,
        prefix = %config.bot.command_prefix,
        services = ?executor.state().resolver.registry().services(),
        "Starting Chorus"
    );

    let (console, replies) = console::Console::new(
        executor,
        config.bot.command_prefix.clone(),
        config.chat.members.clone(),
    );
    console::run(
        console,
        replies,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await?;

    tracing::info!("Input closed, shutting down");
    Ok(())
}
