//! CLI entry point - the composition root.
//!
//! Loads configuration, applies flag overrides and dispatches to handlers.
//! Errors are printed once here and mapped to sysexits-style exit codes.

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use polyread_cli::text::resolve_text;
use polyread_cli::{Cli, CliConfig, CliError, Commands, Overrides, handlers};

#[tokio::main]
async fn main() {
    // Load environment variables before RUST_LOG is read
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err:#}");
        let code = err.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
        std::process::exit(code);
    }
}

/// Log to stderr so word output on stdout stays clean.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .ok();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        // No command provided - show help
        Cli::command().print_help()?;
        return Ok(());
    };

    let mut config = CliConfig::load(cli.config.as_deref(), cli.voices.as_deref())?;

    match command {
        Commands::Read { text, speed, voice } => {
            config.apply(&Overrides {
                languages: text.languages.clone(),
                speed,
                voices: voice,
            })?;
            let input = resolve_text(text.text.as_deref(), text.file.as_deref())?;
            handlers::read::execute(&config, input).await?;
        }
        Commands::Classify { text, json } => {
            config.apply(&Overrides {
                languages: text.languages.clone(),
                ..Overrides::default()
            })?;
            let input = resolve_text(text.text.as_deref(), text.file.as_deref())?;
            handlers::classify::execute(&config, &input, json)?;
        }
        Commands::Languages => {
            handlers::languages::execute(&config)?;
        }
        Commands::Voices { language } => {
            handlers::voices::execute(&config, language)?;
        }
    }

    Ok(())
}
