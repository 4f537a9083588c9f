use clap::Parser;
use decor::cli::{Cli, Commands};
use decor::types::config::Config;
use decor::DecorResult;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> DecorResult<()> {
    let cli = Cli::parse();

    // Load configuration first (no logging yet)
    let (mut config, config_error) = match &cli.config {
        Some(path) => match Config::load(path) {
            Ok(config) => (config, None),
            Err(e) => (Config::default_config(), Some(e)),
        },
        None => (Config::load_or_default(), None),
    };

    if let Some(store_path) = &cli.store_path {
        config.dump.store_path = Some(store_path.clone());
    }

    // Determine log level: CLI flags take precedence over config
    let log_level = if cli.quiet {
        "error".to_string()
    } else if cli.verbose {
        "debug".to_string()
    } else {
        config.general.log_level.clone()
    };

    let filter = EnvFilter::from_default_env().add_directive(
        format!("decor={}", log_level)
            .parse()
            .unwrap_or_else(|_| "decor=info".parse().expect("fallback directive is valid")),
    );

    let registry = tracing_subscriber::registry().with(filter);
    if config.general.log_format == "json" {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    if let Some(e) = config_error {
        tracing::warn!(error = %e, "Invalid configuration file, using defaults");
    }
    tracing::debug!(store_path = ?config.dump.store_path, keep_chars = config.dump.keep_chars, "Configuration loaded");

    match cli.command {
        Commands::Init { path, force } => {
            decor::cli::commands::init(path, force).await?;
        }
        Commands::Key {
            args,
            keywords,
            keep_chars,
        } => {
            decor::cli::commands::key(&args, &keywords, keep_chars, &config)?;
        }
        Commands::List { json } => {
            decor::cli::commands::list(&config, json).await?;
        }
        Commands::Show { file, json } => {
            decor::cli::commands::show(&file, &config, json)?;
        }
        Commands::Clear { yes } => {
            decor::cli::commands::clear(&config, yes).await?;
        }
        Commands::Version => {
            decor::cli::commands::version();
        }
    }

    Ok(())
}
