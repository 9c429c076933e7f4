//! devwatch - smart-home device watcher
//!
//! A command-line tool that checks reachability, link quality and battery
//! state of smart-home devices and sends alerts.

use clap::Parser;
use devwatch::cli::args::{generate_completions, Cli, Commands};
use devwatch::commands::{run_profiles, run_watch};
use devwatch::config::{Config, ConfigBuilder};
use devwatch::error::{AppError, ConfigError};

/// Exit code of a failed run
const EXIT_FAILURE: i32 = 15;

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Set log level based on verbose flag
    if cli.verbose {
        log::set_max_level(log::LevelFilter::Debug);
    }

    // Run the appropriate command
    let result = run(&cli);

    if let Err(e) = result {
        log::error!("{}", e);
        print_error(&e);
        std::process::exit(EXIT_FAILURE);
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    match &cli.command {
        Commands::Run(args) => run_watch(args, load_config(cli)?, cli.format),

        Commands::Profiles(args) => run_profiles(args, &load_config(cli)?, cli.format),

        Commands::Completions { shell } => {
            generate_completions(*shell);
            Ok(())
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config, AppError> {
    let config = ConfigBuilder::new()
        .with_file(cli.config.as_deref())?
        .with_store_path(cli.store.clone())
        .with_dry_run(cli.dry_run.then_some(true))
        .with_namespace(cli.namespace.clone())
        .build()?;
    Ok(config)
}

fn print_error(err: &AppError) {
    eprintln!("Error: {}", err);

    // Print helpful hints for common errors
    match err {
        AppError::Config(ConfigError::FileNotFound(_)) => {
            eprintln!();
            eprintln!("Hint: Default locations are /etc/devwatch/config.toml,");
            eprintln!("      ~/.config/devwatch/config.toml and ./devwatch.toml.");
        }
        AppError::Config(ConfigError::InvalidValue { key, .. }) if key == "store.path" => {
            eprintln!();
            eprintln!("Hint: Set [store] path in the config file or pass --store.");
        }
        _ => {}
    }
}
