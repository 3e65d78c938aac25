//! ffcompose - Fluent ffmpeg command builder
//!
//! Command line front end: builds a job from flags and presets and prints the
//! resulting ffmpeg command line without running it.

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info, Level};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ffcompose::cli::{Args, Commands};
use ffcompose::config::{Config, LoggingConfig};
use ffcompose::preset::{BuiltinPresets, PresetDirectory, PresetResolver};
use ffcompose::render::CommandLine;

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration
    let config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if std::path::Path::new("ffcompose.toml").exists() {
                Config::from_file("ffcompose.toml")?
            } else {
                Config::default()
            }
        }
    };

    setup_logging(args.verbose, &config.logging)?;

    match args.command {
        Commands::Render(render) => {
            let command = render.to_command(&config)?;
            debug!("Built command: {:?}", command);

            let line = CommandLine::new(&config.media.binary_path, &command);
            info!("Rendered {} arguments", line.args.len());

            if render.json {
                println!("{}", serde_json::to_string_pretty(&line)?);
            } else {
                println!("{}", line);
            }

            for (index, output) in command.outputs().iter().enumerate() {
                for (flag, enabled) in output.flags() {
                    if *enabled {
                        info!("Output #{} requests post-processing step: {}", index, flag);
                    }
                }
            }
        }
        Commands::Presets => {
            println!("{:<15} {:<10}", "Name", "Source");
            println!("{}", "-".repeat(30));

            for name in BuiltinPresets.names() {
                println!("{:<15} {:<10}", name, "builtin");
            }

            if let Some(dir) = &config.presets.directory {
                for name in PresetDirectory::new(dir).names() {
                    println!("{:<15} {:<10}", name, dir.display());
                }
            }
        }
    }

    Ok(())
}

fn setup_logging(verbose: bool, logging: &LoggingConfig) -> Result<()> {
    // Determine log level
    let log_level = if verbose { Level::DEBUG } else { Level::WARN };

    // Logs go to stderr so rendered command lines on stdout stay clean
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(verbose)
        .with_line_number(verbose);

    // Optional file layer with daily rotation
    let file_layer = match &logging.directory {
        Some(log_dir) => {
            std::fs::create_dir_all(log_dir)?;
            let file_appender = rolling::daily(log_dir, &logging.file_name);
            let (non_blocking_file, guard) = non_blocking(file_appender);
            // Keep the guard alive for the duration of the program
            std::mem::forget(guard);

            Some(
                fmt::layer()
                    .with_writer(non_blocking_file)
                    .with_target(false)
                    .with_file(true)
                    .with_line_number(true)
                    .with_ansi(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}
