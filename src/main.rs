use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use sglog::config::{self, LoggerConfig};
use sglog::logging::Logger;

#[derive(Parser, Debug)]
#[command(name = "sglog", version, about = "Rotating append-only log writer")]
struct Cli {
    /// Configuration file path (default: ~/.swiftgram/sglog.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the directory log files are written to
    #[arg(long, global = true)]
    base_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Append a log line, or one line per stdin line when no message is given
    Log {
        /// Subsystem tag written as [SG.<tag>]
        #[arg(short, long)]
        tag: String,

        /// Do not echo lines to stdout
        #[arg(short, long)]
        quiet: bool,

        /// Message text
        message: Vec<String>,
    },

    /// List log files in creation order
    Collect {
        /// Directory below the root path to collect from (e.g. /logs/app-logs-sg)
        #[arg(short, long, conflicts_with = "dir")]
        prefix: Option<String>,

        /// Explicit directory to collect from
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration
    Config {
        /// Write it to the configuration file path
        #[arg(short, long)]
        write: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Diagnostics go to stderr; stdout carries the console log sink
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sglog=warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let config_path = cli.config.clone().unwrap_or_else(config::config_file_path);
    let mut config = LoggerConfig::load_from(&config_path)?;
    if let Some(base_path) = cli.base_path {
        config.base_path = base_path;
    }

    match cli.command {
        Commands::Log {
            tag,
            quiet,
            message,
        } => run_log(&config, &tag, quiet, message).await,
        Commands::Collect { prefix, dir, json } => run_collect(&config, prefix, dir, json).await,
        Commands::Config { write } => {
            print!(
                "{}",
                toml::to_string_pretty(&config).context("Failed to serialize config")?
            );
            if write {
                config.save_to(&config_path)?;
                tracing::info!("Wrote configuration to {}", config_path.display());
            }
            Ok(())
        }
    }
}

async fn run_log(config: &LoggerConfig, tag: &str, quiet: bool, message: Vec<String>) -> Result<()> {
    config.ensure_directories()?;
    let logger = Arc::new(Logger::new(config).context("Failed to start log writer")?);
    if quiet {
        logger.set_log_to_console(false);
    }

    let tagged = logger.tagged(tag);
    if message.is_empty() {
        for line in std::io::stdin().lock().lines() {
            let line = line.context("Failed to read stdin")?;
            tagged.log(|| line);
        }
    } else {
        tagged.log(|| message.join(" "));
    }

    logger.flush().await.context("Log writer stopped")?;

    let dropped = logger.dropped_lines();
    if dropped > 0 {
        anyhow::bail!("{} log line(s) could not be written", dropped);
    }
    Ok(())
}

async fn run_collect(
    config: &LoggerConfig,
    prefix: Option<String>,
    dir: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let logger = Logger::new(config).context("Failed to start log writer")?;

    let logs = match dir {
        Some(dir) => logger.collect_logs_in(dir),
        None => logger.collect_logs(prefix.as_deref()),
    }
    .await
    .context("Log writer stopped")?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&logs).context("Failed to serialize log list")?
        );
    } else {
        for log in &logs {
            println!("{}\t{}", log.name, log.path.display());
        }
    }
    Ok(())
}
