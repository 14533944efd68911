//! rulefold-gen: CLI tool for generating consolidated domain rule sets.

use clap::{Parser, Subcommand};
use rulefold::{Config, Error};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rulefold-gen")]
#[command(version = "0.1.0")]
#[command(about = "Consolidate domain rule feeds into canonical rule sets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, consolidate and write the selected categories
    Generate {
        /// Category to run, or "all"
        #[arg(default_value = "all")]
        category: String,

        /// Config file (falls back to ./config.yaml, then built-ins)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the configured output directory
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// List the configured categories
    Categories {
        /// Config file (falls back to ./config.yaml, then built-ins)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            category,
            config,
            output_dir,
        } => {
            let mut config = match Config::load_or_builtin(config.as_deref()) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };
            if let Some(dir) = output_dir {
                config.settings.output_dir = dir;
            }

            match rulefold::run(&config, &category) {
                Ok(()) => {}
                Err(Error::UnknownCategory(name)) => {
                    let known: Vec<&str> =
                        config.categories.iter().map(|c| c.name.as_str()).collect();
                    eprintln!(
                        "Error: unknown category '{}' (expected one of: {}, all)",
                        name,
                        known.join(", ")
                    );
                    std::process::exit(2);
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Categories { config } => {
            let config = match Config::load_or_builtin(config.as_deref()) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };
            for category in &config.categories {
                println!(
                    "{} ({} sources, {} allowlists)",
                    category.name,
                    category.sources.len(),
                    category.allowlists.len()
                );
            }
        }
    }
}
