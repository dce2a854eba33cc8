// Entrypoint for the CLI application.
// - Parses arguments, installs logging and loads the stored configuration.
// - Hands off to the library for the actual work; `main` stays small.
// - Returns `anyhow::Result` so any failure exits non-zero with context.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mdimgup::api::XmlRpcUploader;
use mdimgup::config::{edit_config, ConfigLoad, ConfigStore, FileConfigStore, DEFAULT_CONFIG_PATH};
use mdimgup::document::rewrite_file;
use mdimgup::ui::{SpinnerUploader, TerminalPrompter};
use mdimgup::Mode;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Upload the local images of a Markdown document and rewrite its image
/// syntax as HTML `<img>` tags.
#[derive(Parser)]
#[command(name = "mdimgup", version)]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Show debug logging on stderr (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the stored configuration, or edit it with --edit.
    Config {
        /// Prompt for endpoint URL, username and password.
        #[arg(short, long)]
        edit: bool,
    },

    /// Upload the images of a Markdown file and rewrite it in place.
    Upload {
        /// Markdown file to rewrite.
        filepath: PathBuf,

        /// Embed images as base64 instead of uploading them.
        #[arg(long)]
        inline: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "mdimgup=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    let store = FileConfigStore::new(&cli.config);
    let load = store.load_or_init()?;
    if let ConfigLoad::Recreated(_) = load {
        println!(
            "Could not read `{}`; configuration recreated with default values.\n",
            store.path().display()
        );
    }
    let config = load.into_config();

    match cli.command {
        Commands::Config { edit } => {
            let config = if edit {
                let edited = edit_config(&config, &TerminalPrompter)?;
                store.save(&edited)?;
                edited
            } else {
                config
            };
            println!("Saved configuration:");
            println!("{}", config.display_without_password());
        }
        Commands::Upload { filepath, inline } => {
            let result = if inline {
                rewrite_file(&filepath, &Mode::Inline)
            } else {
                let uploader = SpinnerUploader::new(
                    XmlRpcUploader::new(&config).context("Failed to set up the upload client")?,
                );
                rewrite_file(&filepath, &Mode::Upload(&uploader))
            }
            .with_context(|| format!("Failed to process {}", filepath.display()))?;

            println!(
                "{}: {} image(s) rewritten, {} uploaded, {} left as-is",
                filepath.display(),
                result.replaced,
                result.uploads,
                result.skipped
            );
        }
    }
    Ok(())
}
