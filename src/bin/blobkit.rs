//! Command line front end for blobkit.
//!
//! Reads model output from a file or stdin and prints the extracted payload.
//! Logs go to stderr so stdout only ever carries results.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;

use blobkit::config::BlobkitConfig;
use blobkit::extract::{BlobExtractor, JsonExtractor};
use blobkit::names::validate_name;
use blobkit::telemetry::{init_logging, LoggingConfig};

#[derive(Parser, Debug)]
#[command(name = "blobkit", version, about = "Extract code and JSON blobs from model output")]
struct Cli {
    /// Configuration file (.toml, .yaml, .yml or .json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter directive written to stderr (e.g. debug, blobkit=trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract delimited code blobs
    Code {
        /// Marker opening a code blob
        #[arg(long, requires = "close")]
        open: Option<String>,

        /// Marker closing a code blob
        #[arg(long, requires = "open")]
        close: Option<String>,

        /// Accept un-fenced code as a single payload
        #[arg(long)]
        raw_fallback: bool,

        /// Do not accept markdown python fences in place of the markers
        #[arg(long)]
        no_markdown_fallback: bool,

        /// Input file, `-` or absent for stdin
        input: Option<PathBuf>,
    },
    /// Extract the first embedded JSON object and the text before it
    Json {
        /// Reject raw control characters inside JSON strings
        #[arg(long)]
        strict: bool,

        /// Input file, `-` or absent for stdin
        input: Option<PathBuf>,
    },
    /// Check whether names can be spliced into generated source code
    Name {
        #[arg(required = true)]
        names: Vec<String>,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if let Some(level) = &cli.log_level {
        logging = logging.with_level(level.clone());
    }
    let _guard = init_logging(logging)?;

    let config = load_config(cli.config.as_deref())?;
    debug!(?config, "Loaded configuration");

    match cli.command {
        Commands::Code {
            open,
            close,
            raw_fallback,
            no_markdown_fallback,
            input,
        } => {
            let mut extraction = config.extraction;
            if let (Some(open), Some(close)) = (open, close) {
                extraction.open_tag = open;
                extraction.close_tag = close;
            }
            extraction.raw_code_fallback |= raw_fallback;
            if no_markdown_fallback {
                extraction.markdown_fallback = false;
            }

            let extractor = BlobExtractor::from_config(&extraction)?;
            let text = read_input(input.as_deref())?;
            let code = extractor.extract(&text)?;
            println!("{}", code);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Json { strict, input } => {
            let extractor = if strict {
                JsonExtractor::strict()
            } else {
                JsonExtractor::from_config(&config.json)
            };

            let text = read_input(input.as_deref())?;
            let blob = extractor.extract(&text)?;
            println!("{}", serde_json::to_string_pretty(&blob)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Name { names } => {
            let mut all_valid = true;
            for name in &names {
                match validate_name(name) {
                    Ok(()) => println!("{}: valid", name),
                    Err(error) => {
                        all_valid = false;
                        println!("{}: invalid ({})", name, error);
                    }
                }
            }
            Ok(if all_valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<BlobkitConfig> {
    let config = match path {
        Some(path) => BlobkitConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => BlobkitConfig::default(),
    };
    let config = config.merge_with_env()?;
    config.validate()?;
    Ok(config)
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}
