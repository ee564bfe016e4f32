//! spritetint CLI - render seeded avatar sprites
//!
//! This binary picks and tints one frame of a sprite sheet per seed and writes
//! the deterministic result as PNG.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use spritetint_cli::commands;
use spritetint_cli::commands::render::SeedInput;
use spritetint_cli::config::SheetArgs;

/// spritetint - Deterministic tinted avatar sprites
#[derive(Parser)]
#[command(name = "spritetint")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the avatar for one seed or identifier
    Render {
        #[command(flatten)]
        sheet: SheetArgs,

        /// Numeric seed
        #[arg(long, conflicts_with = "id", required_unless_present = "id")]
        seed: Option<u32>,

        /// Identifier (e.g. user id) hashed into a seed
        #[arg(long)]
        id: Option<String>,

        /// Output PNG path
        #[arg(short, long)]
        out: PathBuf,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Render consecutive seeds into a directory
    Batch {
        #[command(flatten)]
        sheet: SheetArgs,

        /// First seed
        #[arg(long, default_value_t = 0)]
        start: u32,

        /// Number of avatars
        #[arg(long, default_value_t = 16)]
        count: u32,

        /// Output directory (files are named <seed>.png)
        #[arg(long)]
        out_dir: PathBuf,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Show sprite sheet dimensions and frame count
    Info {
        #[command(flatten)]
        sheet: SheetArgs,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}

/// Initialize logging with the specified level
fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("spritetint={level},spritetint_cli={level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let result = match cli.command {
        Commands::Render {
            sheet,
            seed,
            id,
            out,
            json,
        } => {
            let input = match (seed, id) {
                (Some(seed), _) => SeedInput::Seed(seed),
                (None, Some(id)) => SeedInput::Identifier(id),
                (None, None) => unreachable!("clap requires --seed or --id"),
            };
            commands::render::run(&sheet, &input, &out, json)
        }
        Commands::Batch {
            sheet,
            start,
            count,
            out_dir,
            json,
        } => commands::batch::run(&sheet, start, count, &out_dir, json),
        Commands::Info { sheet, json } => commands::info::run(&sheet, json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
