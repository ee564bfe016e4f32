//! Render command implementation
//!
//! Composes the avatar for one seed or identifier and writes it as PNG.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use super::{open_composer, runtime, write_avatar, AvatarReport};
use crate::config::SheetArgs;

/// What the avatar is derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedInput {
    Seed(u32),
    /// Hashed to a seed with BLAKE3.
    Identifier(String),
}

impl SeedInput {
    pub fn seed(&self) -> u32 {
        match self {
            SeedInput::Seed(seed) => *seed,
            SeedInput::Identifier(id) => spritetint::seed_from_identifier(id),
        }
    }

    fn identifier(&self) -> Option<String> {
        match self {
            SeedInput::Seed(_) => None,
            SeedInput::Identifier(id) => Some(id.clone()),
        }
    }
}

/// Render one avatar to `out`.
pub fn render_avatar(args: &SheetArgs, input: &SeedInput, out: &Path) -> Result<AvatarReport> {
    let composer = open_composer(args)?;
    let seed = input.seed();

    let avatar = runtime()?
        .block_on(composer.render(seed))
        .with_context(|| format!("Failed to render avatar for seed {}", seed))?;

    write_avatar(&avatar, out, seed, input.identifier())
}

/// Run the render command
///
/// # Returns
/// Exit code: 0 on success
pub fn run(args: &SheetArgs, input: &SeedInput, out: &Path, json: bool) -> Result<ExitCode> {
    let report = render_avatar(args, input, out)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("  {} {}", "Wrote".green().bold(), report.path.display());
    if let Some(id) = &report.identifier {
        println!("  {}: {}", "Identifier".dimmed(), id);
    }
    println!("  {}: {}", "Seed".dimmed(), report.seed);
    match (report.frame, report.color) {
        (Some(frame), Some(color)) => {
            println!("  {}: {} tinted {}", "Frame".dimmed(), frame, color);
        }
        _ => println!("  {}", "Tint roll failed; avatar is blank".yellow()),
    }
    println!("  {}: {}", "BLAKE3".dimmed(), report.hash);

    Ok(ExitCode::SUCCESS)
}
