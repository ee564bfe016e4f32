//! Info command implementation
//!
//! Loads a sheet and reports its dimensions and frame count.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

use super::{open_composer, runtime};
use crate::config::SheetArgs;

/// Sheet summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetInfo {
    pub source: PathBuf,
    pub width: u32,
    pub height: u32,
    pub frame_size: u32,
    pub frame_count: u32,
}

pub fn sheet_info(args: &SheetArgs) -> Result<SheetInfo> {
    let composer = open_composer(args)?;
    let sheet = runtime()?
        .block_on(composer.load())
        .context("Failed to load sprite sheet")?;

    Ok(SheetInfo {
        source: composer.loader().source().path.clone(),
        width: sheet.image().width(),
        height: sheet.image().height(),
        frame_size: sheet.frame_size(),
        frame_count: sheet.frame_count(),
    })
}

/// Run the info command
///
/// # Returns
/// Exit code: 0 on success
pub fn run(args: &SheetArgs, json: bool) -> Result<ExitCode> {
    let info = sheet_info(args)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{}", "Sprite Sheet".cyan().bold());
    println!("  {}: {}", "Source".dimmed(), info.source.display());
    println!("  {}: {}x{}", "Dimensions".dimmed(), info.width, info.height);
    println!("  {}: {}px", "Frame size".dimmed(), info.frame_size);
    println!("  {}: {}", "Frames".dimmed(), info.frame_count);
    if info.height < info.frame_size {
        println!(
            "  {}",
            "Sheet is shorter than one frame; lower rows render transparent".yellow()
        );
    }

    Ok(ExitCode::SUCCESS)
}
