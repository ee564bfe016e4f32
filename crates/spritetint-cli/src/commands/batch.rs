//! Batch command implementation
//!
//! Renders a run of consecutive seeds through one composer, so the sheet is
//! loaded once.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use super::{open_composer, runtime, write_avatar, AvatarReport};
use crate::config::SheetArgs;

/// Render seeds `start..start + count` into `out_dir` as `<seed>.png`.
pub fn render_batch(
    args: &SheetArgs,
    start: u32,
    count: u32,
    out_dir: &Path,
) -> Result<Vec<AvatarReport>> {
    let composer = open_composer(args)?;
    runtime()?
        .block_on(composer.load())
        .context("Failed to load sprite sheet")?;

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    (0..count)
        .map(|i| {
            let seed = start.wrapping_add(i);
            let avatar = composer.compose(seed)?;
            write_avatar(&avatar, &out_dir.join(format!("{seed}.png")), seed, None)
        })
        .collect()
}

/// Run the batch command
///
/// # Returns
/// Exit code: 0 on success
pub fn run(
    args: &SheetArgs,
    start: u32,
    count: u32,
    out_dir: &Path,
    json: bool,
) -> Result<ExitCode> {
    let reports = render_batch(args, start, count, out_dir)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(ExitCode::SUCCESS);
    }

    for report in &reports {
        let marker = if report.tinted { "ok".green() } else { "--".dimmed() };
        println!("  {} {:>10}  {}", marker, report.seed, report.path.display());
    }

    let untinted = reports.iter().filter(|r| !r.tinted).count();
    println!(
        "  {} Rendered {} {} ({} untinted)",
        "SUCCESS".green().bold(),
        reports.len(),
        if reports.len() == 1 { "avatar" } else { "avatars" },
        untinted
    );

    Ok(ExitCode::SUCCESS)
}
